//! Server-rendered HTML.
//!
//! Pages are plain strings wrapped in one shared layout. Every value that comes
//! from the database or the request goes through [`escape`] before it is
//! written into markup. Forms and tables are generated from the entity column
//! definitions, so a new column shows up on the admin screens without touching
//! this module.

use axum::response::Html;
use sea_orm::{ColumnTrait, ColumnType, EntityTrait, IdenStatic, Iterable};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Escapes text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps `body` in the shared page layout.
#[must_use]
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Transit Admin</title>\n</head>\n<body>\n\
         <header><a href=\"/login\">Transit Admin</a></header>\n<main>\n<h1>{title}</h1>\n{body}\n</main>\n\
         </body>\n</html>\n",
        title = escape(title),
    ))
}

/// Input element type used for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Whole numbers, keys included
    Integer,
    Decimal,
    /// `YYYY-MM-DD`
    Date,
    Checkbox,
    /// Never pre-filled or displayed
    Password,
}

impl InputKind {
    fn attributes(self) -> &'static str {
        match self {
            Self::Text => "type=\"text\"",
            Self::Integer => "type=\"number\" step=\"1\"",
            Self::Decimal => "type=\"number\" step=\"any\"",
            Self::Date => "type=\"date\"",
            Self::Checkbox => "type=\"checkbox\"",
            Self::Password => "type=\"password\"",
        }
    }
}

/// One column of an entity, as shown on forms and tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name, also the form input name and the JSON key
    pub name: String,
    /// How values of the column are entered and parsed
    pub kind: InputKind,
}

fn kind_of(name: &str, column_type: &ColumnType) -> InputKind {
    if name == "password" {
        return InputKind::Password;
    }
    match column_type {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => InputKind::Integer,
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) | ColumnType::Money(_) => {
            InputKind::Decimal
        }
        ColumnType::Date => InputKind::Date,
        ColumnType::Boolean => InputKind::Checkbox,
        _ => InputKind::Text,
    }
}

/// Columns of `E` in declaration order.
#[must_use]
pub fn fields<E: EntityTrait>() -> Vec<Field> {
    E::Column::iter()
        .map(|column| {
            let name = column.as_str().to_string();
            let kind = kind_of(&name, column.def().get_column_type());
            Field { name, kind }
        })
        .collect()
}

/// Text shown for one JSON value in a cell or input
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serializes a row into a JSON object, empty when it is not one.
pub fn to_object<T: Serialize>(row: &T) -> serde_json::Map<String, Value> {
    match serde_json::to_value(row) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    }
}

/// Renders rows as a table. Password columns are never shown.
pub fn table<T: Serialize>(fields: &[Field], rows: &[T], detail_base: Option<&str>) -> String {
    let shown: Vec<&Field> = fields
        .iter()
        .filter(|f| f.kind != InputKind::Password)
        .collect();

    let mut html = String::from("<table>\n<thead><tr>");
    for field in &shown {
        let _ = write!(html, "<th>{}</th>", escape(&field.name));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows {
        let object = to_object(row);
        html.push_str("<tr>");
        for (index, field) in shown.iter().enumerate() {
            let text = object.get(&field.name).map(display_value).unwrap_or_default();
            match detail_base {
                Some(base) if index == 0 => {
                    let _ = write!(
                        html,
                        "<td><a href=\"{}/{}\">{}</a></td>",
                        escape(base),
                        escape(&text),
                        escape(&text)
                    );
                }
                _ => {
                    let _ = write!(html, "<td>{}</td>", escape(&text));
                }
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Renders a definition list of every non-password field of one row.
pub fn detail<T: Serialize>(fields: &[Field], row: &T) -> String {
    let object = to_object(row);
    let mut html = String::from("<dl>\n");
    for field in fields.iter().filter(|f| f.kind != InputKind::Password) {
        let text = object.get(&field.name).map(display_value).unwrap_or_default();
        let _ = writeln!(
            html,
            "<dt>{}</dt><dd>{}</dd>",
            escape(&field.name),
            escape(&text)
        );
    }
    html.push_str("</dl>\n");
    html
}

/// Renders a POST form. `values` pre-fills inputs; password inputs stay empty.
#[must_use]
pub fn form(
    action: &str,
    fields: &[Field],
    values: &serde_json::Map<String, Value>,
    submit: &str,
) -> String {
    let mut html = format!("<form method=\"post\" action=\"{}\">\n", escape(action));
    for field in fields {
        let value = if field.kind == InputKind::Password {
            String::new()
        } else {
            values.get(&field.name).map(display_value).unwrap_or_default()
        };
        let _ = writeln!(
            html,
            "<label>{name} <input name=\"{name}\" {attrs} value=\"{value}\"></label><br>",
            name = escape(&field.name),
            attrs = field.kind.attributes(),
            value = escape(&value),
        );
    }
    let _ = writeln!(html, "<button type=\"submit\">{}</button>\n</form>", escape(submit));
    html
}

/// Renders an unordered list of links.
#[must_use]
pub fn link_list<'a>(links: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut html = String::from("<ul>\n");
    for (text, href) in links {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&href),
            escape(text)
        );
    }
    html.push_str("</ul>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{User, card, user};

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_fields_follow_columns() {
        let card_fields = fields::<card::Entity>();
        let names: Vec<&str> = card_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "id_user", "id_type_card", "balance", "last_used"]);

        let user_fields = fields::<User>();
        let password = user_fields.iter().find(|f| f.name == "password");
        assert_eq!(password.map(|f| f.kind), Some(InputKind::Password));
        assert_eq!(user_fields[0].kind, InputKind::Integer);
    }

    #[test]
    fn test_table_hides_password_and_escapes() {
        let row = user::Model {
            id: 1,
            identification: 10,
            name: "<b>Eve</b>".to_string(),
            lastname: "Doe".to_string(),
            email: "eve@transit.test".to_string(),
            password: "digest".to_string(),
            id_rol_user: 1,
            id_shift: 1,
        };
        let html = table(&fields::<User>(), &[row], Some("/users/view"));
        assert!(!html.contains("password"));
        assert!(!html.contains("digest"));
        assert!(html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(html.contains("<a href=\"/users/view/1\">1</a>"));
    }

    #[test]
    fn test_form_prefills_values() {
        let values = to_object(&card::Model {
            id: 3,
            id_user: 1,
            id_type_card: 2,
            balance: 0.0,
            last_used: None,
        });
        let html = form("/card/update", &fields::<card::Entity>(), &values, "Save");
        assert!(html.contains("name=\"id_type_card\" type=\"number\" step=\"1\" value=\"2\""));
        assert!(html.contains("name=\"last_used\" type=\"date\" value=\"\""));
    }
}
