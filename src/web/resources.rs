//! Generic CRUD endpoints, instantiated once per [`Resource`].
//!
//! Reads answer JSON (`GET /{c}`, `GET /{c}/{id}`) or HTML (`/{c}/view`).
//! Writes take urlencoded forms, as posted by the HTML screens, and answer a
//! JSON outcome `{operation, success, data, message}`.

use crate::core::resource::{self, Resource};
use crate::errors::{Error, Result};
use crate::web::AppState;
use crate::web::auth::CurrentUser;
use crate::web::pages::{self, Field, InputKind};
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::instrument;

/// Result of a write, as returned by every POST endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// `create`, `update` or `delete`
    pub operation: String,
    /// Always true; failures answer with an error body instead
    pub success: bool,
    /// The stored row, absent for deletes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable summary
    pub message: String,
}

/// Body of `POST /{c}/delete`
#[derive(Debug, Deserialize)]
pub struct IdForm<K> {
    /// Key of the row to delete
    pub id: K,
}

/// Optional `?id=` used to pre-fill the update form
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    /// Key of the row to edit, as typed
    pub id: Option<String>,
}

/// Key taken from the URL path. A key that does not parse is reported as a
/// validation error with the usual JSON body.
pub struct KeyPath<T>(pub T);

impl<T, S> FromRequestParts<S> for KeyPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| Error::validation(rejection.body_text()))
    }
}

/// Routes for one resource under `/{collection}`.
pub fn routes<R: Resource>() -> Router<AppState> {
    let base = format!("/{}", R::COLLECTION);
    Router::new()
        .route(&base, get(list::<R>))
        .route(&format!("{base}/view"), get(view_all::<R>))
        .route(&format!("{base}/view/{{id}}"), get(view_one::<R>))
        .route(
            &format!("{base}/create"),
            get(create_form::<R>).post(create::<R>),
        )
        .route(
            &format!("{base}/update"),
            get(update_form::<R>).post(update::<R>),
        )
        .route(
            &format!("{base}/delete"),
            get(delete_form::<R>).post(delete::<R>),
        )
        .route(&format!("{base}/{{id}}"), get(fetch::<R>))
}

/// Builds a model from submitted form pairs.
///
/// Empty inputs are left out so optional and defaulted fields take their
/// defaults; numeric columns are parsed here so a bad number is reported by
/// field name.
pub fn decode_form<R: Resource>(pairs: &[(String, String)]) -> Result<R::Model> {
    let mut object = Map::new();
    for field in pages::fields::<R::Entity>() {
        let Some((_, raw)) = pairs.iter().find(|(name, _)| *name == field.name) else {
            continue;
        };
        let raw = if field.kind == InputKind::Password {
            raw.as_str()
        } else {
            raw.trim()
        };
        if raw.is_empty() {
            continue;
        }
        object.insert(field.name.clone(), form_value::<R>(&field, raw)?);
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| Error::validation(format!("Invalid {}: {e}", R::LABEL)))
}

fn form_value<R: Resource>(field: &Field, raw: &str) -> Result<Value> {
    let invalid = || {
        Error::validation(format!(
            "{} {} must be a number, got {raw:?}",
            R::LABEL,
            field.name
        ))
    };
    Ok(match field.kind {
        InputKind::Integer => Value::Number(raw.parse::<i64>().map_err(|_| invalid())?.into()),
        InputKind::Decimal => {
            let parsed = raw.parse::<f64>().map_err(|_| invalid())?;
            Value::Number(Number::from_f64(parsed).ok_or_else(invalid)?)
        }
        InputKind::Checkbox => Value::Bool(matches!(raw, "on" | "true" | "1")),
        InputKind::Text | InputKind::Date | InputKind::Password => Value::String(raw.to_string()),
    })
}

async fn list<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<R::Model>>> {
    user.require(R::ACCESS.read)?;
    Ok(Json(resource::list::<R>(&state.db).await?))
}

async fn fetch<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
    KeyPath(id): KeyPath<R::Id>,
) -> Result<Json<Value>> {
    user.require(R::ACCESS.read)?;
    let row = resource::get::<R>(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "data": row })))
}

async fn view_all<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Html<String>> {
    user.require(R::ACCESS.read)?;
    let rows = resource::list::<R>(&state.db).await?;
    let fields = pages::fields::<R::Entity>();
    let base = format!("/{}", R::COLLECTION);

    let mut body = pages::table(&fields, &rows, Some(&format!("{base}/view")));
    body.push_str(&pages::link_list([
        ("Create", format!("{base}/create")),
        ("Update", format!("{base}/update")),
        ("Delete", format!("{base}/delete")),
    ]));
    Ok(pages::layout(R::LABEL, &body))
}

async fn view_one<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
    KeyPath(id): KeyPath<R::Id>,
) -> Result<Html<String>> {
    user.require(R::ACCESS.read)?;
    let row = resource::get::<R>(&state.db, id.clone()).await?;
    let fields = pages::fields::<R::Entity>();
    let base = format!("/{}", R::COLLECTION);

    let mut body = pages::detail(&fields, &row);
    body.push_str(&pages::link_list([
        ("Edit", format!("{base}/update?id={id}")),
        ("Back", format!("{base}/view")),
    ]));
    Ok(pages::layout(&format!("{} {id}", R::LABEL), &body))
}

async fn create_form<R: Resource>(user: CurrentUser) -> Result<Html<String>> {
    user.require(R::ACCESS.write)?;
    let action = format!("/{}/create", R::COLLECTION);
    let body = pages::form(&action, &pages::fields::<R::Entity>(), &Map::new(), "Create");
    Ok(pages::layout(&format!("New {}", R::LABEL), &body))
}

async fn update_form<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<IdQuery>,
) -> Result<Html<String>> {
    user.require(R::ACCESS.write)?;
    let values = match query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(raw) => {
            let id: R::Id = serde_json::from_value(id_value::<R>(raw))
                .map_err(|_| Error::validation(format!("Invalid {} id {raw:?}", R::LABEL)))?;
            pages::to_object(&resource::get::<R>(&state.db, id).await?)
        }
        None => Map::new(),
    };
    let action = format!("/{}/update", R::COLLECTION);
    let body = pages::form(&action, &pages::fields::<R::Entity>(), &values, "Save");
    Ok(pages::layout(&format!("Edit {}", R::LABEL), &body))
}

/// JSON value for a raw key, numeric when the key column is numeric
fn id_value<R: Resource>(raw: &str) -> Value {
    raw.parse::<i64>()
        .ok()
        .filter(|_| {
            pages::fields::<R::Entity>()
                .first()
                .is_some_and(|f| f.kind == InputKind::Integer)
        })
        .map_or_else(|| Value::String(raw.to_string()), |n| Value::Number(n.into()))
}

async fn delete_form<R: Resource>(user: CurrentUser) -> Result<Html<String>> {
    user.require(R::ACCESS.write)?;
    let action = format!("/{}/delete", R::COLLECTION);
    let id_field: Vec<Field> = pages::fields::<R::Entity>().into_iter().take(1).collect();
    let body = pages::form(&action, &id_field, &Map::new(), "Delete");
    Ok(pages::layout(&format!("Delete {}", R::LABEL), &body))
}

#[instrument(skip_all, fields(resource = R::LABEL))]
async fn create<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<Outcome<R::Model>>> {
    user.require(R::ACCESS.write)?;
    let model = decode_form::<R>(&pairs)?;
    let saved = resource::create::<R>(&state.db, &state.save_context(), model).await?;
    Ok(Json(Outcome {
        operation: "create".to_string(),
        success: true,
        message: format!("{} {} created", R::LABEL, R::id(&saved)),
        data: Some(saved),
    }))
}

#[instrument(skip_all, fields(resource = R::LABEL))]
async fn update<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<Outcome<R::Model>>> {
    user.require(R::ACCESS.write)?;
    let model = decode_form::<R>(&pairs)?;
    let saved = resource::update::<R>(&state.db, &state.save_context(), model).await?;
    Ok(Json(Outcome {
        operation: "update".to_string(),
        success: true,
        message: format!("{} {} updated", R::LABEL, R::id(&saved)),
        data: Some(saved),
    }))
}

#[instrument(skip_all, fields(resource = R::LABEL))]
async fn delete<R: Resource>(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<IdForm<R::Id>>,
) -> Result<Json<Outcome<R::Model>>> {
    user.require(R::ACCESS.write)?;
    let shown = form.id.to_string();
    resource::delete::<R>(&state.db, form.id).await?;
    Ok(Json(Outcome {
        operation: "delete".to_string(),
        success: true,
        data: None,
        message: format!("{} {shown} deleted", R::LABEL),
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::catalog::{Cards, Stops, TransportUnits, Users};

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_decode_form_types() {
        let card = decode_form::<Cards>(&pairs(&[
            ("id", "12"),
            ("id_user", " 3 "),
            ("id_type_card", "1"),
            ("last_used", ""),
        ]))
        .unwrap();
        assert_eq!(card.id, 12);
        assert_eq!(card.id_user, 3);
        assert!(card.last_used.is_none());
        assert!(card.balance.abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_form_bad_number() {
        let err = decode_form::<Stops>(&pairs(&[("id", "x1"), ("name", "A"), ("location", "B")]))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("Stop id must be a number"));
    }

    #[test]
    fn test_decode_form_missing_field() {
        let err = decode_form::<Stops>(&pairs(&[("id", "1"), ("name", "A")])).unwrap_err();
        assert!(err.to_string().starts_with("Invalid Stop"));
    }

    #[test]
    fn test_decode_form_blank_password_defaults() {
        let user = decode_form::<Users>(&pairs(&[
            ("id", "1"),
            ("identification", "99"),
            ("name", "Ann"),
            ("lastname", "Lee"),
            ("email", "ann@transit.test"),
            ("password", ""),
            ("id_rol_user", "1"),
            ("id_shift", "1"),
        ]))
        .unwrap();
        assert!(user.password.is_empty());
    }

    #[test]
    fn test_id_value_follows_key_type() {
        assert_eq!(id_value::<Stops>("7"), Value::Number(7.into()));
        assert_eq!(
            id_value::<TransportUnits>("7"),
            Value::String("7".to_string())
        );
    }
}
