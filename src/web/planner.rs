//! Trip planner pages. Any signed-in user may plan a trip.

use crate::core::planner::{self, Connection};
use crate::errors::Result;
use crate::web::auth::CurrentUser;
use crate::web::{AppState, pages};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use std::fmt::Write;

/// Origin and destination locations
#[derive(Debug, Deserialize)]
pub struct TripQuery {
    /// Location of the boarding stop
    pub origin: String,
    /// Location of the alighting stop
    pub destination: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/planner", get(planner_page))
        .route("/planner/locations", post(plan))
        .route("/planner/connections", get(connections))
}

async fn planner_page(_user: CurrentUser) -> Html<String> {
    let body = "<form method=\"post\" action=\"/planner/locations\">\n\
        <label>From <input name=\"origin\" type=\"text\" required></label><br>\n\
        <label>To <input name=\"destination\" type=\"text\" required></label><br>\n\
        <button type=\"submit\">Find routes</button>\n</form>";
    pages::layout("Plan a trip", body)
}

fn render(query: &TripQuery, found: &[Connection]) -> String {
    let mut body = format!(
        "<p>From <strong>{}</strong> to <strong>{}</strong></p>\n",
        pages::escape(query.origin.trim()),
        pages::escape(query.destination.trim())
    );
    if found.is_empty() {
        body.push_str("<p>No connections found.</p>\n");
        return body;
    }
    body.push_str("<ol>\n");
    for connection in found {
        let _ = writeln!(body, "<li>{}</li>", pages::escape(&connection.summary()));
    }
    body.push_str("</ol>\n<p><a href=\"/planner\">New search</a></p>\n");
    body
}

async fn plan(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(query): Form<TripQuery>,
) -> Result<Html<String>> {
    let found = planner::find_connections(&state.db, &query.origin, &query.destination).await?;
    Ok(pages::layout("Trip options", &render(&query, &found)))
}

async fn connections(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<TripQuery>,
) -> Result<Json<Vec<Connection>>> {
    let found = planner::find_connections(&state.db, &query.origin, &query.destination).await?;
    Ok(Json(found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        let query = TripQuery {
            origin: "A".to_string(),
            destination: "<B>".to_string(),
        };
        let html = render(&query, &[]);
        assert!(html.contains("No connections found."));
        assert!(html.contains("&lt;B&gt;"));
    }
}
