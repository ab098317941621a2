//! Login, logout and the per-role dashboards.

use crate::core::access::Scope;
use crate::core::{accounts, report};
use crate::errors::{Error, Result};
use crate::web::auth::{CurrentUser, TOKEN_COOKIE};
use crate::web::reports::{MAINTENANCE_REPORT, SUPERVISOR_REPORT};
use crate::web::{AppState, RESOURCES, pages};
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::info;

/// Credentials posted by the login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Account email
    pub username: String,
    pub password: String,
}

/// Body of a successful `POST /login/token`
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed token for the `Authorization` header
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/login/token", post(issue_token))
        .route("/login/user/{scope}", get(dashboard))
        .route("/logout", post(logout))
}

async fn login_page() -> Html<String> {
    let body = "<form method=\"post\" action=\"/login\">\n\
        <label>Email <input name=\"username\" type=\"email\" required></label><br>\n\
        <label>Password <input name=\"password\" type=\"password\" required></label><br>\n\
        <button type=\"submit\">Sign in</button>\n</form>";
    pages::layout("Sign in", body)
}

/// Checks credentials and signs a token carrying the account's scopes.
async fn sign_in(state: &AppState, form: &LoginForm) -> Result<(String, accounts::Account)> {
    let account =
        accounts::authenticate(&state.db, &state.hasher, &form.username, &form.password).await?;
    let token = state.tokens.issue(&account.user.email, &account.scopes)?;
    info!("User {} signed in as {}", account.user.id, account.role);
    Ok((token, account))
}

async fn issue_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let (access_token, _) = sign_in(&state, &form).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse> {
    let (token, account) = sign_in(&state, &form).await?;
    let landing = account
        .scopes
        .first()
        .ok_or_else(|| Error::unauthorized("Account has no role"))?;

    let max_age = state.settings.auth.token_ttl_minutes * 60;
    let cookie = format!("{TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}");
    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to(&format!("/login/user/{landing}")),
    ))
}

async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, format!("{TOKEN_COOKIE}=; HttpOnly; Path=/; Max-Age=0"))],
        Redirect::to("/login"),
    )
}

async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(scope): Path<String>,
) -> Result<Html<String>> {
    let scope: Scope = scope
        .parse()
        .map_err(|_| Error::not_found("Dashboard", &scope))?;
    user.require(&[scope])?;

    let stats = report::dashboard(&state.db).await?;
    let mut body = format!("<p>Signed in as {}</p>\n", pages::escape(&user.email));
    let _ = write!(
        body,
        "<ul>\n<li>Transport units: {}</li>\n<li>Maintenance records: {}</li>\n",
        stats.total_units, stats.total_maintenance
    );
    for role in &stats.users_by_role {
        let _ = writeln!(
            body,
            "<li>Users with role {}: {}</li>",
            pages::escape(&role.role),
            role.users
        );
    }
    body.push_str("</ul>\n");

    if scope == Scope::Passenger {
        if let Some(me) = accounts::find_by_email(&state.db, &user.email).await? {
            let card_type = report::card_type_for_user(&state.db, me.id).await?;
            let last_use = report::last_card_use(&state.db, me.id).await?;
            let _ = writeln!(
                body,
                "<p>Card type: {}</p>\n<p>Last card use: {}</p>",
                pages::escape(card_type.as_deref().unwrap_or("none")),
                last_use.map_or_else(|| "never".to_string(), |d| d.to_string())
            );
        }
    }

    let mut links: Vec<(&str, String)> = RESOURCES
        .iter()
        .filter(|r| r.access.read.contains(&scope))
        .map(|r| (r.label, format!("/{}/view", r.collection)))
        .collect();
    links.push(("Trip planner", "/planner".to_string()));
    if SUPERVISOR_REPORT.contains(&scope) {
        links.push(("Supervisor report", "/reports/supervisor".to_string()));
    }
    if MAINTENANCE_REPORT.contains(&scope) {
        links.push(("Maintenance alerts", "/reports/maintenance-alerts".to_string()));
    }
    body.push_str(&pages::link_list(links));
    body.push_str(
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n",
    );

    Ok(pages::layout(&format!("{scope} dashboard"), &body))
}
