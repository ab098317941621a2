//! Supervisor and maintenance reports.

use crate::core::access::Scope;
use crate::core::report::{self, MaintenanceAlert, SupervisorReport};
use crate::errors::Result;
use crate::web::auth::CurrentUser;
use crate::web::{AppState, pages};
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use std::fmt::Write;

/// Scopes allowed to read the supervisor report
pub const SUPERVISOR_REPORT: &[Scope] = &[Scope::System, Scope::Admin, Scope::Supervisor];
/// Scopes allowed to read maintenance alerts
pub const MAINTENANCE_REPORT: &[Scope] = &[Scope::System, Scope::Admin, Scope::Maintenance];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/supervisor", get(supervisor_page))
        .route("/reports/supervisor/data", get(supervisor_data))
        .route("/reports/maintenance-alerts", get(maintenance_alerts))
}

async fn supervisor_data(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SupervisorReport>> {
    user.require(SUPERVISOR_REPORT)?;
    Ok(Json(report::supervisor_report(&state.db).await?))
}

async fn supervisor_page(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Html<String>> {
    user.require(SUPERVISOR_REPORT)?;
    let figures = report::supervisor_report(&state.db).await?;
    let average = figures
        .average_hours_worked
        .map_or_else(|| "n/a".to_string(), |h| format!("{h:.2}"));

    let body = format!(
        "<ul>\n<li>Movements: {}</li>\n<li>Users: {}</li>\n<li>Active units: {}</li>\n\
         <li>Inactive units: {}</li>\n<li>Average hours worked: {average}</li>\n</ul>\n",
        figures.total_movements, figures.total_users, figures.active_units, figures.inactive_units
    );
    Ok(pages::layout("Supervisor report", &body))
}

fn alert_table(alerts: &[MaintenanceAlert]) -> String {
    if alerts.is_empty() {
        return "<p>None.</p>\n".to_string();
    }
    let mut html =
        String::from("<table>\n<thead><tr><th>id</th><th>unit</th><th>type</th><th>date</th><th>status</th></tr></thead>\n<tbody>\n");
    for alert in alerts {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            alert.job.id,
            pages::escape(&alert.job.id_unit),
            pages::escape(&alert.job.maintenance_type),
            alert.job.date,
            pages::escape(alert.status.as_deref().unwrap_or("")),
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

async fn maintenance_alerts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Html<String>> {
    user.require(MAINTENANCE_REPORT)?;
    let today = Local::now().date_naive();
    let overdue = report::overdue_maintenance(&state.db, today).await?;
    let upcoming = report::upcoming_maintenance(&state.db, today).await?;

    let body = format!(
        "<h2>Overdue</h2>\n{}<h2>Upcoming</h2>\n{}",
        alert_table(&overdue),
        alert_table(&upcoming)
    );
    Ok(pages::layout("Maintenance alerts", &body))
}
