//! Report generation - figures for dashboards and the supervisor and maintenance reports.
//!
//! Functions that depend on the current day take it as a parameter so callers
//! (and tests) decide what "today" is.

use crate::entities::{
    Attendance, Card, Maintenance, MaintenanceStatus, Movement, RolUser, TransportUnit, TypeCard,
    User, attendance, card, maintenance, maintenance_status, rol_user, user,
};
use crate::errors::Result;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use tracing::instrument;

/// Number of users holding one role
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoleCount {
    /// Role name
    pub role: String,
    /// Users holding the role
    pub users: u64,
}

/// Figures shown on every dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Transport units in the fleet
    pub total_units: u64,
    /// Maintenance jobs on record
    pub total_maintenance: u64,
    /// One entry per role, ordered by role id
    pub users_by_role: Vec<RoleCount>,
}

/// Maintenance job together with its status name
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceAlert {
    /// The scheduled job
    pub job: maintenance::Model,
    /// Status name, `None` when the status row is missing
    pub status: Option<String>,
}

/// Figures for the supervisor report
#[derive(Debug, Clone, Serialize)]
pub struct SupervisorReport {
    pub total_movements: u64,
    pub total_users: u64,
    /// Units whose status is "active"
    pub active_units: u64,
    /// Units whose status is "inactive"
    pub inactive_units: u64,
    /// Mean shift length in hours, `None` without usable attendance records
    pub average_hours_worked: Option<f64>,
}

/// Collects the dashboard figures.
#[instrument(skip(db))]
pub async fn dashboard(db: &DatabaseConnection) -> Result<DashboardStats> {
    let total_units = TransportUnit::find().count(db).await?;
    let total_maintenance = Maintenance::find().count(db).await?;

    let roles = RolUser::find()
        .order_by_asc(rol_user::Column::Id)
        .all(db)
        .await?;
    let mut users_by_role = Vec::with_capacity(roles.len());
    for role in roles {
        let users = User::find()
            .filter(user::Column::IdRolUser.eq(role.id))
            .count(db)
            .await?;
        users_by_role.push(RoleCount {
            role: role.role,
            users,
        });
    }

    Ok(DashboardStats {
        total_units,
        total_maintenance,
        users_by_role,
    })
}

/// Jobs scheduled after `today`, soonest first.
pub async fn upcoming_maintenance(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<MaintenanceAlert>> {
    let rows = Maintenance::find()
        .filter(maintenance::Column::Date.gt(today))
        .order_by_asc(maintenance::Column::Date)
        .find_also_related(MaintenanceStatus)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(to_alert).collect())
}

/// Jobs dated before `today` whose status is not "completed".
pub async fn overdue_maintenance(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<MaintenanceAlert>> {
    let rows = Maintenance::find()
        .filter(maintenance::Column::Date.lt(today))
        .order_by_asc(maintenance::Column::Date)
        .find_also_related(MaintenanceStatus)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(to_alert)
        .filter(|alert| {
            !alert
                .status
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case("completed"))
        })
        .collect())
}

fn to_alert(
    (job, status): (maintenance::Model, Option<maintenance_status::Model>),
) -> MaintenanceAlert {
    MaintenanceAlert {
        job,
        status: status.map(|s| s.status),
    }
}

/// Card type name of the first card owned by a user.
pub async fn card_type_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Option<String>> {
    let found = Card::find()
        .filter(card::Column::IdUser.eq(user_id))
        .order_by_asc(card::Column::Id)
        .find_also_related(TypeCard)
        .one(db)
        .await?;
    Ok(found.and_then(|(_, kind)| kind).map(|k| k.card_type))
}

/// Most recent day any of the user's cards was used.
pub async fn last_card_use(db: &DatabaseConnection, user_id: i64) -> Result<Option<NaiveDate>> {
    let cards = Card::find()
        .filter(card::Column::IdUser.eq(user_id))
        .all(db)
        .await?;
    Ok(cards.into_iter().filter_map(|c| c.last_used).max())
}

/// Collects the supervisor report figures.
#[instrument(skip(db))]
pub async fn supervisor_report(db: &DatabaseConnection) -> Result<SupervisorReport> {
    let total_movements = Movement::find().count(db).await?;
    let total_users = User::find().count(db).await?;

    let (mut active_units, mut inactive_units) = (0, 0);
    for unit in TransportUnit::find().all(db).await? {
        match unit.status.trim().to_ascii_lowercase().as_str() {
            "active" => active_units += 1,
            "inactive" => inactive_units += 1,
            _ => {}
        }
    }

    let records = Attendance::find().all(db).await?;
    Ok(SupervisorReport {
        total_movements,
        total_users,
        active_units,
        inactive_units,
        average_hours_worked: average_hours(&records),
    })
}

/// Length of one shift in hours. A clock-out earlier than the clock-in is
/// taken to be on the following day.
fn shift_hours(record: &attendance::Model) -> Option<f64> {
    let start = NaiveTime::parse_from_str(record.start_time.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(record.end_time.trim(), "%H:%M").ok()?;
    let mut minutes = (end - start).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    #[allow(clippy::cast_precision_loss)]
    let hours = minutes as f64 / 60.0;
    Some(hours)
}

/// Mean shift length over records with readable times.
#[must_use]
pub fn average_hours(records: &[attendance::Model]) -> Option<f64> {
    let hours: Vec<f64> = records.iter().filter_map(shift_hours).collect();
    if hours.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = hours.iter().sum::<f64>() / hours.len() as f64;
    Some(mean)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::accounts::PasswordHasher;
    use crate::test_utils::{date, seed_cards, seed_fleet, seed_network, seed_staff, setup_test_db};

    fn record(start: &str, end: &str) -> attendance::Model {
        attendance::Model {
            id: 1,
            id_user: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
            date: date(2025, 3, 1),
        }
    }

    #[test]
    fn test_average_hours() {
        let records = vec![
            record("08:00", "16:00"),
            record("22:00", "06:30"),
            record("bad", "10:00"),
        ];
        let avg = average_hours(&records).unwrap();
        assert!((avg - 8.25).abs() < 1e-9);
        assert!(average_hours(&[]).is_none());
    }

    #[tokio::test]
    async fn test_maintenance_alerts() -> Result<()> {
        let db = setup_test_db().await?;
        seed_network(&db).await?;
        seed_fleet(&db).await?;
        let today = date(2025, 6, 15);

        // seed_fleet: job 1 on 06-01 pending, job 2 on 06-10 completed, job 3 on 07-01 pending
        let upcoming = upcoming_maintenance(&db, today).await?;
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].job.id, 3);

        let overdue = overdue_maintenance(&db, today).await?;
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].job.id, 1);
        assert_eq!(overdue[0].status.as_deref(), Some("pending"));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_and_supervisor_report() -> Result<()> {
        let db = setup_test_db().await?;
        let hasher = PasswordHasher::default();
        seed_staff(&db, &hasher).await?;
        seed_network(&db).await?;
        seed_fleet(&db).await?;

        let stats = dashboard(&db).await?;
        assert_eq!(stats.total_units, 2);
        assert_eq!(stats.total_maintenance, 3);
        let admins = stats.users_by_role.iter().find(|r| r.role == "admin").unwrap();
        assert_eq!(admins.users, 1);

        let report = supervisor_report(&db).await?;
        assert_eq!(report.active_units, 1);
        assert_eq!(report.inactive_units, 1);
        assert_eq!(report.total_movements, 0);
        assert!(report.average_hours_worked.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_card_lookups() -> Result<()> {
        let db = setup_test_db().await?;
        let hasher = PasswordHasher::default();
        seed_staff(&db, &hasher).await?;

        assert!(card_type_for_user(&db, 1).await?.is_none());
        assert!(last_card_use(&db, 1).await?.is_none());

        seed_cards(&db).await?;
        assert_eq!(card_type_for_user(&db, 1).await?.as_deref(), Some("student"));
        assert_eq!(last_card_use(&db, 1).await?, Some(date(2025, 5, 20)));
        Ok(())
    }
}
