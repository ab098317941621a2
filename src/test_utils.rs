//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases and
//! seeding them with a small, known data set. Tests describe the expected rows
//! in terms of these fixtures, so keep the comments here in sync with them.

use crate::{
    config::settings::{AccountSeed, AuthSettings, RoleSeed, ServerSettings, Settings, ShiftSeed},
    core::{
        access::Scope,
        accounts::{self, PasswordHasher},
        repository,
    },
    entities::{
        self, MaintenanceStatus, Route, RouteStop, Schedule, Stop, TransportUnit, TypeCard,
        TypeTransport,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date for fixtures.
///
/// # Panics
/// Panics on an impossible date; fixtures are written by hand.
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Settings used by tests.
///
/// # Defaults
/// * one role per scope, ids 1..=7 in `Scope::ALL` order (1 = system, 2 = admin, 3 = passenger)
/// * shift 1: "morning"
/// * account 1: `admin@transit.test` / `adminpass`, role admin
/// * account 2: `rider@transit.test` / `riderpass`, role passenger
#[must_use]
pub fn test_settings() -> Settings {
    let roles = Scope::ALL
        .iter()
        .zip(1..)
        .map(|(scope, id)| RoleSeed {
            id,
            role: scope.as_str().to_string(),
        })
        .collect();

    Settings {
        server: ServerSettings::default(),
        auth: AuthSettings {
            secret_key: "test-secret".to_string(),
            token_ttl_minutes: 30,
        },
        roles,
        shifts: vec![ShiftSeed {
            id: 1,
            shift_type: "morning".to_string(),
        }],
        accounts: vec![
            account(1, "Ada", "admin@transit.test", "adminpass", 2),
            account(2, "Rui", "rider@transit.test", "riderpass", 3),
        ],
    }
}

fn account(id: i64, name: &str, email: &str, password: &str, role_id: i64) -> AccountSeed {
    AccountSeed {
        id,
        identification: 1000 + id,
        name: name.to_string(),
        lastname: "Tester".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role_id,
        shift_id: 1,
    }
}

/// Seeds the roles, shift and two accounts of [`test_settings`].
pub async fn seed_staff(db: &DatabaseConnection, hasher: &PasswordHasher) -> Result<()> {
    accounts::seed(db, &test_settings(), hasher).await
}

/// Email of the account created by [`seed_driver`]
pub const DRIVER_EMAIL: &str = "driver@transit.test";
/// Password of the account created by [`seed_driver`]
pub const DRIVER_PASSWORD: &str = "driverpass";

/// Seeds role 8 "driver", which maps to no scope, and account 3 holding it;
/// requires [`seed_staff`].
pub async fn seed_driver(db: &DatabaseConnection, hasher: &PasswordHasher) -> Result<()> {
    use entities::{RolUser, User, rol_user, user};

    repository::insert::<RolUser>(
        db,
        "RolUser",
        rol_user::Model {
            id: 8,
            role: "driver".to_string(),
        },
    )
    .await?;
    repository::insert::<User>(
        db,
        "User",
        user::Model {
            id: 3,
            identification: 1003,
            name: "Dov".to_string(),
            lastname: "Tester".to_string(),
            email: DRIVER_EMAIL.to_string(),
            password: hasher.digest(DRIVER_PASSWORD)?,
            id_rol_user: 8,
            id_shift: 1,
        },
    )
    .await?;
    Ok(())
}

/// Seeds a small route network.
///
/// * transport type 1 "bus", schedule 1
/// * stops: 1 "Central Station", 2 "Market Square", 3 "Harbor" (by location)
/// * route 1 "North Line": stops 1, 2
/// * route 2 "East Line": stops 2, 3
/// * route 3 "Loop": stops 1, 3
pub async fn seed_network(db: &DatabaseConnection) -> Result<()> {
    use entities::{route, route_stop, schedule, stop, type_transport};

    repository::insert::<TypeTransport>(
        db,
        "TypeTransport",
        type_transport::Model {
            id: 1,
            transport_type: "bus".to_string(),
        },
    )
    .await?;
    repository::insert::<Schedule>(
        db,
        "Schedule",
        schedule::Model {
            id: 1,
            arrival: "06:00".to_string(),
            departure: "22:00".to_string(),
        },
    )
    .await?;

    for (id, name) in [(1, "North Line"), (2, "East Line"), (3, "Loop")] {
        repository::insert::<Route>(
            db,
            "Route",
            route::Model {
                id,
                id_schedule: 1,
                name: name.to_string(),
            },
        )
        .await?;
    }

    for (id, name, location) in [
        (1, "Central", "Central Station"),
        (2, "Market", "Market Square"),
        (3, "Harbor", "Harbor"),
    ] {
        repository::insert::<Stop>(
            db,
            "Stop",
            stop::Model {
                id,
                name: name.to_string(),
                location: location.to_string(),
            },
        )
        .await?;
    }

    for (id, id_route, id_stop) in [(1, 1, 1), (2, 1, 2), (3, 2, 2), (4, 2, 3), (5, 3, 1), (6, 3, 3)] {
        repository::insert::<RouteStop>(
            db,
            "RouteStop",
            route_stop::Model {
                id,
                id_route,
                id_stop,
            },
        )
        .await?;
    }
    Ok(())
}

/// Seeds vehicles and maintenance jobs; requires [`seed_network`].
///
/// * units: "BUS-1" active on route 1, "BUS-2" inactive on route 2
/// * statuses: 1 "pending", 2 "completed"
/// * jobs: 1 BUS-1 2025-06-01 pending, 2 BUS-2 2025-06-10 completed,
///   3 BUS-1 2025-07-01 pending
pub async fn seed_fleet(db: &DatabaseConnection) -> Result<()> {
    use entities::{maintenance, maintenance_status, transport_unit};

    for (id, id_route, status) in [("BUS-1", 1, "active"), ("BUS-2", 2, "inactive")] {
        repository::insert::<TransportUnit>(
            db,
            "TransportUnit",
            transport_unit::Model {
                id: id.to_string(),
                location: "Depot".to_string(),
                capacity: 60,
                id_route,
                id_type_transport: 1,
                status: status.to_string(),
            },
        )
        .await?;
    }

    for (id, status) in [(1, "pending"), (2, "completed")] {
        repository::insert::<MaintenanceStatus>(
            db,
            "MaintenanceStatus",
            maintenance_status::Model {
                id,
                status: status.to_string(),
            },
        )
        .await?;
    }

    for (id, unit, status, day) in [
        (1, "BUS-1", 1, date(2025, 6, 1)),
        (2, "BUS-2", 2, date(2025, 6, 10)),
        (3, "BUS-1", 1, date(2025, 7, 1)),
    ] {
        repository::insert::<entities::Maintenance>(
            db,
            "Maintenance",
            maintenance::Model {
                id,
                id_unit: unit.to_string(),
                id_status: status,
                maintenance_type: "inspection".to_string(),
                date: day,
            },
        )
        .await?;
    }
    Ok(())
}

/// Seeds card types and two cards for user 1; requires [`seed_staff`].
///
/// * types: 1 "student", 2 "senior"
/// * card 10: type 1, last used 2025-05-01
/// * card 11: type 2, last used 2025-05-20
pub async fn seed_cards(db: &DatabaseConnection) -> Result<()> {
    use entities::{card, type_card};

    for (id, card_type) in [(1, "student"), (2, "senior")] {
        repository::insert::<TypeCard>(
            db,
            "TypeCard",
            type_card::Model {
                id,
                card_type: card_type.to_string(),
            },
        )
        .await?;
    }

    for (id, id_type_card, used) in [(10, 1, date(2025, 5, 1)), (11, 2, date(2025, 5, 20))] {
        repository::insert::<entities::Card>(
            db,
            "Card",
            card::Model {
                id,
                id_user: 1,
                id_type_card,
                balance: 0.0,
                last_used: Some(used),
            },
        )
        .await?;
    }
    Ok(())
}
