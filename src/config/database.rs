//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs, foreign keys included. Creation is idempotent (`IF NOT EXISTS`), which
//! lets the service start against an existing database file.

use crate::entities::{
    Attendance, Card, Incidence, Maintenance, MaintenanceStatus, Movement, Payment, Pqr, Price,
    RolUser, Route, RouteStop, Schedule, Shift, Stop, Ticket, TransportUnit, TypeCard,
    TypeMovement, TypeTransport, User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/transit.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file that is created on first use.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Directory that must exist before `SQLite` can create the database file
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://")?.split('?').next()?;
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every table of the application from the entity definitions.
///
/// Parents are created before the tables that reference them.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, RolUser).await?;
    create_table(db, &schema, Shift).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, TypeCard).await?;
    create_table(db, &schema, Card).await?;
    create_table(db, &schema, TypeMovement).await?;
    create_table(db, &schema, Movement).await?;
    create_table(db, &schema, TypeTransport).await?;
    create_table(db, &schema, Price).await?;
    create_table(db, &schema, Schedule).await?;
    create_table(db, &schema, Route).await?;
    create_table(db, &schema, Stop).await?;
    create_table(db, &schema, RouteStop).await?;
    create_table(db, &schema, TransportUnit).await?;
    create_table(db, &schema, MaintenanceStatus).await?;
    create_table(db, &schema, Maintenance).await?;
    create_table(db, &schema, Payment).await?;
    create_table(db, &schema, Ticket).await?;
    create_table(db, &schema, Incidence).await?;
    create_table(db, &schema, Pqr).await?;
    create_table(db, &schema, Attendance).await?;

    info!("Database tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{card, route_stop, transport_unit, user};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<user::Model> = User::find().limit(1).all(&db).await?;
        let _: Vec<card::Model> = Card::find().limit(1).all(&db).await?;
        let _: Vec<route_stop::Model> = RouteStop::find().limit(1).all(&db).await?;
        let _: Vec<transport_unit::Model> = TransportUnit::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/transit.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://transit.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
