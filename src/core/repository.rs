//! Generic data access shared by every table.
//!
//! These functions work for any SeaORM entity, so each resource gets list, fetch,
//! create, update and delete without table-specific query code. Constraint
//! failures reported by the database are translated into domain errors: a
//! duplicate key becomes [`Error::Conflict`] and a dangling foreign key becomes
//! [`Error::Validation`].

use crate::errors::{Error, Result};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    IntoActiveModel, Iterable, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder,
    SqlErr,
};
use std::fmt::Display;
use tracing::{debug, instrument, warn};

/// Primary key value type of an entity
pub type KeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

fn classify(label: &'static str, err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            debug!("{label}: unique violation: {detail}");
            Error::Conflict {
                message: format!("{label} with the same key already exists"),
            }
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            debug!("{label}: foreign key violation: {detail}");
            Error::validation(format!("{label} references a record that does not exist"))
        }
        _ => err.into(),
    }
}

/// Stages every column of `model` so the whole row is written.
fn stage_all<E>(model: E::Model) -> E::ActiveModel
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    let mut active = model.into_active_model();
    for column in E::Column::iter() {
        active.reset(column);
    }
    active
}

/// Returns every row ordered by primary key.
pub async fn list_all<E>(db: &DatabaseConnection) -> Result<Vec<E::Model>>
where
    E: EntityTrait,
{
    let mut query = E::find();
    for key in E::PrimaryKey::iter() {
        query = query.order_by_asc(key.into_column());
    }
    query.all(db).await.map_err(Into::into)
}

/// Looks up one row by primary key.
pub async fn find_by_id<E, K>(db: &DatabaseConnection, id: K) -> Result<Option<E::Model>>
where
    E: EntityTrait,
    K: Into<KeyOf<E>>,
{
    E::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Like [`find_by_id`] but a missing row is [`Error::NotFound`].
pub async fn get_by_id<E, K>(db: &DatabaseConnection, label: &'static str, id: K) -> Result<E::Model>
where
    E: EntityTrait,
    K: Into<KeyOf<E>> + Display,
{
    let shown = id.to_string();
    find_by_id::<E, K>(db, id)
        .await?
        .ok_or_else(|| Error::not_found(label, shown))
}

/// Inserts `model` as a new row, primary key included.
#[instrument(skip(db, model))]
pub async fn insert<E>(db: &DatabaseConnection, label: &'static str, model: E::Model) -> Result<E::Model>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    let saved = stage_all::<E>(model)
        .insert(db)
        .await
        .map_err(|e| classify(label, e))?;
    debug!("{label} created");
    Ok(saved)
}

/// Overwrites the row identified by `id` with every field of `model`.
///
/// # Errors
/// Returns [`Error::NotFound`] when no row has that key.
#[instrument(skip(db, id, model))]
pub async fn update<E, K>(
    db: &DatabaseConnection,
    label: &'static str,
    id: K,
    model: E::Model,
) -> Result<E::Model>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    K: Into<KeyOf<E>> + Display,
{
    let shown = id.to_string();
    if find_by_id::<E, K>(db, id).await?.is_none() {
        return Err(Error::not_found(label, shown));
    }

    stage_all::<E>(model)
        .update(db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => Error::not_found(label, shown),
            other => classify(label, other),
        })
}

/// Deletes the row identified by `id`.
///
/// # Errors
/// Returns [`Error::NotFound`] when nothing was deleted, or a validation error
/// when other rows still reference it.
#[instrument(skip(db, id))]
pub async fn delete_by_id<E, K>(db: &DatabaseConnection, label: &'static str, id: K) -> Result<()>
where
    E: EntityTrait,
    K: Into<KeyOf<E>> + Display,
{
    let shown = id.to_string();
    let result = E::delete_by_id(id).exec(db).await.map_err(|e| {
        if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
            warn!("{label} {shown} is still referenced");
            Error::Conflict {
                message: format!("{label} {shown} is still referenced by other records"),
            }
        } else {
            e.into()
        }
    })?;

    if result.rows_affected == 0 {
        return Err(Error::not_found(label, shown));
    }
    Ok(())
}

/// Number of rows in the table.
pub async fn count<E>(db: &DatabaseConnection) -> Result<u64>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sync,
{
    E::find().count(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{RolUser, Shift, User, rol_user, shift, user};
    use crate::test_utils::setup_test_db;

    fn role(id: i64, name: &str) -> rol_user::Model {
        rol_user::Model {
            id,
            role: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_ordered() -> Result<()> {
        let db = setup_test_db().await?;
        insert::<RolUser>(&db, "Role", role(3, "supervisor")).await?;
        insert::<RolUser>(&db, "Role", role(1, "admin")).await?;

        let roles = list_all::<RolUser>(&db).await?;
        let ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(count::<RolUser>(&db).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_key_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        insert::<RolUser>(&db, "Role", role(1, "admin")).await?;

        let result = insert::<RolUser>(&db, "Role", role(1, "system")).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_parent_is_validation_error() -> Result<()> {
        let db = setup_test_db().await?;
        let orphan = user::Model {
            id: 1,
            identification: 10,
            name: "Nobody".to_string(),
            lastname: "Here".to_string(),
            email: "nobody@transit.test".to_string(),
            password: "x".to_string(),
            id_rol_user: 99,
            id_shift: 99,
        };

        let result = insert::<User>(&db, "User", orphan).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rewrites_row() -> Result<()> {
        let db = setup_test_db().await?;
        insert::<Shift>(
            &db,
            "Shift",
            shift::Model {
                id: 1,
                shift_type: "morning".to_string(),
            },
        )
        .await?;

        let updated = update::<Shift, _>(
            &db,
            "Shift",
            1,
            shift::Model {
                id: 1,
                shift_type: "night".to_string(),
            },
        )
        .await?;
        assert_eq!(updated.shift_type, "night");

        let fetched = get_by_id::<Shift, _>(&db, "Shift", 1).await?;
        assert_eq!(fetched.shift_type, "night");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update::<RolUser, _>(&db, "Role", 5, role(5, "admin")).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete() -> Result<()> {
        let db = setup_test_db().await?;
        insert::<RolUser>(&db, "Role", role(1, "admin")).await?;

        delete_by_id::<RolUser, _>(&db, "Role", 1).await?;
        assert!(find_by_id::<RolUser, _>(&db, 1).await?.is_none());

        let again = delete_by_id::<RolUser, _>(&db, "Role", 1).await;
        assert_eq!(again.unwrap_err().to_string(), "Role 1 not found");
        Ok(())
    }
}
