//! The `Resource` trait: one implementation per table exposed over HTTP.
//!
//! A resource binds a SeaORM entity to the name shown in messages, the URL
//! segment it is served under, its access policy, and optional hooks run before
//! a row is written. The generic operations in this module apply those hooks and
//! then delegate to [`crate::core::repository`].

use crate::core::access::Access;
use crate::core::accounts::PasswordHasher;
use crate::core::repository::{self, KeyOf};
use crate::errors::{Error, Result};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, ModelTrait,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use tracing::info;

/// Services available to write hooks
#[derive(Clone, Copy)]
pub struct SaveContext<'a> {
    /// Hashes passwords before they are stored
    pub hasher: &'a PasswordHasher,
}

/// A table exposed through the generic CRUD endpoints
pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Serialize
        + DeserializeOwned
        + Clone
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;
    type Id: Into<KeyOf<Self::Entity>> + DeserializeOwned + Display + Clone + Send + Sync + 'static;

    /// Name used in messages, e.g. `"Card"`
    const LABEL: &'static str;
    /// URL segment, e.g. `"card"`
    const COLLECTION: &'static str;
    /// Scopes allowed to read and to write
    const ACCESS: Access;

    /// Primary key of a row
    fn id(model: &Self::Model) -> Self::Id;

    /// Canonical form of a key as submitted by a client. Must agree with the
    /// key `prepare_insert` stores, so a row can be found by the spelling it
    /// was created with.
    fn normalize_id(id: Self::Id) -> Self::Id {
        id
    }

    /// Adjusts or rejects a row before it is inserted.
    ///
    /// # Errors
    /// Returns a validation error when the row is not acceptable.
    fn prepare_insert(model: Self::Model, _ctx: &SaveContext<'_>) -> Result<Self::Model> {
        Ok(model)
    }

    /// Adjusts or rejects a row before it replaces `existing`.
    ///
    /// # Errors
    /// Returns a validation error when the row is not acceptable.
    fn prepare_update(
        model: Self::Model,
        _existing: &Self::Model,
        ctx: &SaveContext<'_>,
    ) -> Result<Self::Model> {
        Self::prepare_insert(model, ctx)
    }
}

/// Rejects blank text fields.
///
/// # Errors
/// Returns [`Error::Validation`] naming the field.
pub fn require_text(label: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{label} {field} cannot be empty")));
    }
    Ok(())
}

/// Every row of the resource, ordered by key
pub async fn list<R: Resource>(db: &DatabaseConnection) -> Result<Vec<R::Model>> {
    repository::list_all::<R::Entity>(db).await
}

/// One row of the resource, or [`Error::NotFound`]
pub async fn get<R: Resource>(db: &DatabaseConnection, id: R::Id) -> Result<R::Model> {
    repository::get_by_id::<R::Entity, _>(db, R::LABEL, R::normalize_id(id)).await
}

/// Runs the insert hook and stores the row.
pub async fn create<R: Resource>(
    db: &DatabaseConnection,
    ctx: &SaveContext<'_>,
    model: R::Model,
) -> Result<R::Model> {
    let model = R::prepare_insert(model, ctx)?;
    let saved = repository::insert::<R::Entity>(db, R::LABEL, model).await?;
    info!("{} {} created", R::LABEL, R::id(&saved));
    Ok(saved)
}

/// Loads the current row, runs the update hook and overwrites it.
pub async fn update<R: Resource>(
    db: &DatabaseConnection,
    ctx: &SaveContext<'_>,
    model: R::Model,
) -> Result<R::Model> {
    let id = R::normalize_id(R::id(&model));
    let existing = get::<R>(db, id.clone()).await?;
    let model = R::prepare_update(model, &existing, ctx)?;
    let saved = repository::update::<R::Entity, _>(db, R::LABEL, id, model).await?;
    info!("{} {} updated", R::LABEL, R::id(&saved));
    Ok(saved)
}

/// Deletes one row of the resource.
pub async fn delete<R: Resource>(db: &DatabaseConnection, id: R::Id) -> Result<()> {
    let id = R::normalize_id(id);
    let shown = id.to_string();
    repository::delete_by_id::<R::Entity, _>(db, R::LABEL, id).await?;
    info!("{} {} deleted", R::LABEL, shown);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("Stop", "name", "Central").is_ok());
        let err = require_text("Stop", "name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Stop name cannot be empty");
    }
}
