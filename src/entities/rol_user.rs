//! Role entity - Each row names one access scope a user can hold.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rol_user")]
pub struct Model {
    /// Unique identifier for the role
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Scope name granted to users holding this role (e.g., `"admin"`, `"passenger"`)
    pub role: String,
}

/// Defines relationships between roles and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One role is held by many users
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
