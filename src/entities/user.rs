//! User entity - Passengers and staff accounts.
//!
//! Every user holds exactly one role (`id_rol_user`) whose name is the scope put
//! into issued tokens. The `password` column stores an Argon2 hash, never the
//! plain text, and is skipped when the model is serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// National identification number
    pub identification: i64,
    /// Given name
    pub name: String,
    /// Family name
    pub lastname: String,
    /// Login name; unique across users
    #[sea_orm(unique)]
    pub email: String,
    /// Password hash (PHC string). Accepted on input, never written out.
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Role held by this user
    pub id_rol_user: i64,
    /// Shift the user works
    pub id_shift: i64,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user holds one role
    #[sea_orm(
        belongs_to = "super::rol_user::Entity",
        from = "Column::IdRolUser",
        to = "super::rol_user::Column::Id"
    )]
    RolUser,
    /// Each user works one shift
    #[sea_orm(
        belongs_to = "super::shift::Entity",
        from = "Column::IdShift",
        to = "super::shift::Column::Id"
    )]
    Shift,
    /// One user owns many cards
    #[sea_orm(has_many = "super::card::Entity")]
    Cards,
}

impl Related<super::rol_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RolUser.def()
    }
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
