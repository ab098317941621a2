//! Schedule entity - Service window a route runs in.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule database model. Times are `HH:MM` strings as typed in the admin forms.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// First arrival of the day
    pub arrival: String,
    /// Last departure of the day
    pub departure: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::route::Entity")]
    Routes,
}

impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Routes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
