//! Ticket entity - Support ticket that groups reported incidences.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ticket")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Ticket state, e.g. `"open"` or `"closed"`
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incidence::Entity")]
    Incidences,
}

impl Related<super::incidence::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incidences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
