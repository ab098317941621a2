//! Movement entity - A single value movement recorded against the fare system.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub id_type_movement: i64,
    /// Amount moved; sign follows the movement type
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::type_movement::Entity",
        from = "Column::IdTypeMovement",
        to = "super::type_movement::Column::Id"
    )]
    TypeMovement,
}

impl Related<super::type_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TypeMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
