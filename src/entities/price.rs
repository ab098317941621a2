//! Price entity - Fare charged for riding a given transport type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub id_type_transport: i64,
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::type_transport::Entity",
        from = "Column::IdTypeTransport",
        to = "super::type_transport::Column::Id"
    )]
    TypeTransport,
}

impl Related<super::type_transport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TypeTransport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
