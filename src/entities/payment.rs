//! Payment entity - A fare paid with a card on a given unit.
//!
//! Ties together the movement it produced, the price applied, the card charged
//! and the vehicle boarded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub id_movement: i64,
    pub id_price: i64,
    pub id_card: i64,
    pub id_unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movement::Entity",
        from = "Column::IdMovement",
        to = "super::movement::Column::Id"
    )]
    Movement,
    #[sea_orm(
        belongs_to = "super::price::Entity",
        from = "Column::IdPrice",
        to = "super::price::Column::Id"
    )]
    Price,
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::IdCard",
        to = "super::card::Column::Id"
    )]
    Card,
    #[sea_orm(
        belongs_to = "super::transport_unit::Entity",
        from = "Column::IdUnit",
        to = "super::transport_unit::Column::Id"
    )]
    TransportUnit,
}

impl ActiveModelBehavior for ActiveModel {}
