//! Card entity - Stored-value fare cards.
//!
//! A card belongs to one user and one card type. The balance is managed by the
//! service: it starts at zero and is not overwritten by edits from the admin
//! screens.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card")]
pub struct Model {
    /// Unique identifier printed on the card
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Owner of the card
    pub id_user: i64,
    /// Fare category of the card
    pub id_type_card: i64,
    /// Stored value
    #[serde(default)]
    pub balance: f64,
    /// Day the card was last tapped, if ever
    #[serde(default)]
    pub last_used: Option<Date>,
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each card belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::IdUser",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each card has one card type
    #[sea_orm(
        belongs_to = "super::type_card::Entity",
        from = "Column::IdTypeCard",
        to = "super::type_card::Column::Id"
    )]
    TypeCard,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::type_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TypeCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
