//! Transport unit entity - A vehicle in the fleet.
//!
//! Units are keyed by their fleet code (e.g. `"BUS-104"`) rather than a number.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transport unit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transport_unit")]
pub struct Model {
    /// Fleet code of the vehicle
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Where the vehicle is parked or operating
    pub location: String,
    /// Passenger capacity
    pub capacity: i32,
    /// Route the vehicle is assigned to
    pub id_route: i64,
    /// Vehicle class
    pub id_type_transport: i64,
    /// Operating status: `"active"` or `"inactive"`
    pub status: String,
}

/// Defines relationships between TransportUnit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each unit is assigned to one route
    #[sea_orm(
        belongs_to = "super::route::Entity",
        from = "Column::IdRoute",
        to = "super::route::Column::Id"
    )]
    Route,
    /// Each unit has one transport type
    #[sea_orm(
        belongs_to = "super::type_transport::Entity",
        from = "Column::IdTypeTransport",
        to = "super::type_transport::Column::Id"
    )]
    TypeTransport,
    /// One unit has many maintenance records
    #[sea_orm(has_many = "super::maintenance::Entity")]
    Maintenance,
}

impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Route.def()
    }
}

impl Related<super::type_transport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TypeTransport.def()
    }
}

impl Related<super::maintenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Maintenance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
