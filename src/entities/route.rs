//! Route entity - A named line operating on a schedule.
//!
//! The stops a route serves live in the `route_stop` junction table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Route database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route")]
pub struct Model {
    /// Unique identifier for the route
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Schedule the route runs on
    pub id_schedule: i64,
    /// Public name of the route (e.g., "T13 Airport")
    pub name: String,
}

/// Defines relationships between Route and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each route runs on one schedule
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::IdSchedule",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
    /// One route has many stop links
    #[sea_orm(has_many = "super::route_stop::Entity")]
    RouteStops,
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::route_stop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RouteStops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
