//! Stop entity - A boarding point identified by its location.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stop database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stop")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Display name of the stop
    pub name: String,
    /// Location the trip planner matches against (e.g., "Central Station")
    pub location: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::route_stop::Entity")]
    RouteStops,
}

impl Related<super::route_stop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RouteStops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
