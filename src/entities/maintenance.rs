//! Maintenance entity - A maintenance job planned or performed on a unit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maintenance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance")]
pub struct Model {
    /// Unique identifier for the job
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Vehicle being serviced
    pub id_unit: String,
    /// Current workflow state
    pub id_status: i64,
    /// Kind of work (e.g., "brakes", "oil change")
    pub maintenance_type: String,
    /// Day the job is scheduled for
    pub date: Date,
}

/// Defines relationships between Maintenance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each job services one unit
    #[sea_orm(
        belongs_to = "super::transport_unit::Entity",
        from = "Column::IdUnit",
        to = "super::transport_unit::Column::Id"
    )]
    TransportUnit,
    /// Each job is in one state
    #[sea_orm(
        belongs_to = "super::maintenance_status::Entity",
        from = "Column::IdStatus",
        to = "super::maintenance_status::Column::Id"
    )]
    MaintenanceStatus,
}

impl Related<super::transport_unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransportUnit.def()
    }
}

impl Related<super::maintenance_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceStatus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
