//! Trip planner: finds route combinations linking two locations.
//!
//! A connection starts on a route serving a stop at the origin location, changes
//! at a stop shared with a second route, and ends on that second route, which
//! serves a stop at the destination. A single route serving both locations is
//! reported once as a direct connection.

use crate::entities::{Route, RouteStop, Stop, route, stop};
use crate::errors::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// One way of travelling from the origin to the destination
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Connection {
    /// Route serving the origin
    pub start_route: route::Model,
    /// Stop where the passenger changes routes; `None` for a direct trip
    pub interchange: Option<stop::Model>,
    /// Route serving the destination
    pub final_route: route::Model,
}

impl Connection {
    /// Whether the trip needs no change of route
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.interchange.is_none()
    }

    /// One-line description for the planner page
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.interchange {
            Some(stop) => format!(
                "Start route: {}, Interchange: {}, Final route: {}",
                self.start_route.name, stop.location, self.final_route.name
            ),
            None => format!("Direct route: {}", self.start_route.name),
        }
    }
}

async fn stops_at(db: &DatabaseConnection, location: &str) -> Result<BTreeSet<i64>> {
    let stops = Stop::find()
        .filter(stop::Column::Location.eq(location.trim()))
        .all(db)
        .await?;
    Ok(stops.into_iter().map(|s| s.id).collect())
}

fn routes_serving(served: &BTreeMap<i64, BTreeSet<i64>>, stops: &BTreeSet<i64>) -> Vec<i64> {
    served
        .iter()
        .filter(|(_, route_stops)| !route_stops.is_disjoint(stops))
        .map(|(route_id, _)| *route_id)
        .collect()
}

/// Lists every connection from `origin` to `destination`.
///
/// Locations match stop locations exactly after trimming. An unknown location
/// yields an empty list. Results are ordered by start route, final route and
/// interchange stop id.
#[instrument(skip(db))]
pub async fn find_connections(
    db: &DatabaseConnection,
    origin: &str,
    destination: &str,
) -> Result<Vec<Connection>> {
    let origin_stops = stops_at(db, origin).await?;
    let destination_stops = stops_at(db, destination).await?;
    if origin_stops.is_empty() || destination_stops.is_empty() {
        debug!("No stops at one of the locations");
        return Ok(Vec::new());
    }

    let mut served: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for link in RouteStop::find().all(db).await? {
        served.entry(link.id_route).or_default().insert(link.id_stop);
    }

    let starts = routes_serving(&served, &origin_stops);
    let finals = routes_serving(&served, &destination_stops);
    if starts.is_empty() || finals.is_empty() {
        return Ok(Vec::new());
    }

    // (start route, interchange stop, final route)
    let mut legs: Vec<(i64, Option<i64>, i64)> = Vec::new();
    for start in &starts {
        for end in &finals {
            if start == end {
                legs.push((*start, None, *end));
                continue;
            }
            if let (Some(a), Some(b)) = (served.get(start), served.get(end)) {
                legs.extend(a.intersection(b).map(|shared| (*start, Some(*shared), *end)));
            }
        }
    }
    if legs.is_empty() {
        return Ok(Vec::new());
    }

    let route_ids: BTreeSet<i64> = legs.iter().flat_map(|(s, _, f)| [*s, *f]).collect();
    let routes: BTreeMap<i64, route::Model> = Route::find()
        .filter(route::Column::Id.is_in(route_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    let stop_ids: BTreeSet<i64> = legs.iter().filter_map(|(_, i, _)| *i).collect();
    let stops: BTreeMap<i64, stop::Model> = Stop::find()
        .filter(stop::Column::Id.is_in(stop_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let connections: Vec<Connection> = legs
        .into_iter()
        .filter_map(|(start, interchange, end)| {
            let interchange = match interchange {
                Some(id) => Some(stops.get(&id)?.clone()),
                None => None,
            };
            Some(Connection {
                start_route: routes.get(&start)?.clone(),
                interchange,
                final_route: routes.get(&end)?.clone(),
            })
        })
        .collect();

    debug!("Found {} connections", connections.len());
    Ok(connections)
}
