//! Resource definitions for every table served by the admin API.
//!
//! Most tables only need a label, a collection path and an access policy, so
//! they are declared with the `resource!` macro. Cards, users and transport units carry
//! write rules of their own and are implemented by hand below.

use crate::core::access::{Access, Scope};
use crate::core::resource::{Resource, SaveContext, require_text};
use crate::entities::{
    attendance, card, incidence, maintenance, maintenance_status, movement, payment, pqr, price,
    rol_user, route, route_stop, schedule, shift, stop, ticket, transport_unit, type_card,
    type_movement, type_transport, user,
};
use crate::errors::{Error, Result};

const READ_NETWORK: &[Scope] = &[
    Scope::System,
    Scope::Admin,
    Scope::Planner,
    Scope::Operator,
    Scope::Passenger,
];
const WRITE_NETWORK: &[Scope] = &[Scope::System, Scope::Admin, Scope::Planner];
const FLEET: &[Scope] = &[Scope::System, Scope::Admin, Scope::Maintenance];
const READ_FLEET: &[Scope] = &[
    Scope::System,
    Scope::Admin,
    Scope::Maintenance,
    Scope::Supervisor,
    Scope::Operator,
    Scope::Planner,
];
const SUPERVISION: &[Scope] = &[Scope::System, Scope::Admin, Scope::Supervisor];
const FIELD_OPS: &[Scope] = &[
    Scope::System,
    Scope::Admin,
    Scope::Supervisor,
    Scope::Operator,
];
const STAFF: &[Scope] = &[Scope::System, Scope::Admin];
const CARD_HOLDERS: &[Scope] = &[Scope::System, Scope::Admin, Scope::Passenger];

/// Declares a resource keyed by an integer `id`. Fields listed under
/// `required` must not be blank on create or update.
macro_rules! resource {
    (
        $(#[$meta:meta])*
        $name:ident => $module:ident, $label:literal, $collection:literal, $access:expr
        $(, required: [$($field:ident),+ $(,)?])?
    ) => {
        $(#[$meta])*
        pub struct $name;

        impl Resource for $name {
            type Entity = $module::Entity;
            type Model = $module::Model;
            type ActiveModel = $module::ActiveModel;
            type Id = i64;

            const LABEL: &'static str = $label;
            const COLLECTION: &'static str = $collection;
            const ACCESS: Access = $access;

            fn id(model: &Self::Model) -> i64 {
                model.id
            }

            $(
                fn prepare_insert(model: Self::Model, _ctx: &SaveContext<'_>) -> Result<Self::Model> {
                    $(require_text(Self::LABEL, stringify!($field), &model.$field)?;)+
                    Ok(model)
                }
            )?
        }
    };
}

resource!(
    /// Support tickets raised from incidences
    Tickets => ticket, "Ticket", "tickets", Access::new(FIELD_OPS, FIELD_OPS),
    required: [status]
);
resource!(
    Routes => route, "Route", "routes", Access::new(READ_NETWORK, WRITE_NETWORK),
    required: [name]
);
resource!(
    Stops => stop, "Stop", "stops", Access::new(READ_NETWORK, WRITE_NETWORK),
    required: [name, location]
);
resource!(
    /// Which stops each route serves; read by the trip planner
    RouteStops => route_stop, "RouteStop", "route_stops", Access::new(READ_NETWORK, WRITE_NETWORK)
);
resource!(
    Schedules => schedule, "Schedule", "schedules", Access::new(READ_NETWORK, WRITE_NETWORK)
);
resource!(
    MaintenanceJobs => maintenance, "Maintenance", "maintainance", Access::new(READ_FLEET, FLEET),
    required: [maintenance_type]
);
resource!(
    MaintenanceStatuses => maintenance_status, "MaintenanceStatus", "maintainance_status",
    Access::new(READ_FLEET, FLEET),
    required: [status]
);
resource!(
    Payments => payment, "Payment", "payments", Access::new(SUPERVISION, STAFF)
);
resource!(
    Incidences => incidence, "Incidence", "incidences", Access::new(FIELD_OPS, FIELD_OPS),
    required: [description]
);
resource!(
    /// Petitions, complaints and claims filed by passengers
    Pqrs => pqr, "Pqr", "pqr", Access::new(SUPERVISION, CARD_HOLDERS),
    required: [description]
);
resource!(
    Roles => rol_user, "RolUser", "roluser", Access::STAFF,
    required: [role]
);
resource!(
    CardTypes => type_card, "TypeCard", "typecard", Access::STAFF,
    required: [card_type]
);
resource!(
    MovementTypes => type_movement, "TypeMovement", "typemovement", Access::STAFF,
    required: [movement_type]
);
resource!(
    TransportTypes => type_transport, "TypeTransport", "typetransport", Access::STAFF,
    required: [transport_type]
);
resource!(
    Shifts => shift, "Shift", "shifts", Access::STAFF,
    required: [shift_type]
);
resource!(
    Movements => movement, "Movement", "movements", Access::new(SUPERVISION, STAFF)
);
resource!(
    Prices => price, "Price", "prices", Access::new(READ_NETWORK, STAFF)
);
resource!(
    /// Clock-in/clock-out records
    AttendanceRecords => attendance, "Attendance", "attendance",
    Access::new(SUPERVISION, SUPERVISION)
);

/// Fare cards. The balance is owned by the service: new cards start empty and
/// edits keep whatever balance is stored.
pub struct Cards;

impl Resource for Cards {
    type Entity = card::Entity;
    type Model = card::Model;
    type ActiveModel = card::ActiveModel;
    type Id = i64;

    const LABEL: &'static str = "Card";
    const COLLECTION: &'static str = "card";
    const ACCESS: Access = Access::new(CARD_HOLDERS, STAFF);

    fn id(model: &Self::Model) -> i64 {
        model.id
    }

    fn prepare_insert(mut model: Self::Model, _ctx: &SaveContext<'_>) -> Result<Self::Model> {
        model.balance = 0.0;
        Ok(model)
    }

    fn prepare_update(
        mut model: Self::Model,
        existing: &Self::Model,
        _ctx: &SaveContext<'_>,
    ) -> Result<Self::Model> {
        model.balance = existing.balance;
        Ok(model)
    }
}

/// Passenger and staff accounts. Passwords arrive in plain text and are stored
/// as salted hashes.
pub struct Users;

impl Users {
    fn check(model: &user::Model) -> Result<()> {
        require_text(Self::LABEL, "name", &model.name)?;
        if !model.email.contains('@') {
            return Err(Error::validation(format!(
                "User email {} is not a valid address",
                model.email
            )));
        }
        Ok(())
    }
}

impl Resource for Users {
    type Entity = user::Entity;
    type Model = user::Model;
    type ActiveModel = user::ActiveModel;
    type Id = i64;

    const LABEL: &'static str = "User";
    const COLLECTION: &'static str = "users";
    const ACCESS: Access = Access::STAFF;

    fn id(model: &Self::Model) -> i64 {
        model.id
    }

    fn prepare_insert(mut model: Self::Model, ctx: &SaveContext<'_>) -> Result<Self::Model> {
        Self::check(&model)?;
        require_text(Self::LABEL, "password", &model.password)?;
        model.email = model.email.trim().to_string();
        model.password = ctx.hasher.digest(&model.password)?;
        Ok(model)
    }

    /// A blank password keeps the stored hash.
    fn prepare_update(
        mut model: Self::Model,
        existing: &Self::Model,
        ctx: &SaveContext<'_>,
    ) -> Result<Self::Model> {
        Self::check(&model)?;
        model.email = model.email.trim().to_string();
        model.password = if model.password.is_empty() {
            existing.password.clone()
        } else {
            ctx.hasher.digest(&model.password)?
        };
        Ok(model)
    }
}

/// Vehicles, keyed by fleet code
pub struct TransportUnits;

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
#[must_use]
pub fn sanitize_unit_code(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Resource for TransportUnits {
    type Entity = transport_unit::Entity;
    type Model = transport_unit::Model;
    type ActiveModel = transport_unit::ActiveModel;
    type Id = String;

    const LABEL: &'static str = "TransportUnit";
    const COLLECTION: &'static str = "transport_units";
    const ACCESS: Access = Access::new(READ_FLEET, SUPERVISION);

    fn id(model: &Self::Model) -> String {
        model.id.clone()
    }

    fn normalize_id(id: String) -> String {
        sanitize_unit_code(&id)
    }

    fn prepare_insert(mut model: Self::Model, _ctx: &SaveContext<'_>) -> Result<Self::Model> {
        model.id = sanitize_unit_code(&model.id);
        require_text(Self::LABEL, "id", &model.id)?;
        if model.capacity <= 0 {
            return Err(Error::validation(format!(
                "TransportUnit capacity must be positive, got {}",
                model.capacity
            )));
        }
        Ok(model)
    }
}
