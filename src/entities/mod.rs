//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod attendance;
pub mod card;
pub mod incidence;
pub mod maintenance;
pub mod maintenance_status;
pub mod movement;
pub mod payment;
pub mod pqr;
pub mod price;
pub mod rol_user;
pub mod route;
pub mod route_stop;
pub mod schedule;
pub mod shift;
pub mod stop;
pub mod ticket;
pub mod transport_unit;
pub mod type_card;
pub mod type_movement;
pub mod type_transport;
pub mod user;

// Re-export entity types under table-style names
pub use attendance::Entity as Attendance;
pub use card::Entity as Card;
pub use incidence::Entity as Incidence;
pub use maintenance::Entity as Maintenance;
pub use maintenance_status::Entity as MaintenanceStatus;
pub use movement::Entity as Movement;
pub use payment::Entity as Payment;
pub use pqr::Entity as Pqr;
pub use price::Entity as Price;
pub use rol_user::Entity as RolUser;
pub use route::Entity as Route;
pub use route_stop::Entity as RouteStop;
pub use schedule::Entity as Schedule;
pub use shift::Entity as Shift;
pub use stop::Entity as Stop;
pub use ticket::Entity as Ticket;
pub use transport_unit::Entity as TransportUnit;
pub use type_card::Entity as TypeCard;
pub use type_movement::Entity as TypeMovement;
pub use type_transport::Entity as TypeTransport;
pub use user::Entity as User;
