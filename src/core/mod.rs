//! Core business logic, independent of the HTTP layer.

/// Access scopes and per-resource policies
pub mod access;
/// Password hashing, login and account seeding
pub mod accounts;
/// Resource definitions for every table
pub mod catalog;
/// Route interconnection search
pub mod planner;
/// Dashboard and report figures
pub mod report;
/// Generic CRUD over any entity
pub mod repository;
/// The `Resource` trait and its write hooks
pub mod resource;
/// Signed access tokens
pub mod token;
