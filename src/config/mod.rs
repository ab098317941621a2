/// Database configuration and connection management
pub mod database;

/// Application settings and seed data from config.toml
pub mod settings;
