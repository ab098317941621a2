//! Application settings loaded from config.toml
//!
//! The settings file carries the HTTP listener options, the token signing
//! parameters and the seed data (roles, shifts and staff accounts) written into
//! the database on startup. `TRANSIT_CONFIG` overrides the file location and
//! `TRANSIT_SECRET_KEY` overrides the signing secret so it can stay out of the
//! file in deployments.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// HTTP listener options
    #[serde(default)]
    pub server: ServerSettings,
    /// Token signing options
    pub auth: AuthSettings,
    /// Roles to ensure exist
    #[serde(default)]
    pub roles: Vec<RoleSeed>,
    /// Shifts to ensure exist
    #[serde(default)]
    pub shifts: Vec<ShiftSeed>,
    /// Accounts to ensure exist
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

/// HTTP listener options
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Socket address to bind, e.g. `"127.0.0.1:8000"`
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Origins allowed to call the API with credentials
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

/// Token signing options
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// HMAC secret used to sign tokens
    pub secret_key: String,
    /// Lifetime of issued tokens in minutes
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

const fn default_token_ttl() -> i64 {
    60
}

/// A role row to seed
#[derive(Debug, Deserialize, Clone)]
pub struct RoleSeed {
    /// Primary key in `rol_user`
    pub id: i64,
    /// Role name; one of the scope names to grant access
    pub role: String,
}

/// A shift row to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ShiftSeed {
    /// Primary key in `shift`
    pub id: i64,
    /// Shift name, e.g. "morning"
    pub shift_type: String,
}

/// A staff account to seed; the password is hashed before it is stored
#[derive(Debug, Deserialize, Clone)]
pub struct AccountSeed {
    /// Primary key in `users`
    pub id: i64,
    /// National identification number
    pub identification: i64,
    pub name: String,
    pub lastname: String,
    /// Login name; accounts whose email already exists are skipped
    pub email: String,
    /// Plain-text initial password
    pub password: String,
    /// Must name one of the seeded roles
    pub role_id: i64,
    pub shift_id: i64,
}

impl Settings {
    /// Parses settings from TOML text and checks the values that cannot be defaulted.
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid, required fields are missing,
    /// the secret is empty or the token lifetime is not positive.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse settings: {e}"),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.secret_key.trim().is_empty() {
            return Err(Error::Config {
                message: "auth.secret_key cannot be empty".to_string(),
            });
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(Error::Config {
                message: "auth.token_ttl_minutes must be positive".to_string(),
            });
        }
        for account in &self.accounts {
            if !self.roles.iter().any(|r| r.id == account.role_id) {
                return Err(Error::Config {
                    message: format!(
                        "account {} references unknown role {}",
                        account.email, account.role_id
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or fail validation
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let mut settings = Settings::from_toml(&contents)?;
    if let Ok(secret) = std::env::var("TRANSIT_SECRET_KEY") {
        if !secret.trim().is_empty() {
            settings.auth.secret_key = secret;
        }
    }
    Ok(settings)
}

/// Loads settings from `TRANSIT_CONFIG`, or `./config.toml` when unset
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("TRANSIT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        bind = "0.0.0.0:9000"
        allowed_origins = ["http://localhost:3000"]

        [auth]
        secret_key = "test-secret"

        [[roles]]
        id = 1
        role = "admin"

        [[shifts]]
        id = 1
        shift_type = "morning"

        [[accounts]]
        id = 1
        identification = 1001
        name = "Ada"
        lastname = "Admin"
        email = "admin@transit.test"
        password = "adminpass"
        role_id = 1
        shift_id = 1
    "#;

    #[test]
    fn test_parse_settings() {
        let settings = Settings::from_toml(SAMPLE).unwrap();
        assert_eq!(settings.server.bind, "0.0.0.0:9000");
        assert_eq!(settings.server.allowed_origins.len(), 1);
        assert_eq!(settings.auth.token_ttl_minutes, 60);
        assert_eq!(settings.roles[0].role, "admin");
        assert_eq!(settings.accounts[0].email, "admin@transit.test");
    }

    #[test]
    fn test_server_section_is_optional() {
        let settings = Settings::from_toml("[auth]\nsecret_key = \"k\"\n").unwrap();
        assert_eq!(settings.server.bind, "127.0.0.1:8000");
        assert!(settings.accounts.is_empty());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = Settings::from_toml("[auth]\nsecret_key = \"  \"\n");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_account_with_unknown_role_rejected() {
        let toml_str = SAMPLE.replace("role_id = 1", "role_id = 7");
        let result = Settings::from_toml(&toml_str);
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_settings("does/not/exist.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
