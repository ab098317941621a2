//! User accounts: password hashing, login checks and startup seeding.
//!
//! Passwords are stored as Argon2id hashes in PHC string format, each with its
//! own random salt. The service secret only signs tokens.

use crate::config::settings::Settings;
use crate::core::access::{Scope, parse_scopes};
use crate::entities::{RolUser, Shift, User, rol_user, shift, user};
use crate::errors::{Error, Result};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{info, instrument, warn};

const LOGIN_FAILED: &str = "Incorrect username or password";

/// Produces and checks password hashes
#[derive(Default)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl PasswordHasher {
    /// Salted hash stored in `users.password`.
    ///
    /// # Errors
    /// Returns [`Error::PasswordHash`] if the hasher rejects the input.
    pub fn digest(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::PasswordHash(e.to_string()))
    }

    /// Checks `password` against a stored hash. Unparseable hashes never match.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        PasswordHash::new(stored).is_ok_and(|hash| {
            self.argon
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// A user who passed the password check, with the scopes their role grants
#[derive(Debug, Clone)]
pub struct Account {
    /// The stored user row
    pub user: user::Model,
    /// Role name, empty when the user has no role row
    pub role: String,
    /// Scopes granted by the role; never empty
    pub scopes: Vec<Scope>,
}

/// Checks an email/password pair.
///
/// # Errors
/// Returns [`Error::Unauthorized`] with the same message whether the email is
/// unknown or the password is wrong, and when the account's role grants no
/// scope.
#[instrument(skip(db, hasher, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<Account> {
    let found = User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .find_also_related(RolUser)
        .one(db)
        .await?;

    let Some((user, role)) = found else {
        warn!("Login attempt for unknown account");
        return Err(Error::unauthorized(LOGIN_FAILED));
    };
    if !hasher.verify(password, &user.password) {
        warn!("Login attempt with wrong password for user {}", user.id);
        return Err(Error::unauthorized(LOGIN_FAILED));
    }

    let role = role.map(|r| r.role).unwrap_or_default();
    let scopes = parse_scopes(&role);
    if scopes.is_empty() {
        warn!("User {} has role {:?}, which grants no access", user.id, role);
        return Err(Error::unauthorized("Account has no role"));
    }
    Ok(Account {
        user,
        role,
        scopes,
    })
}

/// Looks up a user by email.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Ensures the roles, shifts and accounts listed in the settings exist.
///
/// Rows that already exist (by id, or by email for accounts) are left untouched,
/// so edits made through the admin screens survive restarts.
#[instrument(skip_all)]
pub async fn seed(db: &DatabaseConnection, settings: &Settings, hasher: &PasswordHasher) -> Result<()> {
    for seed in &settings.roles {
        if RolUser::find_by_id(seed.id).one(db).await?.is_none() {
            rol_user::ActiveModel {
                id: Set(seed.id),
                role: Set(seed.role.clone()),
            }
            .insert(db)
            .await?;
            info!("Seeded role {}", seed.role);
        }
    }

    for seed in &settings.shifts {
        if Shift::find_by_id(seed.id).one(db).await?.is_none() {
            shift::ActiveModel {
                id: Set(seed.id),
                shift_type: Set(seed.shift_type.clone()),
            }
            .insert(db)
            .await?;
            info!("Seeded shift {}", seed.shift_type);
        }
    }

    for seed in &settings.accounts {
        if find_by_email(db, &seed.email).await?.is_some() {
            continue;
        }
        user::ActiveModel {
            id: Set(seed.id),
            identification: Set(seed.identification),
            name: Set(seed.name.clone()),
            lastname: Set(seed.lastname.clone()),
            email: Set(seed.email.clone()),
            password: Set(hasher.digest(&seed.password)?),
            id_rol_user: Set(seed.role_id),
            id_shift: Set(seed.shift_id),
        }
        .insert(db)
        .await?;
        info!("Seeded account {}", seed.email);
    }

    Ok(())
}
