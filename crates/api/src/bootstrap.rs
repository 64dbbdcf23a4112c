//! Startup provisioning of the first admin account.
//!
//! Registration never grants the admin flag, so a fresh deployment gets its
//! first admin from `BOOTSTRAP_ADMIN_EMAIL` / `BOOTSTRAP_ADMIN_PASSWORD`.

use cinegrade_core::validation::rules::validate_password;
use cinegrade_db::models::user::CreateUser;
use cinegrade_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin unless a live admin already exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::admin_exists(pool).await? {
        tracing::debug!("admin account present, skipping bootstrap");
        return Ok(false);
    }

    validate_password(&admin.password).map_err(|_| {
        AppError::BadRequest("BOOTSTRAP_ADMIN_PASSWORD does not meet the password rules".into())
    })?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.trim().to_lowercase(),
            password_hash,
            name: "Admin".into(),
            surname: "Admin".into(),
            birthday: None,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "bootstrap admin created");
    Ok(true)
}
