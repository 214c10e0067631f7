//! Staff account business logic - login, provisioning and module
//! permissions.
//!
//! Passwords are bcrypt-hashed. Permission checks always re-read the user
//! row, so revoking a module takes effect on the target's next request
//! even while their session is still alive. A `global_admin` bypasses the
//! stored permission set entirely.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Every grantable module key, in sidebar order.
pub const ALL_MODULES: [&str; 9] = [
    "dashboard",
    "order_requests",
    "trips",
    "orders",
    "clients",
    "products",
    "finance",
    "messages",
    "reports",
];

/// Input for provisioning a staff account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserInput {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Input for replacing a user's role and permission set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PermissionsInput {
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn default_role() -> String {
    "admin".to_string()
}

/// Drops unknown module keys, preserving the caller's order.
fn filter_modules(requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|m| ALL_MODULES.contains(&m.as_str()))
        .cloned()
        .collect()
}

fn validate_role(role: &str) -> Result<()> {
    if role != "admin" && role != "global_admin" {
        return Err(Error::validation("Role must be admin or global_admin"));
    }
    Ok(())
}

/// Whether a user may use a module. Global admins may use everything.
#[must_use]
pub fn has_module(user: &user::Model, module: &str) -> bool {
    user.is_global_admin() || user.permission_list().iter().any(|m| m == module)
}

/// Retrieves all staff accounts, oldest first.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one staff account.
pub async fn get_user(db: &DatabaseConnection, id: &str) -> Result<Option<user::Model>> {
    User::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Provisions a staff account with a bcrypt-hashed password.
pub async fn create_user(db: &DatabaseConnection, input: CreateUserInput) -> Result<user::Model> {
    if input.username.trim().is_empty() {
        return Err(Error::validation("Username is required"));
    }
    if input.password.len() < 6 {
        return Err(Error::validation(
            "Password must be at least 6 characters",
        ));
    }
    validate_role(&input.role)?;

    let username = input.username.trim().to_string();
    let taken = User::find()
        .filter(user::Column::Username.eq(&username))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::validation("Username is already taken"));
    }

    let hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;
    let permissions = serde_json::to_string(&filter_modules(&input.permissions))
        .map_err(|e| Error::validation(format!("Invalid permission list: {e}")))?;
    let now = chrono::Utc::now();

    let model = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        email: Set(input.email),
        username: Set(Some(username)),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        password_hash: Set(Some(hash)),
        role: Set(input.role),
        permissions: Set(permissions),
        created_at: Set(now),
        updated_at: Set(now),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Checks credentials against the stored hash.
///
/// The login field matches either username or email. Returns `None` for
/// unknown accounts and wrong passwords alike, so the HTTP layer answers
/// both the same way.
pub async fn verify_login(
    db: &DatabaseConnection,
    login: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let found = User::find()
        .filter(
            user::Column::Username
                .eq(login)
                .or(user::Column::Email.eq(login)),
        )
        .one(db)
        .await?;

    let Some(account) = found else {
        return Ok(None);
    };
    let Some(hash) = &account.password_hash else {
        return Ok(None);
    };

    if bcrypt::verify(password, hash)? {
        Ok(Some(account))
    } else {
        Ok(None)
    }
}

/// Replaces a user's role and permission set.
///
/// A global admin cannot demote themselves; someone else has to.
pub async fn update_permissions(
    db: &DatabaseConnection,
    actor: &user::Model,
    id: &str,
    input: PermissionsInput,
) -> Result<user::Model> {
    validate_role(&input.role)?;

    if actor.id == id && actor.is_global_admin() && input.role != "global_admin" {
        return Err(Error::validation(
            "You cannot remove your own global admin role",
        ));
    }

    let mut model: user::ActiveModel = User::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound { id: id.to_string() })?
        .into();

    let permissions = serde_json::to_string(&filter_modules(&input.permissions))
        .map_err(|e| Error::validation(format!("Invalid permission list: {e}")))?;
    model.role = Set(input.role);
    model.permissions = Set(permissions);
    model.updated_at = Set(chrono::Utc::now());
    model.update(db).await.map_err(Into::into)
}

/// Deletes a staff account. Accounts cannot delete themselves.
pub async fn delete_user(db: &DatabaseConnection, actor: &user::Model, id: &str) -> Result<()> {
    if actor.id == id {
        return Err(Error::validation("You cannot delete your own account"));
    }

    let result = User::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::UserNotFound { id: id.to_string() });
    }
    Ok(())
}

/// Seeds the default global admin account on first boot.
///
/// Does nothing when any user already exists, so a renamed or re-secured
/// admin account is never resurrected.
pub async fn ensure_admin_user(db: &DatabaseConnection) -> Result<()> {
    if User::find().count(db).await? > 0 {
        return Ok(());
    }

    create_user(
        db,
        CreateUserInput {
            username: "admin".to_string(),
            email: None,
            first_name: Some("Administrator".to_string()),
            last_name: None,
            password: "admin123".to_string(),
            role: "global_admin".to_string(),
            permissions: ALL_MODULES.iter().map(ToString::to_string).collect(),
        },
    )
    .await?;
    tracing::info!("Seeded default admin account; change its password");
    Ok(())
}
