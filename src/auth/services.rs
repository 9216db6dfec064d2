use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        password::{dummy_verify, hash_password, verify_password},
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult, FieldError},
};

/// `Some(s)` only for a present, non-empty string.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub async fn list_users(users: &dyn UserRepo) -> AppResult<Vec<User>> {
    Ok(users.list().await?)
}

pub async fn register(users: &dyn UserRepo, req: RegisterRequest) -> AppResult<User> {
    let username = present(req.username);
    let email = present(req.email);
    let password = present(req.password);

    let mut errors = Vec::new();
    if username.is_none() {
        errors.push(FieldError::required("username"));
    }
    if email.is_none() {
        errors.push(FieldError::required("email"));
    }
    if password.is_none() {
        errors.push(FieldError::required("password"));
    }
    let (Some(username), Some(email), Some(password)) = (username, email, password) else {
        warn!(missing = errors.len(), "registration rejected");
        return Err(AppError::Validation(errors));
    };

    let password_hash = hash_password(&password).await?;
    let user = users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Returns the authenticated user. Unknown email and wrong password produce
/// the same error and take comparable time.
pub async fn authenticate(users: &dyn UserRepo, req: LoginRequest) -> AppResult<User> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::BadRequest("Email and password are required"));
    };

    let Some(user) = users.find_by_email(&email).await? else {
        dummy_verify(&password).await;
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Only the account owner may delete it. Unparseable ids count as unknown,
/// and an unknown id is reported as such whoever the caller is.
pub async fn delete_user(users: &dyn UserRepo, caller: Uuid, id: &str) -> AppResult<User> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Err(AppError::NotFound("User not found"));
    };
    if caller != id {
        if users.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("User not found"));
        }
        warn!(%caller, target = %id, "delete of another user refused");
        return Err(AppError::Forbidden);
    }

    let user = users
        .delete(id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;
    info!(user_id = %user.id, "user deleted");
    Ok(user)
}
