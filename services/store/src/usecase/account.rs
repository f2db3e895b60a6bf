use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use bazaar_auth_types::token::issue_session_token;
use bazaar_domain::user::UserRole;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::User;
use crate::error::StoreServiceError;

const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=100;
const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed, lowercased email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` shape check; deliverability is not verified.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty())
        && !domain.ends_with('.')
}

fn validate_password(password: &str) -> Result<(), StoreServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StoreServiceError::validation(
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct RegisterUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> RegisterUseCase<U, H> {
    /// Create a customer account.
    pub async fn execute(&self, input: RegisterInput) -> Result<User, StoreServiceError> {
        let name = input.name.trim().to_owned();
        if !NAME_LEN.contains(&name.chars().count()) {
            return Err(StoreServiceError::validation(
                "name must be 2 to 100 characters",
            ));
        }
        let email = normalize_email(&input.email);
        if !is_plausible_email(&email) {
            return Err(StoreServiceError::validation("invalid email address"));
        }
        validate_password(&input.password)?;
        if input.password != input.confirm_password {
            return Err(StoreServiceError::validation("passwords do not match"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(StoreServiceError::UserAlreadyExists);
        }

        let user = User {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash: self.hasher.hash(&input.password)?,
            role: UserRole::Customer,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub user: User,
    pub session_token: String,
}

pub struct LoginUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
    pub session_secret: String,
    pub session_ttl_secs: u64,
}

impl<U: UserRepository, H: PasswordHasher> LoginUseCase<U, H> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, StoreServiceError> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(StoreServiceError::InvalidCredentials)?;
        if !self.hasher.verify(&input.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(StoreServiceError::InvalidCredentials);
        }
        let session_token = issue_session_token(
            user.id,
            user.role,
            self.session_ttl_secs,
            &self.session_secret,
        )
        .context("sign session token")?;
        Ok(LoginOutput {
            user,
            session_token,
        })
    }
}

// ── BootstrapAdmin ───────────────────────────────────────────────────────────

pub struct BootstrapAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum AdminBootstrap {
    Created(User),
    Promoted(User),
}

pub struct BootstrapAdminUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> BootstrapAdminUseCase<U, H> {
    /// Create an admin account, or promote the existing account with this email.
    pub async fn execute(
        &self,
        input: BootstrapAdminInput,
    ) -> Result<AdminBootstrap, StoreServiceError> {
        let email = normalize_email(&input.email);
        if !is_plausible_email(&email) {
            return Err(StoreServiceError::validation("invalid email address"));
        }
        if let Some(mut user) = self.users.find_by_email(&email).await? {
            if !self.users.set_role(user.id, UserRole::Admin).await? {
                return Err(StoreServiceError::UserNotFound);
            }
            user.role = UserRole::Admin;
            return Ok(AdminBootstrap::Promoted(user));
        }

        validate_password(&input.password)?;
        let user = User {
            id: Uuid::now_v7(),
            name: input.name.trim().to_owned(),
            email,
            password_hash: self.hasher.hash(&input.password)?,
            role: UserRole::Admin,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        Ok(AdminBootstrap::Created(user))
    }
}
