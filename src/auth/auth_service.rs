use crate::auth::{create_access_token, hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::user::{user_repository::UserRepository, Role, User};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
    admin_email: Option<String>,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        jwt_expiration_hours: i64,
        admin_email: Option<String>,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_expiration_hours,
            admin_email,
        }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        position: Option<&str>,
    ) -> Result<(User, String)> {
        let password_hash = hash_password(password)?;
        let role = initial_role(email, self.admin_email.as_deref());

        let user = self
            .user_repo
            .create(name, email, &password_hash, position, role)
            .await?;

        let access_token = self.issue_token(&user)?;

        Ok((user, access_token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication("Invalid credentials".into()));
        }

        let access_token = self.issue_token(&user)?;

        Ok((user, access_token))
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        create_access_token(
            user.id,
            &user.email,
            user.role,
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )
    }
}

/// Everyone registers as a plain user except the configured bootstrap admin.
pub fn initial_role(email: &str, admin_email: Option<&str>) -> Role {
    match admin_email {
        Some(admin) if admin.trim().eq_ignore_ascii_case(email.trim()) => Role::Admin,
        _ => Role::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_bootstrap_email_registers_as_admin() {
        assert_eq!(initial_role("hr@example.com", Some("HR@example.com")), Role::Admin);
        assert_eq!(initial_role("bob@example.com", Some("hr@example.com")), Role::User);
        assert_eq!(initial_role("hr@example.com", None), Role::User);
    }
}
