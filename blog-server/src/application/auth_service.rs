use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: Arc<JwtService>,
}

impl<R: UserRepository> AuthService<R> {
    /// Verified against when the username is unknown, so both failure paths
    /// cost one argon2 run.
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user = self
            .repo
            .create_user(NewUser {
                password_hash: hash_password(&req.password)?,
                username: req.username,
                email: req.email,
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "user registered");

        self.issue(user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let Some(creds) = self.repo.find_by_username(&req.username).await? else {
            match verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                Ok(()) | Err(DomainError::InvalidCredentials) => {}
                Err(err) => return Err(err),
            }
            return Err(DomainError::InvalidCredentials);
        };

        verify_password(&req.password, &creds.password_hash)?;
        self.issue(creds.user)
    }

    fn issue(&self, user: User) -> Result<AuthResult, DomainError> {
        let access_token = self
            .jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(AuthResult { user, access_token })
    }
}

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params =
        Params::new(19 * 1024, 2, 1, None).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub(crate) fn hash_password(raw_password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(raw_password: &str, password_hash: &str) -> Result<(), DomainError> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    argon2()?
        .verify_password(raw_password.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => DomainError::InvalidCredentials,
            _ => DomainError::Unexpected(err.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{AuthService, hash_password, verify_password};
    use crate::data::repositories::memory::MemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest};
    use crate::infrastructure::jwt::JwtService;

    fn service() -> AuthService<MemoryStore> {
        let jwt = JwtService::new("0123456789abcdef0123456789abcdef", 3600);
        AuthService::new(MemoryStore::new(), Arc::new(jwt))
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "correct-password".to_string(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn hash_then_verify_accepts_only_the_original_password() {
        let hash = hash_password("correct-password").expect("hash must be created");

        assert!(verify_password("correct-password", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn register_normalizes_and_returns_token() {
        let service = service();

        let result = service
            .register(register_request("  writer  ", "  WRITER@EXAMPLE.COM "))
            .await
            .expect("register must succeed");

        assert_eq!(result.user.username, "writer");
        assert_eq!(result.user.email, "writer@example.com");
        assert!(!result.access_token.is_empty());
    }

    #[tokio::test]
    async fn register_twice_is_already_exists() {
        let service = service();
        service
            .register(register_request("writer", "writer@example.com"))
            .await
            .expect("first register must succeed");

        let err = service
            .register(register_request("writer", "other@example.com"))
            .await
            .expect_err("duplicate username must fail");
        assert!(matches!(err, DomainError::AlreadyExists(resource) if resource == "username"));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let service = service();
        service
            .register(register_request("writer", "writer@example.com"))
            .await
            .expect("register must succeed");

        let ok = service
            .login(login_request("writer", "correct-password"))
            .await
            .expect("login must succeed");
        assert!(!ok.access_token.is_empty());

        let err = service
            .login(login_request("writer", "wrong-password"))
            .await
            .expect_err("wrong password must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_of_unknown_user_is_invalid_credentials() {
        let err = service()
            .login(login_request("ghost", "whatever"))
            .await
            .expect_err("unknown user must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }
}
