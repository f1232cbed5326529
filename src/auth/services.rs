use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::RegisterRequest,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{RepoError, UserStore},
        repo_types::User,
    },
    error::AppError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Creates a user. Emails are compared exactly as stored.
pub async fn register(users: &dyn UserStore, req: RegisterRequest) -> Result<User, AppError> {
    let email = req.email.trim();
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }

    if users.find_by_email(email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateUser);
    }

    let hash = hash_password(&req.password)?;
    let user = users.create(email, &hash).await.map_err(|e| match e {
        RepoError::Conflict => {
            warn!(email = %email, "email registered concurrently");
            AppError::DuplicateUser
        }
        RepoError::Other(e) => AppError::Internal(e),
    })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Returns the user only when the password matches.
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = users.find_by_email(email).await? else {
        warn!(email = %email, "login unknown email");
        return Ok(None);
    };
    if !verify_password(password, &user.hashed_password) {
        warn!(user_id = user.id, "login invalid password");
        return Ok(None);
    }
    Ok(Some(user))
}

/// Password login: verifies the credentials and issues an access token.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let user = authenticate(users, email.trim(), password)
        .await?
        .ok_or(AppError::Unauthenticated)?;
    let token = keys.issue(&user.email)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}

/// Maps a bearer token to the user it names. Bad tokens and vanished users
/// both come back as `Unauthenticated`.
pub async fn resolve_current_user(
    users: &dyn UserStore,
    keys: &JwtKeys,
    token: &str,
) -> Result<User, AppError> {
    let claims = keys.verify(token).map_err(|_| AppError::Unauthenticated)?;
    match users.find_by_email(&claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            warn!(sub = %claims.sub, "token subject has no user");
            Err(AppError::Unauthenticated)
        }
    }
}

pub fn require_active(user: User) -> Result<User, AppError> {
    if !user.is_active {
        warn!(user_id = user.id, "inactive account");
        return Err(AppError::InactiveAccount);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::JwtConfig, memory::MemoryStore};
    use time::Duration;

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes: 30,
        })
    }

    fn req(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let store = MemoryStore::default();
        let user = register(&store, req("alice@example.com", "pw1")).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "alice@example.com");
        assert!(user.is_active);
        assert_ne!(user.hashed_password, "pw1");

        let err = register(&store, req("alice@example.com", "other")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }

    #[tokio::test]
    async fn register_keeps_email_case() {
        let store = MemoryStore::default();
        register(&store, req("Alice@Example.com", "pw1")).await.unwrap();
        assert!(store.find_by_email("alice@example.com").await.unwrap().is_none());
        assert!(store.find_by_email("Alice@Example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let store = MemoryStore::default();
        let err = register(&store, req("nope", "pw1")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = register(&store, req("a@b.co", "")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let store = MemoryStore::default();
        register(&store, req("alice@example.com", "pw1")).await.unwrap();

        let ok = authenticate(&store, "alice@example.com", "pw1").await.unwrap();
        assert_eq!(ok.map(|u| u.email).as_deref(), Some("alice@example.com"));
        assert!(authenticate(&store, "alice@example.com", "pw2").await.unwrap().is_none());
        assert!(authenticate(&store, "bob@example.com", "pw1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn login_issues_token_for_subject() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, req("alice@example.com", "pw1")).await.unwrap();

        let token = login(&store, &keys, "alice@example.com", "pw1").await.unwrap();
        assert_eq!(keys.verify(&token).unwrap().sub, "alice@example.com");

        let err = login(&store, &keys, "alice@example.com", "bad").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn resolve_current_user_roundtrip() {
        let store = MemoryStore::default();
        let keys = keys();
        let user = register(&store, req("alice@example.com", "pw1")).await.unwrap();
        let token = keys.issue("alice@example.com").unwrap();
        assert_eq!(resolve_current_user(&store, &keys, &token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn resolve_current_user_for_absent_user_is_unauthenticated() {
        let store = MemoryStore::default();
        let keys = keys();
        let token = keys.issue("ghost@example.com").unwrap();
        let err = resolve_current_user(&store, &keys, &token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn token_outlives_its_user() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, req("alice@example.com", "pw1")).await.unwrap();
        let token = keys.issue("alice@example.com").unwrap();

        store.remove_user("alice@example.com");
        let err = resolve_current_user(&store, &keys, &token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn resolve_current_user_rejects_bad_tokens() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, req("alice@example.com", "pw1")).await.unwrap();

        let expired = keys
            .issue_with_ttl("alice@example.com", Duration::minutes(-1))
            .unwrap();
        for token in [expired.as_str(), "garbage"] {
            let err = resolve_current_user(&store, &keys, token).await.unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated));
        }
    }

    #[tokio::test]
    async fn require_active_gate() {
        let store = MemoryStore::default();
        let user = register(&store, req("alice@example.com", "pw1")).await.unwrap();
        assert_eq!(require_active(user.clone()).unwrap(), user);

        let inactive = User {
            is_active: false,
            ..user
        };
        assert!(matches!(
            require_active(inactive).unwrap_err(),
            AppError::InactiveAccount
        ));
    }
}
