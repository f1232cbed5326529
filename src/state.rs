use crate::auth::{jwt::JwtKeys, repo::UserStore};
use crate::config::{AppConfig, JwtConfig};
use crate::contacts::repo::ContactStore;
use crate::db::PgStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub contacts: Arc<dyn ContactStore>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let store = PgStore::connect(config).await?;
        store.migrate().await?;
        let store = Arc::new(store);

        Ok(Self::from_parts(
            &config.jwt,
            store.clone() as Arc<dyn UserStore>,
            store as Arc<dyn ContactStore>,
        ))
    }

    pub fn from_parts(
        jwt: &JwtConfig,
        users: Arc<dyn UserStore>,
        contacts: Arc<dyn ContactStore>,
    ) -> Self {
        Self {
            jwt: JwtKeys::new(jwt),
            users,
            contacts,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_memory(Arc::new(crate::memory::MemoryStore::default()))
    }

    #[cfg(test)]
    pub fn from_memory(store: Arc<crate::memory::MemoryStore>) -> Self {
        let jwt = JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes: crate::config::DEFAULT_TTL_MINUTES,
        };
        Self::from_parts(
            &jwt,
            store.clone() as Arc<dyn UserStore>,
            store as Arc<dyn ContactStore>,
        )
    }
}
