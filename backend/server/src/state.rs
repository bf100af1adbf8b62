use std::sync::Arc;

use models::Document;

use super::{
    config::Config,
    database::{DocumentStore, StoreError, init_store},
    repository::Collection,
    token::TokenIssuer,
};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenIssuer,
    pub http: reqwest::Client,
}

impl AppState {
    pub async fn new(config: Config) -> Result<SharedState, StoreError> {
        let store = init_store(&config).await?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> SharedState {
        let tokens = TokenIssuer::from_config(&config);

        Arc::new(Self {
            config,
            store,
            tokens,
            http: reqwest::Client::new(),
        })
    }

    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(self.store.clone())
    }
}
