use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    storage::Storage,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub storage: Storage,
}

impl AppState {
    pub async fn new(pool: DbPool, config: AppConfig) -> anyhow::Result<Self> {
        let orm = orm_from_pool(&pool);
        let storage = Storage::new(&config.upload_dir, config.max_image_bytes).await?;
        Ok(Self {
            pool,
            orm,
            config: Arc::new(config),
            storage,
        })
    }
}
