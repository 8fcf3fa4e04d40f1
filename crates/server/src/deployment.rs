use std::sync::Arc;

use db::DBService;
use services::services::{config::Config, fixtures};
use tokio::sync::RwLock;
use tracing::info;

/// Shared state behind every route: the database handle and the mutable
/// runtime configuration.
#[derive(Clone)]
pub struct LocalDeployment {
    db: DBService,
    config: Arc<RwLock<Config>>,
}

pub type DeploymentImpl = LocalDeployment;

impl LocalDeployment {
    /// Connect to the configured database, or fall back to demo mode: an
    /// in-memory store seeded with fixture data.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db = match &config.database_url {
            Some(url) => DBService::new(url).await?,
            None => {
                info!("no DATABASE_URL configured, starting in demo mode");
                let db = DBService::new_in_memory().await?;
                fixtures::seed_demo_data(&db).await;
                db
            }
        };
        Ok(Self {
            db,
            config: Arc::new(RwLock::new(config)),
        })
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    pub async fn jwt_secret(&self) -> String {
        self.config.read().await.jwt_secret.clone()
    }
}
