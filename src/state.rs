use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::sendgrid::SendGridClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{ImageService, UserAgentClassifier};
use tracing::info;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub image_service: Arc<ImageService>,

    pub classifier: Arc<UserAgentClassifier>,

    /// Absent when email is disabled; callers skip notifications then.
    pub mailer: Option<Arc<SendGridClient>>,

    /// Recipient for inquiry notifications, snapshotted at startup.
    pub admin_address: String,

    /// Base URL sitemap entries are built against, snapshotted at startup.
    pub public_base_url: String,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let image_service = Arc::new(ImageService::new(&config));
        let classifier = Arc::new(UserAgentClassifier::new());

        let mailer = if config.email.enabled {
            let api_key = config
                .email_api_key()
                .ok_or_else(|| anyhow::anyhow!("Email enabled but no API key configured"))?;
            info!("Email notifications enabled via {}", config.email.api_base_url);
            Some(Arc::new(SendGridClient::new(&config.email, api_key)?))
        } else {
            None
        };

        let admin_address = config.email.admin_address.clone();
        let public_base_url = config.server.public_base_url.clone();

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            image_service,
            classifier,
            mailer,
            admin_address,
            public_base_url,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
