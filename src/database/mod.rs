pub mod store;
#[cfg(test)]
pub mod memory;

pub use store::*;

use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::fmt;
use tokio::sync::OnceCell;

use crate::config::MongoConfig;

#[derive(Debug, Clone)]
pub enum StoreError {
    Connection(String),
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "MongoDB unreachable: {}", msg),
            StoreError::Io(msg) => write!(f, "MongoDB operation failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<MongoError> for StoreError {
    fn from(err: MongoError) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Io(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Connection pool
        client_options.max_pool_size = Some(config.max_pool_size);
        client_options.min_pool_size = Some(config.min_pool_size);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(config.connect_timeout);
        client_options.server_selection_timeout = Some(config.server_selection_timeout);

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let db = client.database(&config.database);

        let mongodb = Self { client, db };
        mongodb.ping().await?;

        Ok(mongodb)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// Gerencia a única conexão com o MongoDB usada por todas as requisições.
///
/// A conexão é aberta na primeira chamada de [`acquire_collection`]; chamadas
/// concorrentes esperam a mesma tentativa. Uma tentativa que falha não fica
/// em cache, então a próxima requisição tenta de novo.
///
/// [`acquire_collection`]: ConnectionManager::acquire_collection
pub struct ConnectionManager {
    config: MongoConfig,
    mongodb: OnceCell<MongoDB>,
}

impl ConnectionManager {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            mongodb: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<&MongoDB, StoreError> {
        self.mongodb
            .get_or_try_init(|| async {
                log::info!("🔌 Connecting to MongoDB at {}", self.config.uri);
                let mongodb = MongoDB::connect(&self.config).await?;
                log::info!(
                    "✅ Connected to MongoDB: {}.{}",
                    self.config.database,
                    self.config.collection
                );
                Ok::<_, StoreError>(mongodb)
            })
            .await
    }

    pub async fn acquire_collection(&self) -> Result<Collection<Document>, StoreError> {
        let mongodb = self.connection().await?;
        Ok(mongodb.collection(&self.config.collection))
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.connection().await?.ping().await
    }
}
