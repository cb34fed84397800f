use std::env;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    InvalidPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be a non-negative integer, got '{}'", key, value)
            }
            ConfigError::InvalidPolicy(value) => {
                write!(f, "STATUS_POLICY must be 'legacy' or 'strict', got '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Como erros de identificador e updates sem alteração viram status HTTP.
///
/// `Legacy` reproduz os códigos da API original: id inválido dá 404 no GET e
/// 500 no PUT/DELETE, e um PUT que não altera nenhum campo dá 404.
/// `Strict` responde 400 para qualquer id inválido e só dá 404 no PUT quando
/// nenhum documento casou com o id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    #[default]
    Legacy,
    Strict,
}

impl StatusPolicy {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(StatusPolicy::Legacy),
            "strict" => Ok(StatusPolicy::Strict),
            _ => Err(ConfigError::InvalidPolicy(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo: MongoConfig,
    pub status_policy: StatusPolicy,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Lê a configuração das variáveis de ambiente (depois do `.env`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let mongo = MongoConfig {
            uri: text("MONGODB_URI", "mongodb://localhost:27017/"),
            database: text("MONGODB_DATABASE", "test"),
            collection: text("MONGODB_COLLECTION", "users"),
            max_pool_size: number(&lookup, "MONGODB_MAX_POOL_SIZE", 20)?,
            min_pool_size: number(&lookup, "MONGODB_MIN_POOL_SIZE", 5)?,
            connect_timeout: Duration::from_secs(number(&lookup, "MONGODB_CONNECT_TIMEOUT_SECS", 5)?),
            server_selection_timeout: Duration::from_secs(number(
                &lookup,
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                5,
            )?),
        };

        let status_policy = match lookup("STATUS_POLICY") {
            Some(value) => StatusPolicy::parse(&value)?,
            None => StatusPolicy::default(),
        };

        let cors_allowed_origins = text("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: text("HOST", "0.0.0.0"),
            port: number(&lookup, "PORT", 9000)?,
            mongo,
            status_policy,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}
