use config::{Config, ConfigError, File, Value};
use tracing::{debug, instrument, warn};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(thiserror::Error, Debug)]
pub enum BuildDbError {
    #[error("error from config")]
    Config(#[from] ConfigError),
    #[error("invalid value for database.{0}")]
    InvalidValue(&'static str, #[source] ConfigError),
    #[error("port {0} is out of range")]
    InvalidPort(i64),
    #[error("error from mongodb")]
    Mongodb(#[from] mongodb::error::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            name: "training_diary".to_string(),
            host: "localhost".to_string(),
            port: 27017,
            username: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    /// Connection string for this configuration. `MONGODB_URI` takes
    /// precedence when set. Credentials are percent-encoded.
    pub fn uri(&self) -> String {
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            return uri;
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => format!(
                "mongodb://{}:{}@{}:{}",
                urlencoding::encode(username),
                urlencoding::encode(password),
                self.host,
                self.port
            ),
            (Some(_), None) | (None, Some(_)) => {
                warn!("username and password must be set together, ignoring credentials");
                format!("mongodb://{}:{}", self.host, self.port)
            }
            (None, None) => format!("mongodb://{}:{}", self.host, self.port),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_default_path() -> Result<Self, BuildDbError> {
        Self::from_path(DEFAULT_CONFIG_FILE)
    }

    pub fn from_path(config_path: &str) -> Result<Self, BuildDbError> {
        let conf = load_config(config_path)?;
        Self::from_config(&conf)
    }

    pub fn from_config(conf: &Config) -> Result<Self, BuildDbError> {
        let defaults = DatabaseConfig::default();
        // a config file without a database table is valid, everything defaults
        let db_conf = match conf.get_table("database") {
            Ok(table) => table,
            Err(ConfigError::NotFound(_)) => return Ok(AppConfig::default()),
            Err(e) => return Err(e.into()),
        };

        let name = match db_conf.get("name") {
            Some(name) => string_value("name", name)?,
            None => defaults.name,
        };
        let host = match db_conf.get("host") {
            Some(host) => string_value("host", host)?,
            None => defaults.host,
        };
        let port = match db_conf.get("port") {
            Some(port) => {
                let port = port
                    .clone()
                    .into_int()
                    .map_err(|e| BuildDbError::InvalidValue("port", e))?;
                u16::try_from(port).map_err(|_| BuildDbError::InvalidPort(port))?
            }
            None => defaults.port,
        };
        let username = optional_string_value("username", db_conf.get("username"))?;
        let password = optional_string_value("password", db_conf.get("password"))?;

        Ok(AppConfig {
            database: DatabaseConfig {
                name,
                host,
                port,
                username,
                password,
            },
        })
    }
}

fn string_value(key: &'static str, value: &Value) -> Result<String, BuildDbError> {
    value
        .clone()
        .into_string()
        .map_err(|e| BuildDbError::InvalidValue(key, e))
}

// yaml `null` and a missing key both mean "not set"
fn optional_string_value(
    key: &'static str,
    value: Option<&Value>,
) -> Result<Option<String>, BuildDbError> {
    match value {
        Some(value) if matches!(value.kind, config::ValueKind::Nil) => Ok(None),
        Some(value) => string_value(key, value).map(Some),
        None => Ok(None),
    }
}

pub fn load_config(filepath: &str) -> Result<Config, ConfigError> {
    Config::builder()
        .add_source(File::with_name(filepath))
        .build()
}

#[instrument(skip_all, fields(database = %db_config.name, host = %db_config.host))]
pub async fn db_from_config(db_config: &DatabaseConfig) -> Result<mongodb::Database, BuildDbError> {
    let client = mongodb::Client::with_uri_str(db_config.uri()).await?;
    debug!("connected to mongodb");
    Ok(client.database(&db_config.name))
}

pub async fn build_db(conf: &Config) -> Result<mongodb::Database, BuildDbError> {
    let app_config = AppConfig::from_config(conf)?;
    db_from_config(&app_config.database).await
}
