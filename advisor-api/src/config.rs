use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub questions: QuestionsConfig,
    pub openai: Option<OpenAiConfig>,
    pub smtp: Option<SmtpConfig>,
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuestionsConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub chat_model: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            questions: QuestionsConfig {
                path: PathBuf::from("config/business_plan.yaml"),
            },
            openai: None,
            smtp: None,
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
        }
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[server]
host = "127.0.0.1"
port = 8080

[questions]
path = "config/business_plan.yaml"

[cors]
allowed_origins = ["http://localhost:3000"]

[openai]
# api_key = "your-openai-key"   # falls back to the OPENAI_API_KEY env var
# chat_model = "gpt-4o-mini"

# [smtp]
# host = "smtp.example.com"
# port = 587
# username = "reports@example.com"
# password = "app-password"
# sender = "reports@example.com"
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;
        Ok((config, config_path))
    }

    /// Configured key first, then the `OPENAI_API_KEY` environment variable
    pub fn openai_api_key(&self) -> Option<String> {
        self.openai
            .as_ref()
            .and_then(|o| o.api_key.clone())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("advisor/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
