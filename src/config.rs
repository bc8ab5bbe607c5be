//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/default.toml, config/local.toml)
//! 3. Environment variables (S3_IMAGE_BRIDGE__*)
//! 4. Conventional AWS variables (AWS_ACCESS_KEY_ID, S3_BUCKET_NAME, PORT, ...)

use serde::Deserialize;

/// Region used when none is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-2";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8000)
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// AWS credentials and target bucket
#[derive(Clone, Deserialize)]
pub struct AwsConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Region of the bucket (default: us-east-2)
    pub region: String,
    /// Bucket that receives uploads
    pub bucket: Option<String>,
}

impl AwsConfig {
    /// Whether both credential values are present and non-empty
    pub fn credentials_configured(&self) -> bool {
        is_present(&self.access_key_id) && is_present(&self.secret_access_key)
    }

    /// Configured bucket name, empty when unset
    pub fn bucket_name(&self) -> &str {
        self.bucket.as_deref().unwrap_or_default()
    }
}

// Secrets stay out of Debug output so the config can be logged.
impl std::fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsConfig")
            .field("credentials_configured", &self.credentials_configured())
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

/// Conventional variable names mapped onto config keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("AWS_ACCESS_KEY_ID", "aws.access_key_id"),
    ("AWS_SECRET_ACCESS_KEY", "aws.secret_access_key"),
    ("AWS_REGION", "aws.region"),
    ("S3_BUCKET_NAME", "aws.bucket"),
    ("PORT", "server.port"),
];

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` for the conventional variables
    pub fn load_with<F>(lookup: F) -> Result<Self, crate::error::AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        use config::{Config, Environment, File};

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("aws.region", DEFAULT_AWS_REGION)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("S3_IMAGE_BRIDGE")
                    .separator("__")
                    .try_parsing(true),
            );

        for (variable, key) in ENV_OVERRIDES {
            // Empty values behave as unset so the defaults still apply.
            let value = lookup(variable).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let app_config: Self = builder
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.server.port == 0 {
            return Err(crate::error::AppError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.aws.region.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "aws.region must not be empty".to_string(),
            ));
        }

        if !self.aws.credentials_configured() {
            tracing::warn!("AWS credentials are not configured; uploads will fail");
        }

        if self.aws.bucket_name().is_empty() {
            tracing::warn!("S3_BUCKET_NAME is not configured; uploads will fail");
        }

        Ok(())
    }
}
