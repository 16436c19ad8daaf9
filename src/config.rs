use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::SchemaRevision;

/// Main configuration structure for the microscopy tooling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObisMicroscopyConfig {
    /// openBIS server connection
    pub server: ServerConfig,
    /// Export job settings (the webapp CONFIG surface)
    pub export: ExportConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the openBIS application server
    pub url: String,
    /// Session token (can be set via env var); wins over credentials
    pub session_token: Option<String>,
    /// Username for credential login
    pub username: Option<String>,
    /// Password for credential login
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Code of the data store server hosting the export plug-in
    pub data_store_server: Option<String>,
    /// Interval between job status polls, in milliseconds
    pub query_plugin_status_interval_ms: u64,
    /// Allow exports to the user folder ("normal" mode)
    pub enable_export_to_user_folder: bool,
    /// Allow exports to the HRM source folder ("hrm" mode)
    pub enable_export_to_hrm_source_folder: bool,
    /// Core-plugin schema revision deployed on the server (1-4)
    pub schema_revision: SchemaRevision,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable tracing output
    pub tracing_enabled: bool,
    /// Log level
    pub log_level: String,
}

impl Default for ObisMicroscopyConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                url: "https://localhost:8443".to_string(),
                session_token: None, // Read from env var or the rc file
                username: None,
                password: None,
            },
            export: ExportConfig {
                data_store_server: None,
                query_plugin_status_interval_ms: 2000,
                enable_export_to_user_folder: false,
                enable_export_to_hrm_source_folder: false,
                schema_revision: SchemaRevision::LATEST,
            },
            observability: ObservabilityConfig {
                tracing_enabled: true,
                log_level: "info".to_string(),
            },
        }
    }
}

impl ObisMicroscopyConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (obis-microscopy.toml, .obis-microscopy-rc)
    /// 3. Environment variables (prefixed with OBIS_MICROSCOPY_)
    pub fn load() -> Result<Self> {
        // Start with default configuration
        let mut builder =
            Config::builder().add_source(Config::try_from(&ObisMicroscopyConfig::default())?);

        if Path::new("obis-microscopy.toml").exists() {
            builder = builder.add_source(File::with_name("obis-microscopy"));
        }

        if Path::new(".obis-microscopy-rc").exists() {
            builder = builder.add_source(File::with_name(".obis-microscopy-rc"));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("OBIS_MICROSCOPY")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut loaded: ObisMicroscopyConfig = config.try_deserialize()?;

        // Special handling for the session token - check multiple sources
        if loaded.server.session_token.is_none() {
            if let Ok(token) = std::env::var("OPENBIS_SESSION_TOKEN") {
                loaded.server.session_token = Some(token);
            } else if let Ok(token) = std::env::var("OBIS_MICROSCOPY_SESSION_TOKEN") {
                loaded.server.session_token = Some(token);
            }
        }

        Ok(loaded)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }

    /// True when the requested export mode is allowed by the feature flags.
    pub fn mode_enabled(&self, mode: crate::export::ExportMode) -> bool {
        match mode {
            crate::export::ExportMode::Normal => self.export.enable_export_to_user_folder,
            crate::export::ExportMode::Hrm => self.export.enable_export_to_hrm_source_folder,
            // Zip download is always offered.
            crate::export::ExportMode::Zip => true,
        }
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ObisMicroscopyConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = ObisMicroscopyConfig::load_env_file();
        ObisMicroscopyConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ObisMicroscopyConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportMode;

    #[test]
    fn defaults_disable_folder_exports_but_allow_zip() {
        let config = ObisMicroscopyConfig::default();
        assert!(!config.mode_enabled(ExportMode::Normal));
        assert!(!config.mode_enabled(ExportMode::Hrm));
        assert!(config.mode_enabled(ExportMode::Zip));
    }

    #[test]
    fn flags_gate_their_modes() {
        let mut config = ObisMicroscopyConfig::default();
        config.export.enable_export_to_user_folder = true;
        assert!(config.mode_enabled(ExportMode::Normal));
        assert!(!config.mode_enabled(ExportMode::Hrm));

        config.export.enable_export_to_hrm_source_folder = true;
        assert!(config.mode_enabled(ExportMode::Hrm));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = ObisMicroscopyConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obis-microscopy.toml");
        config.save_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let reloaded: ObisMicroscopyConfig = toml::from_str(&text).unwrap();
        assert_eq!(
            reloaded.export.query_plugin_status_interval_ms,
            config.export.query_plugin_status_interval_ms
        );
        assert_eq!(
            reloaded.export.schema_revision,
            config.export.schema_revision
        );
    }
}
