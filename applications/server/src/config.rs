/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding one `<track id>.<extension>` file per track
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    #[serde(default = "default_audio_format")]
    pub audio_format: AudioFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a file (default `config.toml`, skipped when
    /// absent) overridden by `PULSE_`-prefixed environment variables
    ///
    /// Nested keys use a double underscore: `PULSE_SERVER__PORT=9000`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("PULSE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ServerError::Config("Host must not be empty".to_string()));
        }

        if self.storage.audio_dir.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "Audio directory is required (set PULSE_STORAGE__AUDIO_DIR)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        audio_dir: default_audio_dir(),
        audio_format: default_audio_format(),
    }
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("./data/tracks")
}

fn default_audio_format() -> AudioFormat {
    AudioFormat::Mp3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
        }
    }
}
