use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create scratch directory: {source}")]
    CreateWorkDir {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn renderer shell: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait on renderer process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },

    #[error("Renderer did not finish within {}s and was killed", limit.as_secs())]
    TimedOut { limit: Duration },

    #[error("Renderer v{version} not found")]
    RendererNotFound { version: String },

    #[error("Renderer failed: {output}")]
    RendererFailed { output: String },
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Rendered artifact missing at '{0}'")]
    MissingArtifact(PathBuf),

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
