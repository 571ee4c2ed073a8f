use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostprepError {
    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("required tool not found on PATH: {0}")]
    MissingTool(String),

    #[error("invalid selection '{input}': expected a number between 0 and {max}")]
    InvalidSelection { input: String, max: usize },

    #[error("duplicate action name: {0}")]
    DuplicateAction(String),

    #[error("failed to start '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl HostprepError {
    /// Guard failures abort the whole run; everything else is scoped to the
    /// step or action that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HostprepError::UnsupportedHost(_) | HostprepError::MissingTool(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HostprepError>;
