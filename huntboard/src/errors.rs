use thiserror::Error;

/// Errors emitted while reading or writing host settings.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("settings IO failed")]
    Io(#[from] std::io::Error),
    #[error("settings JSON failed")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the headless host.
#[derive(Debug, Error)]
pub(crate) enum HostError {
    #[error("usage: huntboard <dataset.json> [--width px] [--standalone]")]
    Usage,
    #[error("failed to read dataset {path}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset {path} is not valid JSON")]
    DatasetJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),
    #[error("'{command}' expects {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{value}' is not a valid {what}")]
    InvalidNumber { value: String, what: &'static str },
    #[error("stdin failed")]
    Io(#[from] std::io::Error),
}
