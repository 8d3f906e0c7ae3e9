use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] relay_config::ConfigError),

    #[error("Directory error: {0}")]
    Directory(#[from] relay_directory::DirectoryError),

    #[error("Relay error: {0}")]
    Relay(#[from] relay_ws::RelayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger error: {message}")]
    Logger { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
