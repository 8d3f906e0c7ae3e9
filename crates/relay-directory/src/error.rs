use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory service unavailable: {source} {location}")]
    Unavailable {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("Directory returned zero tenant records {location}")]
    Empty { location: ErrorLocation },

    #[error("Malformed directory response: {source} {location}")]
    Malformed {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },
}

pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;
