use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Tenant {tenant_id} is already provisioned {location}")]
    DuplicateTenant {
        tenant_id: String,
        location: ErrorLocation,
    },

    #[error("Unknown tenant {tenant_id} {location}")]
    UnknownTenant {
        tenant_id: String,
        location: ErrorLocation,
    },

    #[error("Posting carries no tenant identifier at payload.data.data_demozone {location}")]
    MissingTenantField { location: ErrorLocation },

    #[error("Failed to bind endpoint port {port} for tenant {tenant_id}: {source} {location}")]
    EndpointBind {
        tenant_id: String,
        port: u16,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow {location}")]
    SendBufferFull { location: ErrorLocation },

    #[error("Heartbeat timeout after {timeout_ms}ms {location}")]
    HeartbeatTimeout {
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Invalid message: {message} {location}")]
    InvalidMessage {
        message: String,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl RelayError {
    #[track_caller]
    pub fn duplicate_tenant<S: Into<String>>(tenant_id: S) -> Self {
        Self::DuplicateTenant {
            tenant_id: tenant_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_tenant<S: Into<String>>(tenant_id: S) -> Self {
        Self::UnknownTenant {
            tenant_id: tenant_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_tenant_field() -> Self {
        Self::MissingTenantField {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_message<S: Into<String>>(message: S) -> Self {
        Self::InvalidMessage {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
