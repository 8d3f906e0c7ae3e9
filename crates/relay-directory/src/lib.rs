mod client;
mod error;
mod tenant;

pub use client::DirectoryClient;
pub use error::{DirectoryError, DirectoryResult};
pub use tenant::Tenant;
