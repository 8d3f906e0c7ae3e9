use crate::{DirectoryError, DirectoryResult, Tenant};

use std::panic::Location;

use error_location::ErrorLocation;
use log::{debug, info};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;

/// Path of the zone listing on the directory service
const ZONE_PATH: &str = "/ords/pdb1/anki/demozone/zone/";

/// Shape of the directory listing response
#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    items: Vec<Tenant>,
}

/// HTTP client for the tenant directory service.
///
/// Issues a single fetch at startup; there is no retry policy here - the
/// lifecycle coordinator fails fast on any error.
pub struct DirectoryClient {
    base_url: String,
    client: ReqwestClient,
}

impl DirectoryClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Directory service URL (e.g., "https://directory.example.com")
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: ReqwestClient::new(),
        }
    }

    /// Fetch the full list of known tenants, in directory order.
    ///
    /// Fails with `Unavailable` on transport errors or non-success status,
    /// `Malformed` when the body does not decode, and `Empty` when the
    /// listing contains zero records. All three are startup-fatal for the
    /// caller.
    pub async fn fetch_tenants(&self) -> DirectoryResult<Vec<Tenant>> {
        let url = format!("{}{}", self.base_url, ZONE_PATH);
        debug!("Fetching tenant directory: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| DirectoryError::Unavailable {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let body: DirectoryResponse =
            response
                .json()
                .await
                .map_err(|source| DirectoryError::Malformed {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                })?;

        if body.items.is_empty() {
            return Err(DirectoryError::Empty {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Directory returned {} tenant(s)", body.items.len());

        Ok(body.items)
    }
}
