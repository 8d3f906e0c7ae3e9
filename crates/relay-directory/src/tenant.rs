use serde::Deserialize;

/// A tenant ("demozone") record as returned by the directory service.
/// Immutable once loaded; the tenant set is closed after startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    /// Tenant identifier, e.g. "ZONE1"
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Routing-port hint used to derive the push endpoint port
    pub proxyport: u16,
}
