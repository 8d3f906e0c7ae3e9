mod registry;

use relay_directory::Tenant;

/// Shorthand for building directory records in tests
pub(crate) fn tenant(id: &str, proxyport: u16) -> Tenant {
    Tenant {
        id: id.to_string(),
        name: format!("{id} test zone"),
        proxyport,
    }
}
