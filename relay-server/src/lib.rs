pub mod api;
pub mod cli;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

pub use api::dispatcher::{Posting, spawn_dispatcher};
pub use api::events::{IntakeState, post_event};
pub use cli::Cli;
pub use error::{Result as ServerErrorResult, ServerError};
pub use routes::build_router;
