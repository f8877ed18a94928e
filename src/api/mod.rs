mod extract;
pub mod public;
pub mod routes;
mod server;
mod state;

pub use extract::{AuthSession, bearer_token};
pub use server::{app, init_tracing, serve};
pub use state::AppState;
