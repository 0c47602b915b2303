pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(test)]
mod routes_tests;

pub use error::ApiError;
pub use routes::create_app;
pub use state::AppState;
