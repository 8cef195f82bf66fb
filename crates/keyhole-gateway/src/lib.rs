//! HTTP gateway exposing the password-to-link resolver.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod seed;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
