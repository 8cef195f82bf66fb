//! HTTP client for the keyhole gateway.
//!
//! [`KeyholeClient`] wraps the gateway routes behind typed methods.
//! [`AccessGate`] drives a single unlock form on top of it: it trims input,
//! rejects blank codes locally and refuses a second submit while one is in
//! flight.

pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod model;

pub use client::KeyholeClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use gate::{AccessGate, GateError, GateState};
pub use model::{Health, Unlocked};
