mod health;
mod link;
mod versions;

pub use health::health_handler;
pub use link::{verify_link_handler, verify_password_handler};
pub use versions::game_versions_handler;
