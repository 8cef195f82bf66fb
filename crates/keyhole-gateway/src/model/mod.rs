mod health;
mod link;
mod versions;

pub use health::HealthResponse;
pub use link::{
    ErrorResponse, VerifyLinkRequest, VerifyLinkResponse, VerifyPasswordRequest,
    VerifyPasswordResponse,
};
pub use versions::GameVersionsResponse;
