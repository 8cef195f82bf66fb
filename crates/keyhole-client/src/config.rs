use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`KeyholeClient`](crate::KeyholeClient).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ClientConfig {
    /// Gateway root, e.g. `http://127.0.0.1:3000/`. Route paths are joined onto it.
    pub base_url: Url,
    /// Applies to the whole request, connect through body.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}
