use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::model::{
    ErrorReply, GameVersionsReply, Health, Unlocked, VerifyLinkBody, VerifyLinkReply,
    VerifyPasswordBody, VerifyPasswordReply,
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Used when the gateway says no without saying why.
pub const INVALID_ACCESS_CODE: &str = "Invalid access code";

#[derive(Debug, Clone)]
pub struct KeyholeClient {
    http: Client,
    base_url: Url,
}

impl KeyholeClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: with_trailing_slash(config.base_url),
        })
    }

    /// Exchanges a password for its link.
    ///
    /// The password is sent as given. A 401 comes back as
    /// [`ClientError::Rejected`] carrying the gateway's message.
    pub async fn verify_password(
        &self,
        password: &str,
        game_version: Option<&str>,
    ) -> Result<Unlocked> {
        let body = VerifyPasswordBody {
            password,
            game_version,
        };
        let reply: VerifyPasswordReply = self.post("verify-password", &body).await?;

        if !reply.success {
            return Err(ClientError::Rejected {
                status: 200,
                message: reply
                    .error
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| INVALID_ACCESS_CODE.to_string()),
            });
        }

        let link = reply
            .link
            .ok_or_else(|| ClientError::Decode("response is missing `link`".to_string()))?;

        Ok(Unlocked {
            link,
            encrypted_link: reply.encrypted_link,
        })
    }

    /// Asks whether `link` is one the gateway handed out.
    pub async fn verify_link(&self, link: &str) -> Result<bool> {
        let reply: VerifyLinkReply = self
            .post("verify-link", &VerifyLinkBody {
                encrypted_link: link,
            })
            .await?;
        Ok(reply.valid)
    }

    pub async fn game_versions(&self) -> Result<Vec<String>> {
        let reply: GameVersionsReply = self.get("game-versions").await?;
        Ok(reply.versions)
    }

    pub async fn health(&self) -> Result<Health> {
        self.get("health").await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        handle_json_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        handle_json_response(response).await
    }
}

/// `Url::join` replaces the last segment unless the base path ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()));
    }

    let message = serde_json::from_str::<ErrorReply>(&body)
        .ok()
        .and_then(|reply| reply.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    debug!(status = status.as_u16(), %message, "request rejected");

    if status.is_server_error() {
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> KeyholeClient {
        KeyholeClient::new(
            ClientConfig::builder()
                .base_url(Url::parse(base).unwrap())
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn endpoints_join_under_base_path() {
        let root = client("http://127.0.0.1:3000");
        assert_eq!(
            root.endpoint("verify-password").unwrap().as_str(),
            "http://127.0.0.1:3000/verify-password"
        );

        let nested = client("https://example.com/api");
        assert_eq!(
            nested.endpoint("health").unwrap().as_str(),
            "https://example.com/api/health"
        );

        let slashed = client("https://example.com/api/");
        assert_eq!(
            slashed.endpoint("health").unwrap().as_str(),
            "https://example.com/api/health"
        );
    }
}
