use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::client::KeyholeClient;

pub const EMPTY_INPUT: &str = "Please enter an access code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Verifying,
    Granted { link: String },
    Denied { message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("a verification is already in progress")]
    Busy,
}

#[derive(Debug)]
struct Inner {
    state: GateState,
    // bumped on every submit and reset; stale completions are dropped
    epoch: u64,
}

/// Unlock flow for one access-code form.
///
/// `Idle -> Verifying -> Granted | Denied`, back to `Idle` on [`reset`](Self::reset).
/// Only one verification runs at a time.
#[derive(Debug)]
pub struct AccessGate {
    client: KeyholeClient,
    inner: Mutex<Inner>,
}

impl AccessGate {
    pub fn new(client: KeyholeClient) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                state: GateState::Idle,
                epoch: 0,
            }),
        }
    }

    pub fn state(&self) -> GateState {
        self.inner.lock().state.clone()
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.state = GateState::Idle;
    }

    /// Verifies `input` and returns the state it settled in.
    ///
    /// Blank input is denied without a request. Fails with [`GateError::Busy`]
    /// while another submit is still verifying.
    pub async fn submit(
        &self,
        input: &str,
        game_version: Option<&str>,
    ) -> Result<GateState, GateError> {
        let code = input.trim();

        let epoch = {
            let mut inner = self.inner.lock();
            if inner.state == GateState::Verifying {
                return Err(GateError::Busy);
            }
            inner.epoch += 1;
            if code.is_empty() {
                inner.state = GateState::Denied {
                    message: EMPTY_INPUT.to_string(),
                };
                return Ok(inner.state.clone());
            }
            inner.state = GateState::Verifying;
            inner.epoch
        };

        let mut guard = VerifyingGuard {
            inner: &self.inner,
            epoch,
            armed: true,
        };

        let settled = match self.client.verify_password(code, game_version).await {
            Ok(unlocked) => GateState::Granted {
                link: unlocked.link,
            },
            Err(err) => {
                debug!(error = %err, "access code rejected");
                GateState::Denied {
                    message: err.user_message().to_string(),
                }
            }
        };

        guard.armed = false;
        let mut inner = self.inner.lock();
        if inner.epoch == epoch {
            inner.state = settled;
        }
        Ok(inner.state.clone())
    }
}

/// Puts the gate back to `Idle` if a submit is cancelled mid-request.
struct VerifyingGuard<'a> {
    inner: &'a Mutex<Inner>,
    epoch: u64,
    armed: bool,
}

impl Drop for VerifyingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.epoch == self.epoch && inner.state == GateState::Verifying {
            inner.state = GateState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use url::Url;

    fn gate() -> AccessGate {
        // never contacted by these tests
        let config = ClientConfig::builder()
            .base_url(Url::parse("http://127.0.0.1:9").unwrap())
            .build();
        AccessGate::new(KeyholeClient::new(config).unwrap())
    }

    #[tokio::test]
    async fn blank_input_is_denied_locally() {
        let gate = gate();

        for input in ["", "   ", "\t\n"] {
            let state = gate.submit(input, None).await.unwrap();
            assert_eq!(
                state,
                GateState::Denied {
                    message: EMPTY_INPUT.to_string()
                }
            );
        }
    }

    #[test]
    fn reset_returns_to_idle() {
        let gate = gate();
        gate.inner.lock().state = GateState::Granted {
            link: "https://example.com".into(),
        };

        gate.reset();

        assert_eq!(gate.state(), GateState::Idle);
    }

    #[tokio::test]
    async fn submit_while_verifying_is_busy() {
        let gate = gate();
        gate.inner.lock().state = GateState::Verifying;

        assert_eq!(gate.submit("abc123", None).await, Err(GateError::Busy));
        assert_eq!(gate.state(), GateState::Verifying);
    }
}
