use std::time::Duration;
use ureq::Agent;

use crate::error::{OutscanError, Result};
use crate::models::{parse_users, UserRecord};

/// Legacy XMLAPI endpoint of the hosted Outscan service
pub const DEFAULT_BASE_URL: &str = "https://outscan.outpost24.com/opi/XMLAPI";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sub-account listings with `LIMIT=-1` can be large; ureq's default cap is 10MB.
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Body and status of a response that passed both success checks
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Outscan XMLAPI client
pub struct OutscanClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl OutscanClient {
    /// Create a new client.
    ///
    /// `base_url` is the XMLAPI endpoint, e.g. `https://outscan.outpost24.com/opi/XMLAPI`.
    /// A trailing `?` or `/` is tolerated.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, token: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches(['?', '/']).to_string(),
            token: token.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for the sub-account listing
    pub(crate) fn users_url(&self) -> String {
        format!(
            "{}?ACTION=SUBACCOUNTDATA&LIMIT=-1&ENCODING=utf-8&JSON=1&APPTOKEN={}",
            self.base_url,
            urlencoding::encode(&self.token)
        )
    }

    /// Check status, then the body for an application-level error marker.
    ///
    /// Outscan answers a bad token with HTTP 200 and an error document, so the
    /// status alone is not enough. Failure pages may be in any charset, so only
    /// a successful body has to be valid UTF-8.
    fn check_response(status: u16, reason: &str, body: Vec<u8>) -> Result<RawResponse> {
        if !(200..300).contains(&status) {
            return Err(OutscanError::Transport {
                status,
                reason: reason.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if body.windows(5).any(|w| w == b"error") {
            return Err(OutscanError::Application {
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let body = String::from_utf8(body)?;
        Ok(RawResponse { status, body })
    }

    /// Issue the sub-account request and return the validated response.
    pub fn fetch_raw(&self) -> Result<RawResponse> {
        log::debug!("Requesting SUBACCOUNTDATA from {}", self.base_url);

        let mut response = self
            .agent
            .get(&self.users_url())
            .header("Accept", "application/json")
            .call()?;

        let status = response.status();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()?;

        log::debug!("HTTP {} ({} bytes)", status.as_u16(), body.len());

        Self::check_response(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body,
        )
    }

    /// Fetch every sub-account visible to the token, in API order.
    pub fn get_users(&self) -> Result<Vec<UserRecord>> {
        let raw = self.fetch_raw()?;
        let users = parse_users(&raw.body)?;
        log::info!("Received {} user records", users.len());
        Ok(users)
    }
}
