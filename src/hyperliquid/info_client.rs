use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use super::parse::{parse_account_snapshot, parse_fills, parse_mids, parse_portfolio_windows};
use crate::models::{AccountSnapshot, Fill, PortfolioWindows};

pub const DEFAULT_INFO_URL: &str = "https://api.hyperliquid.xyz/info";

#[derive(Debug, Error)]
pub enum InfoClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Thin client for the Hyperliquid `/info` endpoint. Every request is a POST
/// with a `type` discriminator in the JSON body.
#[derive(Debug, Clone)]
pub struct InfoClient {
    http: Client,
    info_url: String,
}

impl InfoClient {
    pub fn new(http: Client, info_url: impl Into<String>) -> Self {
        Self {
            http,
            info_url: info_url.into(),
        }
    }

    /// Build a client with its own connection pool and request timeout.
    pub fn with_timeout(info_url: impl Into<String>, timeout: Duration) -> Result<Self, InfoClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("whalescan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(http, info_url))
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    async fn post(&self, payload: Value) -> Result<Value, InfoClientError> {
        let resp = self
            .http
            .post(&self.info_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json().await?)
    }

    /// Current mid price for every perp.
    pub async fn all_mids(&self) -> Result<HashMap<String, f64>, InfoClientError> {
        let resp = self.post(json!({ "type": "allMids", "dex": "" })).await?;
        if !resp.is_object() {
            return Err(InfoClientError::Unexpected("allMids did not return an object".into()));
        }
        Ok(parse_mids(&resp))
    }

    pub async fn clearinghouse_state(&self, user: &str) -> Result<AccountSnapshot, InfoClientError> {
        let resp = self
            .post(json!({ "type": "clearinghouseState", "user": user, "dex": "" }))
            .await?;
        if !resp.is_object() {
            return Err(InfoClientError::Unexpected(format!(
                "clearinghouseState for {user} did not return an object"
            )));
        }
        Ok(parse_account_snapshot(&resp))
    }

    /// Account states for several users in one request. The response is
    /// positional; entries that are not objects come back as `None`.
    pub async fn batch_clearinghouse_states(
        &self,
        users: &[String],
    ) -> Result<Vec<Option<AccountSnapshot>>, InfoClientError> {
        let resp = self
            .post(json!({ "type": "batchClearinghouseStates", "users": users, "dex": "" }))
            .await?;

        let states = resp.as_array().ok_or_else(|| {
            InfoClientError::Unexpected("batchClearinghouseStates did not return a list".into())
        })?;

        if states.len() != users.len() {
            return Err(InfoClientError::Unexpected(format!(
                "batchClearinghouseStates returned {} states for {} users",
                states.len(),
                users.len()
            )));
        }

        Ok(states
            .iter()
            .map(|st| st.is_object().then(|| parse_account_snapshot(st)))
            .collect())
    }

    pub async fn user_fills(&self, user: &str) -> Result<Vec<Fill>, InfoClientError> {
        let resp = self.post(json!({ "type": "userFills", "user": user })).await?;
        if !resp.is_array() {
            return Err(InfoClientError::Unexpected(format!(
                "userFills for {user} did not return a list"
            )));
        }
        Ok(parse_fills(&resp))
    }

    pub async fn portfolio(&self, user: &str) -> Result<PortfolioWindows, InfoClientError> {
        let resp = self.post(json!({ "type": "portfolio", "user": user })).await?;
        Ok(parse_portfolio_windows(&resp))
    }
}
