//! HTTPS client for the rewards service.
//!
//! Every request races a fixed deadline; a timeout is reported as
//! `RewardsError::Timeout` and is never retried.

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::RewardsConfig;
use crate::observability::metrics;
use crate::rewards::headers::browser_headers;
use crate::rewards::types::{
    classify_failure, MessageBody, PointsResponse, ReferralOutcome, RewardsError, RewardsResult,
    TransactionReport, Verification, ALREADY_REFERRED_MESSAGE,
};
use crate::rewards::Rewards;

/// reqwest-backed rewards API client.
#[derive(Debug, Clone)]
pub struct RewardsClient {
    http: reqwest::Client,
    base_url: String,
    identity_url: String,
    identity_project_id: String,
    timeout_secs: u64,
}

impl RewardsClient {
    pub fn new(config: &RewardsConfig) -> RewardsResult<Self> {
        let http = reqwest::Client::builder()
            .default_headers(browser_headers(&config.app_origin)?)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity_url: config.identity_url.trim_end_matches('/').to_string(),
            identity_project_id: config.identity_project_id.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request under the deadline and return status plus body text.
    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> RewardsResult<(StatusCode, String)> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let result = match timeout(Duration::from_secs(self.timeout_secs), exchange).await {
            Ok(Ok(pair)) => Ok(pair),
            Ok(Err(e)) => Err(RewardsError::Transport(e)),
            Err(_) => Err(RewardsError::Timeout(self.timeout_secs)),
        };

        let ok = matches!(&result, Ok((status, _)) if status.is_success());
        metrics::record_rewards_request(endpoint, ok);
        if let Ok((status, _)) = &result {
            tracing::debug!(endpoint, status = status.as_u16(), "Rewards API response");
        }
        result
    }

    /// Like `send`, but any non-success status becomes an error.
    async fn send_expecting_success(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> RewardsResult<(StatusCode, String)> {
        let (status, body) = self.send(endpoint, request).await?;
        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &body));
        }
        Ok((status, body))
    }
}

#[async_trait]
impl Rewards for RewardsClient {
    async fn verify_identity(&self, address: Address) -> RewardsResult<()> {
        let url = format!("{}/{}", self.identity_url, address);
        let request = self.http.get(url).query(&[
            ("projectId", self.identity_project_id.clone()),
            ("sender", address.to_string()),
        ]);
        self.send_expecting_success("identity", request).await?;
        Ok(())
    }

    async fn register_referral(&self, address: Address, code: &str) -> RewardsResult<ReferralOutcome> {
        let request = self
            .http
            .post(self.url("/referrals"))
            .json(&json!({ "address": address.to_string(), "code": code }));

        let (status, body) = self.send("referrals", request).await?;
        if status.is_success() {
            return Ok(ReferralOutcome::Registered);
        }

        let already = serde_json::from_str::<MessageBody>(&body)
            .map(|b| b.message == ALREADY_REFERRED_MESSAGE)
            .unwrap_or(false);
        if already {
            return Ok(ReferralOutcome::AlreadyReferred);
        }
        Err(classify_failure(status.as_u16(), &body))
    }

    async fn claim_one_time_reward(&self, address: Address) -> RewardsResult<()> {
        let request = self
            .http
            .post(self.url("/points/one-time-action"))
            .json(&json!({ "action": 0, "walletAddress": address.to_string() }));
        self.send_expecting_success("one_time_action", request).await?;
        Ok(())
    }

    async fn check_in(&self, address: Address) -> RewardsResult<()> {
        let request = self
            .http
            .get(self.url("/wallet/check-in/current"))
            .query(&[("address", address.to_string())]);

        let (status, body) = self.send("check_in", request).await?;
        if status != StatusCode::OK {
            return Err(classify_failure(status.as_u16(), &body));
        }
        Ok(())
    }

    async fn report_transaction(&self, report: &TransactionReport) -> RewardsResult<Verification> {
        let request = self.http.post(self.url("/transaction")).json(report);
        let (status, body) = self.send_expecting_success("transaction", request).await?;

        // An accepted report with no body still carries its status.
        if body.trim().is_empty() {
            return Ok(Verification {
                status: status.as_u16(),
                id: serde_json::Value::Null,
                points_amount: 0.0,
            });
        }
        let mut verification: Verification = serde_json::from_str(&body)
            .map_err(|e| RewardsError::Decode(format!("status {}: {}", status.as_u16(), e)))?;
        verification.status = status.as_u16();
        Ok(verification)
    }

    async fn points(&self, address: Address) -> RewardsResult<f64> {
        let request = self.http.get(self.url(&format!("/points/{}", address)));
        let (_, body) = self.send_expecting_success("points", request).await?;

        let points: PointsResponse =
            serde_json::from_str(&body).map_err(|e| RewardsError::Decode(e.to_string()))?;
        Ok(points.points_amount)
    }
}
