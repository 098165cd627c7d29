//! Rewards API payloads and error kinds.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Marker the rewards gateway puts in its HTML timeout page.
pub const GATEWAY_TIMEOUT_MARKER: &str = "<title>504 Gateway Time-out</title>";

/// Message returned by the referral endpoint for known wallets.
pub const ALREADY_REFERRED_MESSAGE: &str = "Already referred!";

/// Errors returned by the rewards boundary, classified where they happen.
#[derive(Debug, Error)]
pub enum RewardsError {
    /// No response within the request deadline.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The gateway answered with its 504 page.
    #[error("504 Gateway Time-out")]
    GatewayTimeout,

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection or protocol failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// A configured header value is not valid HTTP.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

pub type RewardsResult<T> = Result<T, RewardsError>;

/// Result of a referral registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralOutcome {
    Registered,
    AlreadyReferred,
}

/// Body of `POST /transaction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    pub blockchain_id: u64,
    pub from_amount: String,
    pub from_token_address: String,
    pub from_token_symbol: String,
    pub gas_fee_amount: String,
    pub gas_fee_token_address: String,
    pub gas_fee_token_symbol: String,
    pub hash: String,
    pub to_amount: String,
    pub to_token_address: String,
    pub to_token_symbol: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub wallet_address: String,
}

/// Verification result for a reported transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// HTTP status of the verification response (201 when accepted).
    #[serde(skip)]
    pub status: u16,
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default, deserialize_with = "points_amount")]
    pub points_amount: f64,
}

/// Body of `GET /points/<address>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsResponse {
    #[serde(deserialize_with = "points_amount")]
    pub points_amount: f64,
}

/// Error body shape used by the referral endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub message: String,
}

/// Accept points as a JSON number or a numeric string.
fn points_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Map a failed response to an error kind.
pub fn classify_failure(status: u16, body: &str) -> RewardsError {
    if status == 504 || body.contains(GATEWAY_TIMEOUT_MARKER) {
        return RewardsError::GatewayTimeout;
    }
    RewardsError::Status {
        status,
        body: body.chars().take(200).collect(),
    }
}
