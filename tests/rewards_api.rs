//! Rewards client tests against a programmable mock HTTP backend.

use alloy::primitives::Address;
use std::net::SocketAddr;
use std::time::Duration;

use wrap_points_bot::config::RewardsConfig;
use wrap_points_bot::rewards::{ReferralOutcome, Rewards, RewardsClient, RewardsError, TransactionReport};

mod common;

fn client_for(addr: SocketAddr, timeout_secs: u64) -> RewardsClient {
    let config = RewardsConfig {
        base_url: format!("http://{}", addr),
        identity_url: format!("http://{}/identity", addr),
        request_timeout_secs: timeout_secs,
        ..RewardsConfig::default()
    };
    RewardsClient::new(&config).unwrap()
}

fn owner() -> Address {
    common::wallet(0).address()
}

#[tokio::test]
async fn test_check_in_success() {
    let (addr, requests) = common::start_programmable_backend(|_| async { (200, "{}".to_string()) }).await;
    let client = client_for(addr, 5);

    client.check_in(owner()).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].target,
        format!("/wallet/check-in/current?address={}", owner())
    );
    assert_eq!(requests[0].header("origin"), Some("https://app.tea-fi.com"));
    assert_eq!(requests[0].header("referer"), Some("https://app.tea-fi.com/"));
    assert!(requests[0].header("user-agent").is_some());
}

#[tokio::test]
async fn test_check_in_gateway_timeout_page() {
    let page = "<html><head><title>504 Gateway Time-out</title></head></html>";
    let (addr, _) = common::start_programmable_backend(move |_| async move { (504, page.to_string()) }).await;
    let client = client_for(addr, 5);

    let err = client.check_in(owner()).await.unwrap_err();
    assert!(matches!(err, RewardsError::GatewayTimeout), "got {err:?}");
}

#[tokio::test]
async fn test_check_in_other_failure_keeps_status() {
    let (addr, _) =
        common::start_programmable_backend(|_| async { (400, r#"{"message":"Already checked in"}"#.to_string()) })
            .await;
    let client = client_for(addr, 5);

    match client.check_in(owner()).await.unwrap_err() {
        RewardsError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Already checked in"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_referral_registered() {
    let (addr, requests) = common::start_programmable_backend(|_| async { (201, "{}".to_string()) }).await;
    let client = client_for(addr, 5);

    let outcome = client.register_referral(owner(), "qaikt6").await.unwrap();
    assert_eq!(outcome, ReferralOutcome::Registered);

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/referrals");
    let body = requests[0].json();
    assert_eq!(body["code"], "qaikt6");
    assert_eq!(body["address"], owner().to_string());
}

#[tokio::test]
async fn test_referral_already_referred() {
    let (addr, _) =
        common::start_programmable_backend(|_| async { (400, r#"{"message":"Already referred!"}"#.to_string()) })
            .await;
    let client = client_for(addr, 5);

    let outcome = client.register_referral(owner(), "qaikt6").await.unwrap();
    assert_eq!(outcome, ReferralOutcome::AlreadyReferred);
}

#[tokio::test]
async fn test_referral_other_error() {
    let (addr, _) =
        common::start_programmable_backend(|_| async { (500, r#"{"message":"boom"}"#.to_string()) }).await;
    let client = client_for(addr, 5);

    let err = client.register_referral(owner(), "qaikt6").await.unwrap_err();
    assert!(matches!(err, RewardsError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_one_time_reward_body() {
    let (addr, requests) = common::start_programmable_backend(|_| async { (201, "{}".to_string()) }).await;
    let client = client_for(addr, 5);

    client.claim_one_time_reward(owner()).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].target, "/points/one-time-action");
    let body = requests[0].json();
    assert_eq!(body["action"], 0);
    assert_eq!(body["walletAddress"], owner().to_string());
}

#[tokio::test]
async fn test_identity_lookup_query() {
    let (addr, requests) = common::start_programmable_backend(|_| async { (200, "{}".to_string()) }).await;
    let client = client_for(addr, 5);

    client.verify_identity(owner()).await.unwrap();

    let requests = requests.lock().unwrap();
    let target = &requests[0].target;
    assert!(target.starts_with(&format!("/identity/{}?", owner())));
    assert!(target.contains("projectId=c4c07616f2ce534e3f61779c51f3d3aa"));
    assert!(target.contains(&format!("sender={}", owner())));
}

#[tokio::test]
async fn test_transaction_verification_parsed() {
    let (addr, requests) = common::start_programmable_backend(|req| async move {
        if req.target == "/transaction" {
            (201, r#"{"id":"abc-1","pointsAmount":"12.5"}"#.to_string())
        } else {
            (404, "{}".to_string())
        }
    })
    .await;
    let client = client_for(addr, 5);

    let report = TransactionReport {
        blockchain_id: 137,
        from_amount: "10000000000000000".to_string(),
        from_token_address: "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270".to_string(),
        from_token_symbol: "WPOL".to_string(),
        gas_fee_amount: "1500000000000000".to_string(),
        gas_fee_token_address: Address::ZERO.to_string(),
        gas_fee_token_symbol: "POL".to_string(),
        hash: format!("0x{}", "ab".repeat(32)),
        to_amount: "10000000000000000".to_string(),
        to_token_address: "0x1Cd0cd01c8C902AdAb3430ae04b9ea32CB309CF1".to_string(),
        to_token_symbol: "tPOL".to_string(),
        kind: 2,
        wallet_address: owner().to_string(),
    };

    let verification = client.report_transaction(&report).await.unwrap();
    assert_eq!(verification.status, 201);
    assert_eq!(verification.id, serde_json::json!("abc-1"));
    assert_eq!(verification.points_amount, 12.5);

    let requests = requests.lock().unwrap();
    let body = requests[0].json();
    assert_eq!(body["type"], 2);
    assert_eq!(body["blockchainId"], 137);
    assert_eq!(body["gasFeeAmount"], "1500000000000000");
    assert_eq!(body["walletAddress"], owner().to_string());
}

fn sample_report() -> TransactionReport {
    TransactionReport {
        blockchain_id: 137,
        from_amount: "1".to_string(),
        from_token_address: Address::ZERO.to_string(),
        from_token_symbol: "WPOL".to_string(),
        gas_fee_amount: "1".to_string(),
        gas_fee_token_address: Address::ZERO.to_string(),
        gas_fee_token_symbol: "POL".to_string(),
        hash: format!("0x{}", "cd".repeat(32)),
        to_amount: "1".to_string(),
        to_token_address: Address::ZERO.to_string(),
        to_token_symbol: "tPOL".to_string(),
        kind: 2,
        wallet_address: owner().to_string(),
    }
}

#[tokio::test]
async fn test_transaction_accepted_with_empty_body() {
    let (addr, _) = common::start_programmable_backend(|_| async { (201, String::new()) }).await;
    let client = client_for(addr, 5);

    let verification = client.report_transaction(&sample_report()).await.unwrap();
    assert_eq!(verification.status, 201);
    assert!(verification.id.is_null());
    assert_eq!(verification.points_amount, 0.0);
}

#[tokio::test]
async fn test_transaction_unreadable_body_keeps_status() {
    let (addr, _) = common::start_programmable_backend(|_| async { (201, "not json".to_string()) }).await;
    let client = client_for(addr, 5);

    match client.report_transaction(&sample_report()).await.unwrap_err() {
        RewardsError::Decode(message) => assert!(message.contains("201"), "got {message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_points_lookup() {
    let (addr, requests) =
        common::start_programmable_backend(|_| async { (200, r#"{"pointsAmount":42}"#.to_string()) }).await;
    let client = client_for(addr, 5);

    assert_eq!(client.points(owner()).await.unwrap(), 42.0);
    assert_eq!(requests.lock().unwrap()[0].target, format!("/points/{}", owner()));
}

#[tokio::test]
async fn test_points_unexpected_body() {
    let (addr, _) = common::start_programmable_backend(|_| async { (200, "not json".to_string()) }).await;
    let client = client_for(addr, 5);

    let err = client.points(owner()).await.unwrap_err();
    assert!(matches!(err, RewardsError::Decode(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let (addr, _) = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "{}".to_string())
    })
    .await;
    let client = client_for(addr, 1);

    let err = client.check_in(owner()).await.unwrap_err();
    assert!(matches!(err, RewardsError::Timeout(1)), "got {err:?}");
}
