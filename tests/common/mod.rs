//! Shared utilities for integration tests.

#![allow(dead_code)]

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wrap_points_bot::actions::{ActionExecutor, Pipeline};
use wrap_points_bot::blockchain::contracts::MAX_APPROVAL;
use wrap_points_bot::blockchain::{BlockchainError, BlockchainResult, Ledger, TxIntent, TxReceipt, Wallet};
use wrap_points_bot::config::BotConfig;
use wrap_points_bot::rewards::{ReferralOutcome, Rewards, RewardsError, RewardsResult, TransactionReport, Verification};

/// Well-known development keys (Anvil accounts 0..=2).
pub const KEYS: [&str; 3] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

pub const GWEI: u128 = 1_000_000_000;

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn wallet(index: usize) -> Wallet {
    Wallet::from_private_key(KEYS[index], 137).unwrap()
}

pub fn pipeline() -> Pipeline {
    Pipeline::from_config(&BotConfig::default()).unwrap()
}

pub fn executor(ledger: FakeLedger, rewards: FakeRewards) -> ActionExecutor<FakeLedger, FakeRewards> {
    ActionExecutor::new(ledger, rewards, pipeline())
}

// ---------------------------------------------------------------------------
// Fake ledger
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct LedgerState {
    /// Consumed one per balance read; `default_native` once empty.
    pub native_reads: VecDeque<U256>,
    pub default_native: U256,
    pub gas_price: u128,
    pub allowance: U256,
    pub token_balance: U256,
    pub fail_balance_reads: bool,
    /// Labels whose submission reverts.
    pub failing_labels: Vec<&'static str>,
    pub submitted: Vec<TxIntent>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            native_reads: VecDeque::new(),
            default_native: ether(100),
            gas_price: 30 * GWEI,
            allowance: U256::ZERO,
            token_balance: U256::ZERO,
            fail_balance_reads: false,
            failing_labels: Vec::new(),
            submitted: Vec::new(),
        }
    }
}

/// In-memory ledger. Approvals raise the allowance, unwraps empty the
/// target balance.
#[derive(Debug, Default)]
pub struct FakeLedger {
    pub state: Mutex<LedgerState>,
}

impl FakeLedger {
    pub fn with(state: LedgerState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn submitted_labels(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().submitted.iter().map(|i| i.label).collect()
    }

    pub fn submitted(&self) -> Vec<TxIntent> {
        self.state.lock().unwrap().submitted.clone()
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn native_balance(&self, _owner: Address) -> BlockchainResult<U256> {
        let mut state = self.state.lock().unwrap();
        if state.fail_balance_reads {
            return Err(BlockchainError::Timeout(10));
        }
        let default = state.default_native;
        Ok(state.native_reads.pop_front().unwrap_or(default))
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        Ok(self.state.lock().unwrap().gas_price)
    }

    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> BlockchainResult<U256> {
        Ok(self.state.lock().unwrap().allowance)
    }

    async fn token_balance(&self, _token: Address, _owner: Address) -> BlockchainResult<U256> {
        Ok(self.state.lock().unwrap().token_balance)
    }

    async fn submit(&self, _wallet: &Wallet, intent: &TxIntent) -> BlockchainResult<TxReceipt> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(intent.clone());
        let tx_hash = B256::with_last_byte(state.submitted.len() as u8);

        if state.failing_labels.contains(&intent.label) {
            return Err(BlockchainError::Reverted(tx_hash));
        }
        match intent.label {
            "approve" => state.allowance = MAX_APPROVAL,
            "unwrap" => state.token_balance = U256::ZERO,
            _ => {}
        }

        Ok(TxReceipt {
            tx_hash,
            gas_used: 50_000,
            effective_gas_price: 30 * GWEI,
        })
    }
}

// ---------------------------------------------------------------------------
// Fake rewards service
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RewardsState {
    /// Call log, e.g. `check_in:0xabc..`.
    pub calls: Vec<String>,
    pub reports: Vec<TransactionReport>,
    pub check_in_fails: bool,
    pub already_referred: bool,
    pub points_fail: bool,
}

#[derive(Debug, Default)]
pub struct FakeRewards {
    pub state: Mutex<RewardsState>,
}

impl FakeRewards {
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls whose name starts with `prefix`.
    pub fn calls_named(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Rewards for FakeRewards {
    async fn verify_identity(&self, address: Address) -> RewardsResult<()> {
        self.record(format!("identity:{address}"));
        Ok(())
    }

    async fn register_referral(&self, address: Address, code: &str) -> RewardsResult<ReferralOutcome> {
        self.record(format!("referral:{address}:{code}"));
        if self.state.lock().unwrap().already_referred {
            Ok(ReferralOutcome::AlreadyReferred)
        } else {
            Ok(ReferralOutcome::Registered)
        }
    }

    async fn claim_one_time_reward(&self, address: Address) -> RewardsResult<()> {
        self.record(format!("one_time:{address}"));
        Ok(())
    }

    async fn check_in(&self, address: Address) -> RewardsResult<()> {
        self.record(format!("check_in:{address}"));
        if self.state.lock().unwrap().check_in_fails {
            return Err(RewardsError::GatewayTimeout);
        }
        Ok(())
    }

    async fn report_transaction(&self, report: &TransactionReport) -> RewardsResult<Verification> {
        self.record(format!("report:{}", report.hash));
        self.state.lock().unwrap().reports.push(report.clone());
        Ok(Verification {
            status: 201,
            id: serde_json::json!(1),
            points_amount: 10.0,
        })
    }

    async fn points(&self, address: Address) -> RewardsResult<f64> {
        self.record(format!("points:{address}"));
        if self.state.lock().unwrap().points_fail {
            return Err(RewardsError::Timeout(5));
        }
        Ok(42.0)
    }
}

// ---------------------------------------------------------------------------
// Programmable HTTP backend
// ---------------------------------------------------------------------------

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    /// Lower-cased header names.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == &name.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// Every request is recorded and answered with the `(status, body)` the
/// handler returns.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = recorded.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        log.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            504 => "504 Gateway Time-out",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorded)
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}
