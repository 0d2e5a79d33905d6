// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Certification pass threshold (inclusive).
pub const PASSING_SCORE_PERCENTAGE: f64 = 65.0;

/// Badge tier thresholds, inclusive at the boundary.
pub const PLATINUM_THRESHOLD: f64 = 95.0;
pub const GOLD_THRESHOLD: f64 = 85.0;
pub const SILVER_THRESHOLD: f64 = 75.0;

/// Default execution limits when a question does not specify its own.
pub const DEFAULT_CPU_TIME_LIMIT_SECS: f64 = 5.0;
pub const DEFAULT_MEMORY_LIMIT_KB: u32 = 128_000;

/// Which execution strategy serves judge requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Remote sandboxed execution service (the default).
    Remote,
    /// Local interpreter processes. Weaker isolation; see `LocalProcessBackend`.
    Local,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// Base URL of the remote execution service.
    pub judge_base_url: String,
    /// API key for the remote execution service. Requests fail with a
    /// configuration error when unset and the remote backend is selected.
    pub judge_api_key: Option<String>,
    pub execution_mode: ExecutionMode,

    /// Polling ceiling: `poll_max_attempts * poll_interval_ms` bounds the
    /// wall-clock wait for a verdict (default 30 x 1000ms = 30s).
    pub poll_max_attempts: u32,
    pub poll_interval_ms: u64,

    /// Fraction of the certification percentage taken from coding questions.
    /// 0.0 keeps the documented MCQ-only default.
    pub coding_weight: f64,

    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let judge_base_url =
            env::var("JUDGE_API_URL").unwrap_or_else(|_| "http://localhost:2358".to_string());

        let judge_api_key = env::var("JUDGE_API_KEY").ok();

        let execution_mode = match env::var("EXECUTION_MODE").as_deref() {
            Ok("local") => ExecutionMode::Local,
            _ => ExecutionMode::Remote,
        };

        let poll_max_attempts = env::var("POLL_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let coding_weight = env::var("CODING_WEIGHT")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .map(|w| w.clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            judge_base_url,
            judge_api_key,
            execution_mode,
            poll_max_attempts,
            poll_interval_ms,
            coding_weight,
            rust_log,
        }
    }
}
