// src/judge/backend.rs
//
// Clients for the sandboxed execution service. `RemoteBackend` talks to the
// remote service over HTTP; `LocalProcessBackend` is an alternate strategy
// behind the same trait that runs interpreted code in local processes.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::judge::language::Language;

/// Terminal and non-terminal verdict states of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionStatus {
    Queued,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimit,
    CompileError,
    RuntimeError,
    InternalError,
}

impl ExecutionStatus {
    /// Maps the execution service's numeric status ids.
    /// Ids 1 (queued) and 2 (processing) are the only non-terminal states.
    pub fn from_backend_id(id: i64) -> Self {
        match id {
            1 => ExecutionStatus::Queued,
            2 => ExecutionStatus::Processing,
            3 => ExecutionStatus::Accepted,
            4 => ExecutionStatus::WrongAnswer,
            5 => ExecutionStatus::TimeLimit,
            6 => ExecutionStatus::CompileError,
            7..=12 => ExecutionStatus::RuntimeError,
            _ => ExecutionStatus::InternalError,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Queued | ExecutionStatus::Processing)
    }
}

/// Raw outcome of one sandboxed execution. Transient: consumed immediately by
/// the judge engine, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    pub time_secs: Option<f64>,
    pub memory_kb: Option<i64>,
}

/// CPU time in seconds, memory in kilobytes.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLimits {
    pub cpu_time_secs: f64,
    pub memory_kb: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_time_secs: crate::config::DEFAULT_CPU_TIME_LIMIT_SECS,
            memory_kb: crate::config::DEFAULT_MEMORY_LIMIT_KB,
        }
    }
}

/// One status check: either still running or a terminal result.
#[derive(Debug)]
pub enum PollOutcome {
    InProgress,
    Finished(ExecutionResult),
}

/// Execution strategy boundary. The backend knows HOW to execute; it does not
/// evaluate correctness — that stays in the judge engine.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Submits a prepared program. Fails with `ServiceUnavailable` when the
    /// service is unreachable and `ConfigurationError` when no credential is
    /// configured.
    async fn submit(
        &self,
        source: &str,
        language: Language,
        stdin: &str,
        limits: &ResourceLimits,
    ) -> Result<String, AppError>;

    /// A single status check for a previously submitted token.
    async fn poll(&self, token: &str) -> Result<PollOutcome, AppError>;

    /// Polls at a fixed interval until a terminal status is observed or
    /// `max_attempts` is exhausted. The deterministic ceiling is
    /// `max_attempts * interval` of wall-clock time.
    async fn await_result(
        &self,
        token: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<ExecutionResult, AppError> {
        for _ in 0..max_attempts {
            tokio::time::sleep(interval).await;
            if let PollOutcome::Finished(result) = self.poll(token).await? {
                return Ok(result);
            }
        }
        Err(AppError::ExecutionTimeout(
            "Execution did not finish within the polling window".to_string(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct SubmitBody {
    source_code: String,
    language_id: u32,
    stdin: String,
    cpu_time_limit: f64,
    memory_limit: u32,
    wait: bool,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    id: i64,
    #[allow(dead_code)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSubmission {
    status: RawStatus,
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    time: Option<String>,
    memory: Option<f64>,
}

/// HTTP client for the remote execution service.
///
/// Wire contract: request and response bodies are base64-encoded on both legs
/// (`base64_encoded=true`). This is the single encoding convention for the
/// whole system; callers never see raw transport encodings.
pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.judge_base_url.trim_end_matches('/').to_string(),
            api_key: config.judge_api_key.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigurationError(
                "JUDGE_API_KEY is not set; cannot reach the execution service".to_string(),
            )
        })
    }

    /// The service wraps base64 payloads across lines; strip whitespace
    /// before decoding. Falls back to the raw text on a malformed payload.
    fn decode_field(field: Option<String>) -> String {
        let Some(raw) = field else {
            return String::new();
        };
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        match general_purpose::STANDARD.decode(&compact) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!("Failed to base64-decode execution output: {}", e);
                raw
            }
        }
    }
}

#[async_trait]
impl ExecutionBackend for RemoteBackend {
    async fn submit(
        &self,
        source: &str,
        language: Language,
        stdin: &str,
        limits: &ResourceLimits,
    ) -> Result<String, AppError> {
        let api_key = self.api_key()?.to_string();

        let body = SubmitBody {
            source_code: general_purpose::STANDARD.encode(source),
            language_id: language.backend_id(),
            stdin: general_purpose::STANDARD.encode(stdin),
            cpu_time_limit: limits.cpu_time_secs,
            memory_limit: limits.memory_kb,
            wait: false,
        };

        let url = format!("{}/submissions?base64_encoded=true&wait=false", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("X-Auth-Token", api_key)
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::TooManyRequests(
                "Execution service rate limit reached; retry after a short backoff".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(AppError::ServiceUnavailable(format!(
                "Execution service returned HTTP {}",
                response.status()
            )));
        }

        let parsed: SubmitResponse = response.json().await?;
        Ok(parsed.token)
    }

    async fn poll(&self, token: &str) -> Result<PollOutcome, AppError> {
        let api_key = self.api_key()?.to_string();

        let url = format!(
            "{}/submissions/{}?base64_encoded=true",
            self.base_url, token
        );
        let response = self
            .http
            .get(&url)
            .header("X-Auth-Token", api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::TooManyRequests(
                "Execution service rate limit reached; retry after a short backoff".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(AppError::ServiceUnavailable(format!(
                "Execution service returned HTTP {}",
                response.status()
            )));
        }

        let raw: RawSubmission = response.json().await?;
        let status = ExecutionStatus::from_backend_id(raw.status.id);
        if !status.is_terminal() {
            return Ok(PollOutcome::InProgress);
        }

        Ok(PollOutcome::Finished(ExecutionResult {
            status,
            stdout: Self::decode_field(raw.stdout),
            stderr: Self::decode_field(raw.stderr),
            compile_output: Self::decode_field(raw.compile_output),
            time_secs: raw.time.and_then(|t| t.parse().ok()),
            memory_kb: raw.memory.map(|m| m as i64),
        }))
    }
}

/// Alternate execution strategy: runs interpreted submissions in a local
/// interpreter process with a hard wall-clock timeout.
///
/// In-process / same-host interpreter sandboxes are NOT a sufficient security
/// boundary for genuinely untrusted code. Deploy this mode only behind
/// process-level sandboxing (container, micro-VM or equivalent).
pub struct LocalProcessBackend {
    results: Mutex<HashMap<String, ExecutionResult>>,
}

impl LocalProcessBackend {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
        }
    }

    fn interpreter(language: Language) -> Result<(&'static str, &'static str), AppError> {
        match language {
            Language::Python => Ok(("python3", "-c")),
            Language::Javascript => Ok(("node", "-e")),
            other => Err(AppError::UnsupportedLanguage(format!(
                "Local execution supports python and javascript only, got '{}'",
                other
            ))),
        }
    }
}

impl Default for LocalProcessBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBackend for LocalProcessBackend {
    async fn submit(
        &self,
        source: &str,
        language: Language,
        stdin: &str,
        limits: &ResourceLimits,
    ) -> Result<String, AppError> {
        let (program, eval_flag) = Self::interpreter(language)?;

        let mut child = Command::new(program)
            .arg(eval_flag)
            .arg(source)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::ServiceUnavailable(format!("Failed to spawn {}: {}", program, e))
            })?;

        let stdin_handle = child.stdin.take();
        let payload = stdin.as_bytes().to_vec();

        let started = std::time::Instant::now();
        let timeout = Duration::from_secs_f64(limits.cpu_time_secs);

        // The stdin write runs concurrently with the output drain. A child
        // that floods stdout before reading stdin would otherwise block the
        // parent's write outside the timed section. EPIPE from a child that
        // exits without reading is not an error.
        let execution = async {
            let feed = async {
                if let Some(mut handle) = stdin_handle {
                    let _ = handle.write_all(&payload).await;
                    let _ = handle.shutdown().await;
                }
            };
            let (_, output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        // kill_on_drop reaps the child when the timeout drops the future.
        let result = match tokio::time::timeout(timeout, execution).await {
            Ok(Ok(output)) => ExecutionResult {
                status: if output.status.success() {
                    ExecutionStatus::Accepted
                } else {
                    ExecutionStatus::RuntimeError
                },
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                compile_output: String::new(),
                time_secs: Some(started.elapsed().as_secs_f64()),
                memory_kb: None,
            },
            Ok(Err(e)) => ExecutionResult {
                status: ExecutionStatus::InternalError,
                stdout: String::new(),
                stderr: format!("Execution failed: {}", e),
                compile_output: String::new(),
                time_secs: Some(started.elapsed().as_secs_f64()),
                memory_kb: None,
            },
            Err(_) => ExecutionResult {
                status: ExecutionStatus::TimeLimit,
                stdout: String::new(),
                stderr: "[Execution timed out]".to_string(),
                compile_output: String::new(),
                time_secs: Some(limits.cpu_time_secs),
                memory_kb: None,
            },
        };

        let token = Uuid::new_v4().to_string();
        let mut store = self
            .results
            .lock()
            .map_err(|_| AppError::Internal("Local result store poisoned".to_string()))?;
        store.insert(token.clone(), result);
        Ok(token)
    }

    /// Always terminal. The terminal read consumes the stored entry so the
    /// backend retains no state once a result has been delivered.
    async fn poll(&self, token: &str) -> Result<PollOutcome, AppError> {
        let mut store = self
            .results
            .lock()
            .map_err(|_| AppError::Internal("Local result store poisoned".to_string()))?;
        match store.remove(token) {
            Some(result) => Ok(PollOutcome::Finished(result)),
            None => Err(AppError::Internal(format!(
                "Unknown execution token '{}'",
                token
            ))),
        }
    }
}
