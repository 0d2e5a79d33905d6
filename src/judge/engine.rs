// src/judge/engine.rs
//
// Produces one TestCaseVerdict per (code, language, question, test case).
// Validation happens before any backend call is made, so malformed requests
// never consume execution quota.

use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::judge::adapter::adapter_for;
use crate::judge::backend::{ExecutionBackend, ExecutionResult, ExecutionStatus};
use crate::judge::language::Language;
use crate::models::coding_question::{CodingQuestion, TestCase};
use crate::models::submission::TestCaseVerdict;

/// Polling parameters for a judge run. The verdict wait is bounded by
/// `max_poll_attempts * poll_interval` of wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct JudgeOptions {
    pub max_poll_attempts: u32,
    pub poll_interval: Duration,
}

impl JudgeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_poll_attempts: config.poll_max_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

impl Default for JudgeOptions {
    fn default() -> Self {
        Self {
            max_poll_attempts: 30,
            poll_interval: Duration::from_millis(1000),
        }
    }
}

/// Trims outer whitespace and collapses all line-ending variants to '\n'.
/// Everything else is significant: no numeric or ordering tolerance.
pub fn normalize_output(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

pub fn outputs_match(actual: &str, expected: &str) -> bool {
    normalize_output(actual) == normalize_output(expected)
}

/// Fail-fast validation for a judge request. Returns the language the
/// submission will be judged in.
///
/// Submissions in a language other than the question's declared one are
/// rejected unless `allow_override` is set, in which case the switch is
/// logged and the submission language wins.
pub fn validate_submission(
    code: &str,
    language: &str,
    question: &CodingQuestion,
    allow_override: bool,
) -> Result<Language, AppError> {
    if code.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing code".to_string()));
    }
    if language.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing language".to_string()));
    }

    let submitted = Language::parse(language).ok_or_else(|| {
        AppError::UnsupportedLanguage(format!("Unsupported language '{}'", language))
    })?;
    let declared = Language::parse(&question.language).ok_or_else(|| {
        AppError::UnsupportedLanguage(format!(
            "Question {} declares unsupported language '{}'",
            question.id, question.language
        ))
    })?;

    if submitted != declared {
        if allow_override {
            tracing::warn!(
                question_id = question.id,
                declared = %declared,
                submitted = %submitted,
                "Judging with overridden language"
            );
        } else {
            return Err(AppError::LanguageMismatch(format!(
                "Question {} expects {}, got {}; set allow_language_override to judge anyway",
                question.id, declared, submitted
            )));
        }
    }

    Ok(submitted)
}

/// Judges a single test case: adapter wrap, submit, bounded poll, compare.
pub async fn judge_test_case(
    backend: &dyn ExecutionBackend,
    question: &CodingQuestion,
    language: Language,
    code: &str,
    index: usize,
    input_override: Option<&str>,
    opts: &JudgeOptions,
) -> Result<TestCaseVerdict, AppError> {
    let cases = &question.test_cases.0;
    let test_case = cases.get(index).ok_or_else(|| {
        AppError::TestCaseNotFound(format!(
            "Test case {} out of range; question {} has {}",
            index,
            question.id,
            cases.len()
        ))
    })?;

    let raw_input = input_override.unwrap_or(&test_case.input);
    let prepared = adapter_for(language).prepare(code, raw_input);
    let limits = question.limits();

    let token = backend
        .submit(&prepared.source, language, &prepared.stdin, &limits)
        .await?;

    let result = backend
        .await_result(&token, opts.max_poll_attempts, opts.poll_interval)
        .await
        .map_err(|e| match e {
            AppError::ExecutionTimeout(_) => AppError::ExecutionTimeout(
                "Execution timed out; optimize your solution".to_string(),
            ),
            other => other,
        })?;

    let verdict = build_verdict(index, test_case, raw_input, &result);
    Ok(if test_case.is_hidden {
        verdict.redacted()
    } else {
        verdict
    })
}

fn build_verdict(
    index: usize,
    test_case: &TestCase,
    raw_input: &str,
    result: &ExecutionResult,
) -> TestCaseVerdict {
    let errored = matches!(
        result.status,
        ExecutionStatus::CompileError
            | ExecutionStatus::RuntimeError
            | ExecutionStatus::InternalError
    );

    let passed = !errored
        && result.status != ExecutionStatus::TimeLimit
        && outputs_match(&result.stdout, &test_case.expected_output);

    let output = match result.status {
        ExecutionStatus::CompileError => normalize_output(&result.compile_output),
        ExecutionStatus::TimeLimit => "[Time limit exceeded]".to_string(),
        _ if errored => normalize_output(&result.stderr),
        _ => normalize_output(&result.stdout),
    };

    TestCaseVerdict {
        test_case_index: index,
        passed,
        output,
        expected: test_case.expected_output.clone(),
        input: raw_input.to_string(),
        error: errored,
    }
}
