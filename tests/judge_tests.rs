// tests/judge_tests.rs
//
// Exercises the judge engine and test-suite runner against a scripted
// execution backend, without a live database or execution service.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::types::Json;

use unicampus_backend::error::AppError;
use unicampus_backend::judge::backend::{
    ExecutionBackend, ExecutionResult, ExecutionStatus, PollOutcome, ResourceLimits,
};
use unicampus_backend::judge::engine::{JudgeOptions, judge_test_case};
use unicampus_backend::judge::language::Language;
use unicampus_backend::judge::runner::run_all_tests;
use unicampus_backend::models::coding_question::{CodingQuestion, TestCase};
use unicampus_backend::models::submission::HIDDEN_PLACEHOLDER;

enum Script {
    Finish(ExecutionResult),
    FailSubmit(&'static str),
    NeverFinish,
}

/// Returns one scripted outcome per submit call, in order.
struct MockBackend {
    scripts: Mutex<VecDeque<Script>>,
    submitted: Mutex<HashMap<String, Script>>,
}

impl MockBackend {
    fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            submitted: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ExecutionBackend for MockBackend {
    async fn submit(
        &self,
        _source: &str,
        _language: Language,
        _stdin: &str,
        _limits: &ResourceLimits,
    ) -> Result<String, AppError> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock backend ran out of scripted responses");
        if let Script::FailSubmit(msg) = script {
            return Err(AppError::ServiceUnavailable(msg.to_string()));
        }

        let mut submitted = self.submitted.lock().unwrap();
        let token = format!("t{}", submitted.len());
        submitted.insert(token.clone(), script);
        Ok(token)
    }

    async fn poll(&self, token: &str) -> Result<PollOutcome, AppError> {
        let submitted = self.submitted.lock().unwrap();
        match submitted.get(token) {
            Some(Script::Finish(result)) => Ok(PollOutcome::Finished(result.clone())),
            Some(Script::NeverFinish) => Ok(PollOutcome::InProgress),
            _ => Err(AppError::Internal(format!("unknown token {}", token))),
        }
    }
}

fn accepted(stdout: &str) -> Script {
    Script::Finish(ExecutionResult {
        status: ExecutionStatus::Accepted,
        stdout: stdout.to_string(),
        stderr: String::new(),
        compile_output: String::new(),
        time_secs: Some(0.01),
        memory_kb: Some(4096),
    })
}

fn runtime_error(stderr: &str) -> Script {
    Script::Finish(ExecutionResult {
        status: ExecutionStatus::RuntimeError,
        stdout: String::new(),
        stderr: stderr.to_string(),
        compile_output: String::new(),
        time_secs: Some(0.01),
        memory_kb: Some(4096),
    })
}

fn two_sum_question(cases: Vec<TestCase>) -> CodingQuestion {
    CodingQuestion {
        id: 1,
        title: "Two Sum".to_string(),
        description: "Return indices of the two numbers adding to target".to_string(),
        difficulty: "Easy".to_string(),
        category: "arrays".to_string(),
        language: "javascript".to_string(),
        starter_code: None,
        constraints: None,
        test_cases: Json(cases),
        time_limit_secs: None,
        memory_limit_kb: None,
        tags: Json(vec!["hashmap".to_string()]),
        created_at: None,
    }
}

fn two_sum_case() -> TestCase {
    TestCase {
        input: "[2,7,11,15]\n9".to_string(),
        expected_output: "[0,1]".to_string(),
        is_hidden: false,
    }
}

fn fast_opts() -> JudgeOptions {
    JudgeOptions {
        max_poll_attempts: 3,
        poll_interval: Duration::from_millis(1),
    }
}

const TWO_SUM_JS: &str = "function solution(nums, target) {\n  const seen = new Map();\n  for (let i = 0; i < nums.length; i++) {\n    const need = target - nums[i];\n    if (seen.has(need)) return [seen.get(need), i];\n    seen.set(nums[i], i);\n  }\n  return [];\n}\n";

#[tokio::test]
async fn correct_two_sum_submission_passes() {
    let backend = MockBackend::new(vec![accepted("[0,1]\n")]);
    let question = two_sum_question(vec![two_sum_case()]);

    let verdict = judge_test_case(
        &backend,
        &question,
        Language::Javascript,
        TWO_SUM_JS,
        0,
        None,
        &fast_opts(),
    )
    .await
    .unwrap();

    assert!(verdict.passed);
    assert!(!verdict.error);
    assert_eq!(verdict.output, "[0,1]");
    assert_eq!(verdict.expected, "[0,1]");
}

#[tokio::test]
async fn equivalent_but_reordered_pair_fails() {
    // [1,0] is mathematically equivalent but comparison is order-sensitive.
    let backend = MockBackend::new(vec![accepted("[1,0]\n")]);
    let question = two_sum_question(vec![two_sum_case()]);

    let verdict = judge_test_case(
        &backend,
        &question,
        Language::Javascript,
        TWO_SUM_JS,
        0,
        None,
        &fast_opts(),
    )
    .await
    .unwrap();

    assert!(!verdict.passed);
    assert!(!verdict.error);
}

#[tokio::test]
async fn crlf_output_compares_equal_after_normalization() {
    let backend = MockBackend::new(vec![accepted("[0,1]\r\n")]);
    let question = two_sum_question(vec![two_sum_case()]);

    let verdict = judge_test_case(
        &backend,
        &question,
        Language::Javascript,
        TWO_SUM_JS,
        0,
        None,
        &fast_opts(),
    )
    .await
    .unwrap();

    assert!(verdict.passed);
}

#[tokio::test]
async fn hidden_case_is_redacted_but_still_compared() {
    let backend = MockBackend::new(vec![accepted("[0,1]")]);
    let mut case = two_sum_case();
    case.is_hidden = true;
    let question = two_sum_question(vec![case]);

    let verdict = judge_test_case(
        &backend,
        &question,
        Language::Javascript,
        TWO_SUM_JS,
        0,
        None,
        &fast_opts(),
    )
    .await
    .unwrap();

    // Compared against the real expected output, reported as "Hidden".
    assert!(verdict.passed);
    assert_eq!(verdict.input, HIDDEN_PLACEHOLDER);
    assert_eq!(verdict.expected, HIDDEN_PLACEHOLDER);
}

#[tokio::test]
async fn out_of_range_test_case_is_a_not_found_error() {
    let backend = MockBackend::new(vec![]);
    let question = two_sum_question(vec![two_sum_case()]);

    let err = judge_test_case(
        &backend,
        &question,
        Language::Javascript,
        TWO_SUM_JS,
        5,
        None,
        &fast_opts(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::TestCaseNotFound(_)));
}

#[tokio::test]
async fn polling_ceiling_surfaces_execution_timeout() {
    let backend = MockBackend::new(vec![Script::NeverFinish]);
    let question = two_sum_question(vec![two_sum_case()]);

    let err = judge_test_case(
        &backend,
        &question,
        Language::Javascript,
        TWO_SUM_JS,
        0,
        None,
        &fast_opts(),
    )
    .await
    .unwrap_err();

    match err {
        AppError::ExecutionTimeout(details) => {
            assert!(details.contains("optimize your solution"));
        }
        other => panic!("expected ExecutionTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn run_all_tests_uses_floor_scoring() {
    // 7 test cases, 3 passing: floor(100/7) = 14 per test, score 42.
    let scripts = vec![
        accepted("[0,1]"),
        accepted("[0,1]"),
        accepted("[0,1]"),
        accepted("wrong"),
        accepted("wrong"),
        accepted("wrong"),
        accepted("wrong"),
    ];
    let backend = MockBackend::new(scripts);
    let question = two_sum_question(vec![two_sum_case(); 7]);

    let result = run_all_tests(&backend, &question, TWO_SUM_JS, &fast_opts())
        .await
        .unwrap();

    assert_eq!(result.total_tests, 7);
    assert_eq!(result.passed_tests, 3);
    assert_eq!(result.score, 42.0);
    assert_eq!(result.results.len(), 7);
    // Verdict order matches test-case order.
    for (index, verdict) in result.results.iter().enumerate() {
        assert_eq!(verdict.test_case_index, index);
    }
}

#[tokio::test]
async fn one_erroring_case_does_not_abort_the_run() {
    let scripts = vec![
        accepted("[0,1]"),
        Script::FailSubmit("connection reset"),
        runtime_error("TypeError: boom"),
    ];
    let backend = MockBackend::new(scripts);
    let question = two_sum_question(vec![two_sum_case(); 3]);

    let result = run_all_tests(&backend, &question, TWO_SUM_JS, &fast_opts())
        .await
        .unwrap();

    assert_eq!(result.results.len(), 3);
    assert_eq!(result.passed_tests, 1);
    assert!(result.results[0].passed);
    assert!(result.results[1].error);
    assert!(result.results[1].output.contains("service_unavailable"));
    assert!(result.results[2].error);
    assert_eq!(result.results[2].output, "TypeError: boom");
}

#[tokio::test]
async fn identical_submissions_get_identical_verdicts() {
    let question = two_sum_question(vec![two_sum_case(); 2]);

    let first = run_all_tests(
        &MockBackend::new(vec![accepted("[0,1]"), accepted("wrong")]),
        &question,
        TWO_SUM_JS,
        &fast_opts(),
    )
    .await
    .unwrap();

    let second = run_all_tests(
        &MockBackend::new(vec![accepted("[0,1]"), accepted("wrong")]),
        &question,
        TWO_SUM_JS,
        &fast_opts(),
    )
    .await
    .unwrap();

    assert_eq!(first.score, second.score);
    let first_flags: Vec<bool> = first.results.iter().map(|v| v.passed).collect();
    let second_flags: Vec<bool> = second.results.iter().map(|v| v.passed).collect();
    assert_eq!(first_flags, second_flags);
}

#[tokio::test]
async fn unsupported_question_language_is_rejected_before_execution() {
    let mut question = two_sum_question(vec![two_sum_case()]);
    question.language = "cobol".to_string();
    let backend = MockBackend::new(vec![]);

    let err = run_all_tests(&backend, &question, TWO_SUM_JS, &fast_opts())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnsupportedLanguage(_)));
}
