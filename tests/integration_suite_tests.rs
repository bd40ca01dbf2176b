//! # Suite Integration Tests / 测试套件集成测试
//!
//! Drives `Suite` over real corpora on disk with a stub runner standing in for
//! the interpreter, and checks the counters, the recorded outcomes and the
//! console output.
//!
//! 使用替代解释器的桩运行器，在磁盘上的真实语料库上驱动 `Suite`，
//! 并检查计数、记录的结果以及控制台输出。

mod common;

use common::{StubRunner, setup_corpus, strip_ansi, write_script};
use conformance_runner::core::planner::DiscoveryOptions;
use conformance_runner::core::suite::{Suite, SuiteContext};
use conformance_runner::models::{RunOutcome, RunResult, SuiteStats, TestOutcome};
use conformance_runner::rules::{RuleState, RuleTable};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn setup() {
    conformance_runner::init(Some("en"));
    colored::control::set_override(false);
}

fn default_rules() -> RuleTable {
    [("test", RuleState::Run)].into_iter().collect()
}

static EXCLUDE: Vec<String> = Vec::new();

fn options() -> DiscoveryOptions<'static> {
    DiscoveryOptions {
        extension: "xan",
        exclude: &EXCLUDE,
    }
}

#[tokio::test]
async fn test_mixed_corpus_counts_and_output() {
    setup();
    let root = setup_corpus();
    write_script(root.path(), "test/pass.xan", "print 1; // expect: 1\n");
    write_script(root.path(), "test/fail.xan", "print 2; // expect: 2\n");
    write_script(root.path(), "test/helper.xan", "// nontest\n");
    write_script(root.path(), "test/slow/ignored.xan", "print 3; // expect: 3\n");

    let mut rules = default_rules();
    rules.insert("test/slow", RuleState::Skip);

    let runner = StubRunner::new()
        .with_result("test/pass.xan", RunResult::new(0, "1\n", ""))
        .with_result("test/fail.xan", RunResult::new(0, "3\n", ""));
    let calls = runner.calls();

    let context = SuiteContext::new(root.path(), rules);
    let mut suite = Suite::new(context, runner, Vec::new());

    let success = suite.run_all(Path::new("test"), &options()).await.unwrap();

    assert!(!success);
    assert_eq!(
        *suite.stats(),
        SuiteStats {
            passed: 1,
            failed: 1,
            skipped: 1,
            expectations: 2,
        }
    );
    assert_eq!(*calls.borrow(), vec!["test/fail.xan", "test/pass.xan"]);

    let results = suite.results();
    assert_eq!(results.len(), 4);
    assert!(results[0].is_failure());
    assert_eq!(
        results[1],
        TestOutcome::NonTest {
            path: "test/helper.xan".to_string()
        }
    );
    assert!(matches!(results[2], TestOutcome::Passed { .. }));
    assert!(matches!(results[3], TestOutcome::Skipped { .. }));

    let output = strip_ansi(&String::from_utf8(suite.into_output()).unwrap());
    assert!(output.contains("FAIL: test/fail.xan"));
    assert!(output.contains("      Expected output \"2\" on line 1 and got \"3\"."));
    assert!(output.contains("Passed: 1 Failed: 1 Skipped: 0 (test/slow/ignored.xan)"));
    assert!(output.ends_with("1 tests passed. 1 tests failed.\n"));
}

#[tokio::test]
async fn test_all_passed_summary_counts_expectations() {
    setup();
    let root = setup_corpus();
    write_script(
        root.path(),
        "test/a.xan",
        "print 1; // expect: 1\nprint 2; // expect: 2\n",
    );
    write_script(
        root.path(),
        "test/b.xan",
        "\nx; // expect runtime error: Undefined variable 'x'.\n",
    );

    let runner = StubRunner::new()
        .with_result("test/a.xan", RunResult::new(0, "1\n2\n", ""))
        .with_result(
            "test/b.xan",
            RunResult::new(70, "", "Undefined variable 'x'.\n[line 2] in script\n"),
        );

    let context = SuiteContext::new(root.path(), default_rules());
    let mut suite = Suite::new(context, runner, Vec::new());

    assert!(suite.run_all(Path::new("test"), &options()).await.unwrap());
    assert!(suite.stats().is_success());
    assert_eq!(suite.stats().total_run(), 2);

    let output = strip_ansi(&String::from_utf8(suite.into_output()).unwrap());
    assert!(output.ends_with("All 2 tests passed (3 expectations).\n"));
    assert!(!output.contains("FAIL"));
}

#[tokio::test]
async fn test_unknown_path_is_reported_and_still_runs() {
    setup();
    let root = setup_corpus();
    write_script(root.path(), "test/a.xan", "print 1; // expect: 1\n");

    let runner = StubRunner::new().with_result("test/a.xan", RunResult::new(0, "1\n", ""));
    let calls = runner.calls();

    let context = SuiteContext::new(root.path(), RuleTable::new());
    let mut suite = Suite::new(context, runner, Vec::new());

    assert!(suite.run_all(Path::new("test"), &options()).await.unwrap());
    assert_eq!(calls.borrow().len(), 1);

    let output = strip_ansi(&String::from_utf8(suite.into_output()).unwrap());
    assert!(output.contains("Unknown test state for \"test/a.xan\"."));
}

#[tokio::test]
async fn test_timeout_and_runner_errors_are_failures() {
    setup();
    let root = setup_corpus();
    write_script(root.path(), "test/slow.xan", "while (true) {}\n");
    write_script(root.path(), "test/broken.xan", "print 1; // expect: 1\n");

    // No canned result for broken.xan: the stub returns an error.
    let runner = StubRunner::new()
        .with_outcome("test/slow.xan", RunOutcome::TimedOut(Duration::from_secs(5)));

    let context = SuiteContext::new(root.path(), default_rules());
    let mut suite = Suite::new(context, runner, Vec::new());

    assert!(!suite.run_all(Path::new("test"), &options()).await.unwrap());
    assert_eq!(suite.stats().failed, 2);

    let broken = &suite.results()[0];
    assert_eq!(broken.path(), "test/broken.xan");
    assert!(broken.failures()[0].message.contains("no canned result"));

    let slow = &suite.results()[1];
    assert_eq!(slow.failures()[0].message, "Timed out after 5 seconds.");
}

#[tokio::test]
async fn test_interpreter_tag_selects_tagged_errors() {
    setup();
    let root = setup_corpus();
    write_script(
        root.path(),
        "test/tagged.xan",
        "var = 1;\n// [c line 1] Error at '=': Expect variable name.\n// [java line 1] Error at '=': Expected variable name.\n",
    );

    let runner = StubRunner::new().with_result(
        "test/tagged.xan",
        RunResult::new(65, "", "[line 1] Error at '=': Expect variable name.\n"),
    );

    let mut context = SuiteContext::new(root.path(), default_rules());
    context.interpreter_tag = Some("c".to_string());
    let mut suite = Suite::new(context, runner, Vec::new());

    assert!(suite.run_all(Path::new("test"), &options()).await.unwrap());
    assert_eq!(suite.stats().expectations, 1);
}

#[tokio::test]
async fn test_cancelled_suite_stops_before_running() {
    setup();
    let root = setup_corpus();
    write_script(root.path(), "test/a.xan", "print 1; // expect: 1\n");

    let runner = StubRunner::new().with_result("test/a.xan", RunResult::new(0, "1\n", ""));
    let calls = runner.calls();

    let token = CancellationToken::new();
    token.cancel();

    let context = SuiteContext::new(root.path(), default_rules());
    let mut suite = Suite::new(context, runner, Vec::new()).with_cancellation(token);

    let success = suite
        .run_scripts(&["test/a.xan".to_string()])
        .await
        .unwrap();

    assert!(!success);
    assert!(suite.was_interrupted());
    assert!(calls.borrow().is_empty());
    assert!(suite.results().is_empty());

    let output = strip_ansi(&String::from_utf8(suite.into_output()).unwrap());
    assert!(output.contains("Interrupted before every script ran."));
}

#[tokio::test]
async fn test_missing_script_file_is_a_failure() {
    setup();
    let root = setup_corpus();

    let context = SuiteContext::new(root.path(), default_rules());
    let mut suite = Suite::new(context, StubRunner::new(), Vec::new());

    let outcome = suite.run_script("test/gone.xan").await.unwrap().unwrap();

    assert!(outcome.is_failure());
    assert!(outcome.failures()[0].message.contains("Failed to read test script"));
    assert_eq!(suite.stats().failed, 1);
}
