//! # Suite Module / 测试套件模块
//!
//! Drives the whole pipeline over a corpus: for every script it resolves the
//! skip rules, scans the annotations, runs the interpreter, validates what it
//! observed and keeps the counters. Scripts run strictly one after another.
//!
//! 在整个语料库上驱动完整流程：对每个脚本解析跳过规则、扫描注释、
//! 运行解释器、验证观测结果并维护计数。脚本严格按顺序逐个运行。

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::core::annotations::{self, ScanOutcome};
use crate::core::config::HarnessConfig;
use crate::core::execution::ScriptRunner;
use crate::core::models::{Failure, RunOutcome, SuiteStats, TestCase, TestOutcome};
use crate::core::planner::{self, DiscoveryOptions};
use crate::core::rules::{Resolution, RuleTable};
use crate::core::validator::{DEFAULT_MAX_REPORTED, Validator};
use crate::reporting::console;

/// Everything the suite needs to know about its environment, passed in at
/// construction instead of being read from globals.
///
/// 测试套件需要了解的所有环境信息，在构造时传入，而不是从全局状态读取。
#[derive(Debug, Clone)]
pub struct SuiteContext {
    /// Directory that script paths and rules are relative to.
    pub root: PathBuf,
    pub rules: RuleTable,
    pub interpreter_tag: Option<String>,
    pub max_reported: usize,
}

impl SuiteContext {
    pub fn new(root: impl Into<PathBuf>, rules: RuleTable) -> Self {
        Self {
            root: root.into(),
            rules,
            interpreter_tag: None,
            max_reported: DEFAULT_MAX_REPORTED,
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &HarnessConfig) -> Self {
        Self {
            root: root.into(),
            rules: config.rules.clone(),
            interpreter_tag: config.interpreter_tag.clone(),
            max_reported: config.max_reported,
        }
    }
}

/// Runs scripts through a [`ScriptRunner`] and reports to `out`.
pub struct Suite<R, W> {
    context: SuiteContext,
    validator: Validator,
    runner: R,
    out: W,
    cancel: CancellationToken,
    stats: SuiteStats,
    results: Vec<TestOutcome>,
    interrupted: bool,
}

impl<R: ScriptRunner, W: Write> Suite<R, W> {
    pub fn new(context: SuiteContext, runner: R, out: W) -> Self {
        let validator = Validator::new(context.max_reported);
        Self {
            context,
            validator,
            runner,
            out,
            cancel: CancellationToken::new(),
            stats: SuiteStats::default(),
            results: Vec::new(),
            interrupted: false,
        }
    }

    /// Stops the suite between scripts once `token` is cancelled.
    /// 一旦 `token` 被取消，就在脚本之间停止测试套件。
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn stats(&self) -> &SuiteStats {
        &self.stats
    }

    pub fn results(&self) -> &[TestOutcome] {
        &self.results
    }

    pub fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Discovers every script under `corpus` and runs them all.
    /// Returns `true` when no test failed.
    ///
    /// 发现 `corpus` 下的所有脚本并全部运行。没有测试失败时返回 `true`。
    pub async fn run_all(&mut self, corpus: &Path, options: &DiscoveryOptions<'_>) -> Result<bool> {
        let (scripts, _) = planner::discover_scripts(&self.context.root, corpus, options)?;
        self.run_scripts(&scripts).await
    }

    /// Runs `scripts` in order, then prints the summary.
    /// Returns `true` when no test failed and the run was not interrupted.
    pub async fn run_scripts(&mut self, scripts: &[String]) -> Result<bool> {
        for path in scripts {
            if self.cancel.is_cancelled() {
                self.interrupted = true;
                break;
            }
            match self.run_script(path).await? {
                Some(outcome) => self.results.push(outcome),
                None => {
                    self.interrupted = true;
                    break;
                }
            }
        }

        if self.interrupted {
            console::print_interrupted(&mut self.out)?;
        }
        console::print_summary(&mut self.out, &self.stats)?;

        Ok(self.stats.is_success() && !self.interrupted)
    }

    /// Runs a single script and updates the counters. Returns `None` if the
    /// suite was cancelled while the interpreter was running.
    ///
    /// 运行单个脚本并更新计数。如果在解释器运行期间测试套件被取消，则返回 `None`。
    pub async fn run_script(&mut self, path: &str) -> Result<Option<TestOutcome>> {
        console::print_progress(&mut self.out, &self.stats, path)?;

        let resolution = self.context.rules.resolve(path);
        match resolution {
            Resolution::Skip => {
                self.stats.skipped += 1;
                return Ok(Some(TestOutcome::Skipped {
                    path: path.to_string(),
                }));
            }
            Resolution::Unknown => console::print_unknown_state(&mut self.out, path)?,
            Resolution::Run => {}
        }

        let file = self.context.root.join(path);
        let case = match annotations::scan_file(&file, path, self.context.interpreter_tag.as_deref()) {
            Ok(ScanOutcome::Test(case)) => case,
            Ok(ScanOutcome::NonTest) => {
                return Ok(Some(TestOutcome::NonTest {
                    path: path.to_string(),
                }));
            }
            Err(e) => return self.record(path, vec![Failure::new(format!("{e:#}"))]).map(Some),
        };

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Ok(None),
            outcome = self.runner.run(path) => outcome,
        };

        self.stats.expectations += case.expectations;
        let failures = self.check(&case, outcome);
        self.record(path, failures).map(Some)
    }

    fn check(&self, case: &TestCase, outcome: Result<RunOutcome>) -> Vec<Failure> {
        match outcome {
            Ok(RunOutcome::Completed(result)) => self.validator.validate(case, &result),
            Ok(RunOutcome::TimedOut(duration)) => vec![Failure::new(format!(
                "Timed out after {} seconds.",
                duration.as_secs()
            ))],
            Err(e) => vec![Failure::new(format!("{e:#}"))],
        }
    }

    fn record(&mut self, path: &str, failures: Vec<Failure>) -> Result<TestOutcome> {
        if failures.is_empty() {
            self.stats.passed += 1;
            return Ok(TestOutcome::Passed {
                path: path.to_string(),
            });
        }

        self.stats.failed += 1;
        console::print_failure(&mut self.out, path, &failures)?;
        Ok(TestOutcome::Failed {
            path: path.to_string(),
            failures,
        })
    }
}
