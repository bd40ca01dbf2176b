//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the conformance
//! runner: the expectations scanned from a script (`TestCase`), one observation of
//! the interpreter (`RunResult`), the diagnostics produced by validation
//! (`Failure`) and the aggregate counters of a run (`SuiteStats`).
//!
//! 此模块定义了整个一致性测试运行器中使用的核心数据结构：
//! 从脚本中扫描出的期望（`TestCase`）、解释器的一次观测结果（`RunResult`）、
//! 验证产生的诊断信息（`Failure`）以及一次运行的汇总计数（`SuiteStats`）。

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// The exit status the interpreter is expected to report for a script.
/// 解释器对某个脚本预期返回的退出状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ExpectedExit {
    /// No error, exit code 0.
    #[default]
    Success,
    /// A compile error was reported, exit code 65 (`EX_DATAERR`).
    CompileError,
    /// A runtime error was raised, exit code 70 (`EX_SOFTWARE`).
    RuntimeError,
}

impl ExpectedExit {
    pub fn code(self) -> i32 {
        match self {
            ExpectedExit::Success => 0,
            ExpectedExit::CompileError => 65,
            ExpectedExit::RuntimeError => 70,
        }
    }
}

/// One `// expect:` line: the text stdout must contain at this position and the
/// source line the directive was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputExpectation {
    pub text: String,
    pub line: usize,
}

/// The runtime error a script is expected to raise.
/// 脚本预期引发的运行时错误。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeErrorExpectation {
    /// The exact message expected on stderr.
    pub message: String,
    /// The line the stack trace must point at.
    pub line: usize,
}

/// Everything a single script requires the interpreter to do, as described by
/// the directives in its comments. Built once by the annotation scanner.
///
/// 单个脚本通过其注释中的指令所要求解释器完成的全部行为。
/// 由注释扫描器一次性构建。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TestCase {
    /// Forward-slash path of the script relative to the harness root.
    /// 脚本相对于测试根目录的正斜杠路径。
    pub path: String,
    /// Expected stdout lines, in source order.
    /// 按源码顺序排列的预期 stdout 行。
    pub output: Vec<OutputExpectation>,
    /// Expected compile errors, formatted as `[N] Error...`.
    /// 预期的编译错误，格式为 `[N] Error...`。
    pub compile_errors: BTreeSet<String>,
    /// The expected runtime error, if any.
    pub runtime_error: Option<RuntimeErrorExpectation>,
    /// Exit status the interpreter must return.
    pub expected_exit: ExpectedExit,
    /// Set once any compile-error directive is seen, including tagged ones
    /// meant for another interpreter.
    pub expects_compile_error: bool,
    /// Number of directives registered for this script.
    pub expectations: usize,
}

impl TestCase {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// A script cannot expect a compile error and a runtime error at once.
    /// 脚本不能同时期望编译错误和运行时错误。
    pub fn is_contradictory(&self) -> bool {
        self.expects_compile_error && self.runtime_error.is_some()
    }

    pub fn expected_exit_code(&self) -> i32 {
        self.expected_exit.code()
    }
}

/// One observation of an interpreter invocation: raw bytes as captured.
/// 解释器一次调用的观测结果：捕获到的原始字节。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunResult {
    /// `None` when the process was terminated by a signal.
    /// 当进程被信号终止时为 `None`。
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunResult {
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// How an invocation of the interpreter ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited (or was killed by a signal) on its own.
    Completed(RunResult),
    /// The configured timeout elapsed and the process was killed.
    TimedOut(Duration),
}

/// A single diagnostic produced while validating a test.
/// The `message` is the headline; `details` carry the offending lines quoted
/// from the interpreter's output, if any.
///
/// 验证测试时产生的单条诊断信息。
/// `message` 是标题；`details` 携带从解释器输出中引用的相关行（如果有）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details<I, S>(message: impl Into<String>, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            details: details.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for detail in &self.details {
            write!(f, "\n  {detail}")?;
        }
        Ok(())
    }
}

/// The verdict for one file of the corpus.
/// 语料库中单个文件的判定结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    /// Every expectation was met.
    /// 所有期望均已满足。
    Passed { path: String },
    /// At least one failure was recorded.
    /// 至少记录了一次失败。
    Failed { path: String, failures: Vec<Failure> },
    /// A skip rule suppressed the file.
    /// 跳过规则抑制了该文件。
    Skipped { path: String },
    /// The file carries a `nontest` marker and is not counted.
    /// 该文件带有 `nontest` 标记，不计入统计。
    NonTest { path: String },
}

impl TestOutcome {
    pub fn path(&self) -> &str {
        match self {
            TestOutcome::Passed { path }
            | TestOutcome::Failed { path, .. }
            | TestOutcome::Skipped { path }
            | TestOutcome::NonTest { path } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestOutcome::Failed { .. })
    }

    pub fn failures(&self) -> &[Failure] {
        match self {
            TestOutcome::Failed { failures, .. } => failures,
            _ => &[],
        }
    }
}

/// Aggregate counters for a whole run.
/// 整个运行的汇总计数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SuiteStats {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub expectations: usize,
}

impl SuiteStats {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Number of tests that actually ran.
    pub fn total_run(&self) -> usize {
        self.passed + self.failed
    }
}
