//! # Annotation Scanner Module / 注释扫描模块
//!
//! Extracts expectation directives from the line comments of a test script and
//! folds them into a [`TestCase`]. The recognized forms are:
//!
//! 从测试脚本的行注释中提取期望指令，并将它们合并为一个 [`TestCase`]。
//! 识别的形式如下：
//!
//! ```text
//! print 1;  // expect: 1
//! var a = ; // Error at ';': Expect expression.
//! // [line 3] Error at end: Expect '}' after block.
//! // [c line 3] Error at end: Expect '}' after block.
//! a.b;      // expect runtime error: Undefined variable 'a'.
//! // nontest
//! ```

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::core::models::{ExpectedExit, OutputExpectation, RuntimeErrorExpectation, TestCase};

static OUTPUT_EXPECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"// expect: ?(.*)").expect("valid output regex"));
static ERROR_EXPECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"// (Error.*)").expect("valid error regex"));
static ERROR_LINE_EXPECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"// \[(?:(\w+) )?line (\d+)\] (Error.*)").expect("valid line error regex")
});
static RUNTIME_ERROR_EXPECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"// expect runtime error: (.+)").expect("valid runtime error regex")
});
static NONTEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"// nontest").expect("valid nontest regex"));

/// A directive found on a single line of a script.
/// 在脚本的单行中发现的指令。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// `// expect: TEXT`
    Output { text: String, line: usize },
    /// `// Error...` on the line the error is reported for.
    Error { text: String, line: usize },
    /// `// [tag? line N] Error...` for errors reported on another line.
    LineTaggedError {
        tag: Option<String>,
        line: usize,
        text: String,
    },
    /// `// expect runtime error: TEXT`
    RuntimeError { text: String, line: usize },
    /// `// nontest`: the file is not a test at all.
    NonTest,
}

impl Annotation {
    /// Parses the directive on `source_line`, if any. At most one directive is
    /// taken per line; `nontest` takes precedence, then runtime errors, tagged
    /// errors, plain errors and finally output expectations.
    ///
    /// 解析 `source_line` 上的指令（如果有）。每行最多取一个指令。
    pub fn parse(source_line: &str, line: usize) -> Option<Self> {
        if NONTEST.is_match(source_line) {
            return Some(Annotation::NonTest);
        }
        if let Some(caps) = RUNTIME_ERROR_EXPECT.captures(source_line) {
            return Some(Annotation::RuntimeError {
                text: caps[1].to_string(),
                line,
            });
        }
        if let Some(caps) = ERROR_LINE_EXPECT.captures(source_line) {
            match caps[2].parse::<usize>() {
                Ok(target) => {
                    return Some(Annotation::LineTaggedError {
                        tag: caps.get(1).map(|m| m.as_str().to_string()),
                        line: target,
                        text: caps[3].to_string(),
                    });
                }
                Err(e) => log::warn!("line {line}: ignoring error directive for line {}: {e}", &caps[2]),
            }
        }
        if let Some(caps) = ERROR_EXPECT.captures(source_line) {
            return Some(Annotation::Error {
                text: caps[1].to_string(),
                line,
            });
        }
        OUTPUT_EXPECT
            .captures(source_line)
            .map(|caps| Annotation::Output {
                text: caps[1].to_string(),
                line,
            })
    }

    /// Folds this directive into `case`. `NonTest` is handled by the scanner
    /// and leaves the case untouched.
    fn apply(self, case: &mut TestCase, interpreter_tag: Option<&str>) {
        match self {
            Annotation::Output { text, line } => {
                case.output.push(OutputExpectation { text, line });
                case.expectations += 1;
            }
            Annotation::Error { text, line } => {
                case.compile_errors.insert(format!("[{line}] {text}"));
                case.expects_compile_error = true;
                case.expected_exit = ExpectedExit::CompileError;
                case.expectations += 1;
            }
            Annotation::LineTaggedError { tag, line, text } => {
                // Cascaded errors after the first one differ between
                // interpreters, so a tag restricts the line to one of them.
                let applies = match (tag.as_deref(), interpreter_tag) {
                    (None, _) => true,
                    (Some(tag), Some(active)) => tag == active,
                    (Some(_), None) => false,
                };
                if applies {
                    case.compile_errors.insert(format!("[{line}] {text}"));
                    case.expectations += 1;
                }
                case.expects_compile_error = true;
                case.expected_exit = ExpectedExit::CompileError;
            }
            Annotation::RuntimeError { text, line } => {
                case.runtime_error = Some(RuntimeErrorExpectation {
                    message: text,
                    line,
                });
                case.expected_exit = ExpectedExit::RuntimeError;
                case.expectations += 1;
            }
            Annotation::NonTest => {}
        }
    }
}

/// The result of scanning one script.
/// 扫描单个脚本的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Test(TestCase),
    /// The script carries a `// nontest` marker.
    NonTest,
}

/// Scans `source` line by line (1-indexed) and builds the test case for `path`.
/// Scanning stops at the first `nontest` marker.
///
/// 逐行扫描 `source`（行号从 1 开始）并为 `path` 构建测试用例。
/// 遇到第一个 `nontest` 标记时停止扫描。
pub fn scan_source(path: &str, source: &str, interpreter_tag: Option<&str>) -> ScanOutcome {
    let mut case = TestCase::new(path);

    for (index, source_line) in source.lines().enumerate() {
        match Annotation::parse(source_line, index + 1) {
            Some(Annotation::NonTest) => return ScanOutcome::NonTest,
            Some(annotation) => annotation.apply(&mut case, interpreter_tag),
            None => {}
        }
    }

    if case.is_contradictory() {
        log::warn!("{path} expects both compile and runtime errors");
    }

    ScanOutcome::Test(case)
}

/// Reads the script at `file` and scans it. `path` is the display path stored
/// in the resulting test case.
pub fn scan_file(file: &Path, path: &str, interpreter_tag: Option<&str>) -> Result<ScanOutcome> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read test script: {}", file.display()))?;
    Ok(scan_source(path, &source, interpreter_tag))
}
