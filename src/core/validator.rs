//! # Validator Module / 验证模块
//!
//! Compares one observation of the interpreter against the expectations of a
//! [`TestCase`]. Validation is exhaustive: every check runs and every mismatch
//! is reported, so a single run shows everything that is wrong with a script.
//! The only exceptions are contradictory fixtures and output that is not valid
//! UTF-8, which produce a single failure and stop.
//!
//! 将解释器的一次观测结果与 [`TestCase`] 的期望进行比较。
//! 验证是穷尽式的：每项检查都会运行，每处不匹配都会被报告。
//! 唯一的例外是自相矛盾的测试用例和非 UTF-8 输出，它们只产生一条失败并停止。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::models::{Failure, RunResult, TestCase};

/// Default number of unexpected stderr lines reported before truncating.
pub const DEFAULT_MAX_REPORTED: usize = 10;

static SYNTAX_ERROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*line (\d+)\] (Error.+)").expect("valid syntax error regex"));
static STACK_TRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[line (\d+)\]").expect("valid stack trace regex"));

/// Validates interpreter output against test expectations.
/// 根据测试期望验证解释器输出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_reported: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPORTED)
    }
}

impl Validator {
    pub fn new(max_reported: usize) -> Self {
        Self { max_reported }
    }

    pub fn max_reported(&self) -> usize {
        self.max_reported
    }

    /// Checks `result` against `case` and returns every failure found.
    /// An empty list means the test passed.
    ///
    /// 根据 `case` 检查 `result` 并返回发现的所有失败。空列表表示测试通过。
    pub fn validate(&self, case: &TestCase, result: &RunResult) -> Vec<Failure> {
        if case.is_contradictory() {
            return vec![Failure::new(
                "Test error: Cannot expect both compile and runtime errors.",
            )];
        }

        let (Some(stdout), Some(stderr)) = (decode(&result.stdout), decode(&result.stderr)) else {
            return vec![Failure::new("Error decoding output.")];
        };

        let mut failures = Vec::new();
        let error_lines: Vec<&str> = stderr.split('\n').collect();

        match &case.runtime_error {
            Some(expected) => {
                self.check_runtime_error(&expected.message, expected.line, &error_lines, &mut failures)
            }
            None => self.check_compile_errors(case, &error_lines, &mut failures),
        }

        self.check_exit_code(case, result.exit_code, &error_lines, &mut failures);
        check_output(case, &stdout, &mut failures);

        failures
    }

    fn check_runtime_error(
        &self,
        message: &str,
        expected_line: usize,
        error_lines: &[&str],
        failures: &mut Vec<Failure>,
    ) {
        if error_lines.len() < 2 {
            failures.push(Failure::new(format!(
                "Expected runtime error \"{message}\" and got none."
            )));
            return;
        }

        // Compile errors from modules loaded by the script may come first.
        let start = error_lines
            .iter()
            .position(|line| !SYNTAX_ERROR.is_match(line))
            .unwrap_or(error_lines.len());

        let Some(actual) = error_lines.get(start) else {
            failures.push(Failure::new(format!(
                "Expected runtime error \"{message}\" and got none."
            )));
            return;
        };

        if *actual != message {
            failures.push(Failure::with_details(
                format!("Expected runtime error \"{message}\" and got:"),
                [*actual],
            ));
        }

        // Frames from builtin libraries may precede the script's own frame.
        let stack_lines = &error_lines[start + 1..];
        let trace_line = stack_lines.iter().find_map(|line| {
            STACK_TRACE
                .captures(line)
                .and_then(|caps| caps[1].parse::<usize>().ok())
        });

        match trace_line {
            None => failures.push(Failure::with_details(
                "Expected stack trace and got:",
                stack_lines.iter().copied(),
            )),
            Some(actual_line) if actual_line != expected_line => failures.push(Failure::new(
                format!(
                    "Expected runtime error on line {expected_line} but was on line {actual_line}."
                ),
            )),
            Some(_) => {}
        }
    }

    fn check_compile_errors(
        &self,
        case: &TestCase,
        error_lines: &[&str],
        failures: &mut Vec<Failure>,
    ) {
        let mut found = Vec::new();
        let mut unexpected = 0usize;

        for line in error_lines {
            if let Some(caps) = SYNTAX_ERROR.captures(line) {
                let error = format!("[{}] {}", &caps[1], &caps[2]);
                if case.compile_errors.contains(&error) {
                    found.push(error);
                } else {
                    if unexpected < self.max_reported {
                        failures.push(Failure::with_details("Unexpected error:", [*line]));
                    }
                    unexpected += 1;
                }
            } else if !line.is_empty() {
                if unexpected < self.max_reported {
                    failures.push(Failure::with_details("Unexpected output on stderr:", [*line]));
                }
                unexpected += 1;
            }
        }

        if unexpected > self.max_reported {
            failures.push(Failure::new(format!(
                "(truncated {} more...)",
                unexpected - self.max_reported
            )));
        }

        for error in case.compile_errors.iter().filter(|e| !found.contains(e)) {
            failures.push(Failure::new(format!("Missing expected error: {error}")));
        }
    }

    fn check_exit_code(
        &self,
        case: &TestCase,
        exit_code: Option<i32>,
        error_lines: &[&str],
        failures: &mut Vec<Failure>,
    ) {
        let expected = case.expected_exit_code();
        if exit_code == Some(expected) {
            return;
        }

        let actual = exit_code.map_or_else(|| "no exit code".to_string(), |c| c.to_string());
        let mut details: Vec<String> = error_lines
            .iter()
            .take(self.max_reported)
            .map(|line| line.to_string())
            .collect();
        if error_lines.len() > self.max_reported {
            details.push("(truncated...)".to_string());
        }

        failures.push(Failure::with_details(
            format!("Expected return code {expected} and got {actual}. Stderr:"),
            details,
        ));
    }
}

/// Validates with the default truncation threshold.
pub fn validate(case: &TestCase, result: &RunResult) -> Vec<Failure> {
    Validator::default().validate(case, result)
}

fn check_output(case: &TestCase, stdout: &str, failures: &mut Vec<Failure>) {
    let mut lines: Vec<&str> = stdout.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    for (index, line) in lines.iter().enumerate() {
        match case.output.get(index) {
            None => failures.push(Failure::new(format!(
                "Got output \"{line}\" when none was expected."
            ))),
            Some(expected) if expected.text != *line => failures.push(Failure::new(format!(
                "Expected output \"{}\" on line {} and got \"{line}\".",
                expected.text, expected.line
            ))),
            Some(_) => {}
        }
    }

    for expected in case.output.iter().skip(lines.len()) {
        failures.push(Failure::new(format!(
            "Missing expected output \"{}\" on line {}.",
            expected.text, expected.line
        )));
    }
}

fn decode(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes)
        .ok()
        .map(|text| text.replace("\r\n", "\n"))
}
