//! # Console Reporting Module / 控制台报告模块
//!
//! This module renders the suite's progress and results on a terminal: a
//! status line rewritten in place for every script, a block per failing
//! script listing its diagnostics, and the final summary.
//!
//! 此模块在终端上渲染测试套件的进度和结果：每个脚本都会原地重写的状态行、
//! 每个失败脚本列出其诊断信息的区块，以及最终摘要。

use colored::*;
use std::io::{self, Write};

use crate::core::models::{Failure, SuiteStats};
use crate::infra::t;

/// ANSI sequence erasing the current line, followed by a carriage return.
const ERASE_LINE: &str = "\x1b[2K\r";

/// Erases the status line and, if given, writes `line` in its place without
/// a trailing newline.
///
/// 擦除状态行，并在给定 `line` 时将其写在原位置（不带换行符）。
pub fn print_line<W: Write>(out: &mut W, line: Option<&str>) -> io::Result<()> {
    write!(out, "{ERASE_LINE}")?;
    if let Some(line) = line {
        write!(out, "{line}")?;
    }
    out.flush()
}

/// Rewrites the live status line with the current counters and the script
/// about to run.
///
/// # Output Format / 输出格式
/// ```text
/// Passed: 12 Failed: 1 Skipped: 3 (test/closure/nested.xan)
/// ```
pub fn print_progress<W: Write>(out: &mut W, stats: &SuiteStats, path: &str) -> io::Result<()> {
    let passed = stats.passed.to_string().green();
    let failed = stats.failed.to_string().red();
    let skipped = stats.skipped.to_string().yellow();
    let line = format!(
        "{} {}",
        t!("progress.counts", passed = passed, failed = failed, skipped = skipped),
        format!("({path})").bright_black()
    );
    print_line(out, Some(&line))
}

/// Reports a script whose path matched no rule. It still runs.
pub fn print_unknown_state<W: Write>(out: &mut W, path: &str) -> io::Result<()> {
    print_line(out, None)?;
    writeln!(out, "{}", t!("progress.unknown_state", path = path).yellow())
}

/// Prints the failure block for one script: the path, then every failure
/// indented, with detail lines indented further.
///
/// 打印单个脚本的失败区块：先是路径，然后是缩进的每条失败信息，
/// 细节行进一步缩进。
pub fn print_failure<W: Write>(out: &mut W, path: &str, failures: &[Failure]) -> io::Result<()> {
    print_line(out, None)?;
    writeln!(out, "{}: {path}", t!("report.fail").red())?;
    writeln!(out)?;
    for failure in failures {
        writeln!(out, "      {}", failure.message.bright_red())?;
        for detail in &failure.details {
            writeln!(out, "        {}", detail.bright_red())?;
        }
    }
    writeln!(out)
}

/// Clears the status line and prints the final one-line summary.
///
/// # Output Format / 输出格式
/// ```text
/// All 245 tests passed (1032 expectations).
/// 243 tests passed. 2 tests failed.
/// ```
pub fn print_summary<W: Write>(out: &mut W, stats: &SuiteStats) -> io::Result<()> {
    print_line(out, None)?;
    let passed = stats.passed.to_string().green();
    if stats.is_success() {
        let expectations = stats.expectations;
        writeln!(
            out,
            "{}",
            t!("summary.all_passed", passed = passed, expectations = expectations)
        )
    } else {
        let failed = stats.failed.to_string().red();
        writeln!(
            out,
            "{}",
            t!("summary.some_failed", passed = passed, failed = failed)
        )
    }
}

/// Printed when Ctrl-C stops the suite before every script ran.
/// 当 Ctrl-C 在所有脚本运行之前停止测试套件时打印。
pub fn print_interrupted<W: Write>(out: &mut W) -> io::Result<()> {
    print_line(out, None)?;
    writeln!(out, "{}", t!("run.interrupted").yellow().bold())
}
