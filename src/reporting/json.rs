//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes a machine-readable summary of a run: the aggregate counters and the
//! verdict of every script, with the failures of the scripts that failed.
//!
//! 写出一次运行的机器可读摘要：汇总计数以及每个脚本的判定结果，
//! 失败的脚本附带其失败信息。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{SuiteStats, TestOutcome};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    interpreter: &'a str,
    success: bool,
    stats: &'a SuiteStats,
    results: &'a [TestOutcome],
}

/// Renders the report as pretty-printed JSON.
pub fn render_json_report(
    interpreter: &str,
    stats: &SuiteStats,
    results: &[TestOutcome],
) -> Result<String> {
    let report = JsonReport {
        interpreter,
        success: stats.is_success(),
        stats,
        results,
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
}

/// Writes the report to `output_path`, replacing any existing file.
/// 将报告写入 `output_path`，替换任何已存在的文件。
pub fn generate_json_report(
    interpreter: &str,
    stats: &SuiteStats,
    results: &[TestOutcome],
    output_path: &Path,
) -> Result<()> {
    let json = render_json_report(interpreter, stats, results)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
