//! # Reporting Module / 报告模块
//!
//! This module handles the display of suite progress and results on the
//! console, and the optional machine-readable JSON report.
//!
//! 此模块处理测试套件进度和结果在控制台上的显示，
//! 以及可选的机器可读 JSON 报告。

pub mod console;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failure, print_progress, print_summary};
pub use json::generate_json_report;
