//! # Conformance Runner Library / Conformance Runner 库
//!
//! This library provides the core functionality for the conformance runner,
//! a harness that runs an interpreter against a corpus of annotated scripts
//! and checks its stdout, stderr and exit code against the expectations
//! written in each script's comments.
//!
//! 此库为一致性测试运行器提供核心功能，
//! 它针对带注释的脚本语料库运行解释器，并根据每个脚本注释中写明的期望
//! 检查其 stdout、stderr 和退出码。
//!
//! ## Modules / 模块
//!
//! - `core` - Expectation model, annotation scanner, validator, skip rules and suite
//! - `infra` - Infrastructure services like subprocess capture and path helpers
//! - `reporting` - Console progress and summary, JSON report
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 期望模型、注释扫描器、验证器、跳过规则和测试套件
//! - `infra` - 基础设施服务，如子进程输出捕获和路径工具
//! - `reporting` - 控制台进度和摘要、JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::annotations;
pub use crate::core::config;
pub use crate::core::models;
pub use crate::core::rules;
pub use crate::core::validator;

/// Initializes the application's internationalization (i18n).
///
/// An explicit `language` wins; otherwise the system locale is detected. The
/// full locale (e.g., "zh-CN") is tried first, then just the language code
/// (e.g., "en"), and finally the default language ("en").
pub fn init(language: Option<&str>) {
    let locale = language
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
