//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the conformance runner:
//! the expectation model, the annotation scanner, the validator, the skip
//! rules and the suite that ties them together.
//!
//! 此模块包含一致性测试运行器的核心功能：
//! 期望模型、注释扫描器、验证器、跳过规则以及将它们组合在一起的测试套件。

pub mod annotations;
pub mod config;
pub mod execution;
pub mod models;
pub mod planner;
pub mod rules;
pub mod suite;
pub mod validator;

// Re-exports
pub use config::HarnessConfig;
pub use suite::{Suite, SuiteContext};
pub use validator::Validator;
