//! # Init Command Unit Tests / Init 命令单元测试
//!
//! Tests for the configuration file written by `init`.
//!
//! `init` 写出的配置文件的测试。

use conformance_runner::cli::commands::init::render_config;
use conformance_runner::config::HarnessConfig;
use conformance_runner::rules::{Resolution, RuleState};
use std::path::PathBuf;

#[test]
fn test_example_skips_are_commented_out() {
    let config = HarnessConfig::default();
    let content = render_config(&config).unwrap();

    assert!(content.contains("# \"test/limit/loop_too_large.xan\" = \"skip\""));
    assert!(content.contains("# \"test/function/too_many_arguments.xan\" = \"skip\""));
    assert!(content.contains("# \"test/regression/binary_trees.xan\" = \"skip\""));

    // Commented out, the rules do not change the configuration.
    assert_eq!(HarnessConfig::from_toml(&content).unwrap(), config);
}

#[test]
fn test_uncommented_examples_become_skip_rules() {
    let content = render_config(&HarnessConfig::default()).unwrap();
    let enabled: String = content
        .lines()
        .map(|line| line.strip_prefix("# \"").map_or(line.to_string(), |rest| format!("\"{rest}")))
        .collect::<Vec<_>>()
        .join("\n");

    let config = HarnessConfig::from_toml(&enabled).unwrap();
    assert_eq!(config.rules.get("test/limit/too_many_constants.xan"), Some(RuleState::Skip));
    assert_eq!(config.rules.resolve("test/limit/loop_too_large.xan"), Resolution::Skip);
    assert_eq!(config.rules.resolve("test/limit/stack_overflow.xan"), Resolution::Run);
}

#[test]
fn test_examples_follow_corpus_and_extension() {
    let mut config = HarnessConfig::default();
    config.set_corpus(PathBuf::from("suite"));
    config.extension = "lox".to_string();

    let content = render_config(&config).unwrap();
    assert!(content.contains("# \"suite/method/too_many_parameters.lox\" = \"skip\""));
}
