//! # Planner Module Unit Tests / Planner 模块单元测试
//!
//! Tests for corpus discovery and for splitting the corpus across runners.
//!
//! 语料库发现以及在多个运行器之间拆分语料库的测试。

mod common;

use common::{setup_corpus, write_script};
use conformance_runner::core::planner::{DiscoveryOptions, discover_scripts, plan_execution};
use std::path::Path;

fn default_options(exclude: &[String]) -> DiscoveryOptions<'_> {
    DiscoveryOptions {
        extension: "xan",
        exclude,
    }
}

#[cfg(test)]
mod discovery_tests {
    use super::*;

    #[test]
    fn test_discovers_sorted_scripts_recursively() {
        let root = setup_corpus();
        write_script(root.path(), "test/while/syntax.xan", "");
        write_script(root.path(), "test/assignment/local.xan", "");
        write_script(root.path(), "test/empty_file.xan", "");
        write_script(root.path(), "test/README.md", "");

        let (scripts, excluded) =
            discover_scripts(root.path(), Path::new("test"), &default_options(&[])).unwrap();

        assert_eq!(
            scripts,
            vec![
                "test/assignment/local.xan",
                "test/empty_file.xan",
                "test/while/syntax.xan",
            ]
        );
        assert_eq!(excluded, 0);
    }

    #[test]
    fn test_exclusion_markers_drop_paths() {
        let root = setup_corpus();
        write_script(root.path(), "test/benchmark/fib.xan", "");
        write_script(root.path(), "test/scanning/nano_identifiers.xan", "");
        write_script(root.path(), "test/scanning/numbers.xan", "");

        let exclude = vec!["benchmark".to_string(), "nano".to_string()];
        let (scripts, excluded) =
            discover_scripts(root.path(), Path::new("test"), &default_options(&exclude)).unwrap();

        assert_eq!(scripts, vec!["test/scanning/numbers.xan"]);
        assert_eq!(excluded, 2);
    }

    #[test]
    fn test_corpus_outside_root_is_error() {
        let root = setup_corpus();
        let elsewhere = setup_corpus();
        write_script(elsewhere.path(), "test/a.xan", "");

        let err = discover_scripts(
            root.path(),
            &elsewhere.path().join("test"),
            &default_options(&[]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside the harness root"));
    }

    #[test]
    fn test_missing_corpus_is_error() {
        let root = setup_corpus();
        let result = discover_scripts(root.path(), Path::new("nowhere"), &default_options(&[]));
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod plan_tests {
    use super::*;

    fn scripts(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("test/{i:02}.xan")).collect()
    }

    #[test]
    fn test_single_runner_keeps_everything() {
        let plan = plan_execution(scripts(5), 2, None, None).unwrap();
        assert_eq!(plan.scripts.len(), 5);
        assert_eq!(plan.excluded_count, 2);
        assert!(!plan.is_distributed);
    }

    #[test]
    fn test_runners_take_interleaved_shares() {
        let first = plan_execution(scripts(5), 0, Some(2), Some(0)).unwrap();
        let second = plan_execution(scripts(5), 0, Some(2), Some(1)).unwrap();

        assert!(first.is_distributed);
        assert_eq!(first.scripts, vec!["test/00.xan", "test/02.xan", "test/04.xan"]);
        assert_eq!(second.scripts, vec!["test/01.xan", "test/03.xan"]);
    }

    #[test]
    fn test_invalid_runner_configuration() {
        assert!(plan_execution(scripts(3), 0, Some(0), Some(0)).is_err());
        assert!(plan_execution(scripts(3), 0, Some(2), Some(2)).is_err());
        assert!(plan_execution(scripts(3), 0, Some(2), None).is_err());
        assert!(plan_execution(scripts(3), 0, None, Some(1)).is_err());
    }
}
