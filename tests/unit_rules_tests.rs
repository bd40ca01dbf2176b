//! # Rules Module Unit Tests / Rules 模块单元测试
//!
//! Tests for the path-prefix rule table: longest-prefix resolution,
//! normalization of prefixes and loading from TOML.
//!
//! 路径前缀规则表的测试：最长前缀解析、前缀规范化以及从 TOML 加载。

use conformance_runner::rules::{Resolution, RuleState, RuleTable};

fn sample_table() -> RuleTable {
    [
        ("test", RuleState::Run),
        ("test/a", RuleState::Skip),
        ("test/a/b.xan", RuleState::Run),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[test]
    fn test_deepest_prefix_wins() {
        let table = sample_table();

        assert_eq!(table.resolve("test/x.xan"), Resolution::Run);
        assert_eq!(table.resolve("test/a/c.xan"), Resolution::Skip);
        assert_eq!(table.resolve("test/a/b.xan"), Resolution::Run);
    }

    #[test]
    fn test_resolution_is_independent_of_insertion_order() {
        let mut reversed = RuleTable::new();
        reversed.insert("test/a/b.xan", RuleState::Run);
        reversed.insert("test/a", RuleState::Skip);
        reversed.insert("test", RuleState::Run);

        for path in ["test/x.xan", "test/a/c.xan", "test/a/b.xan"] {
            assert_eq!(reversed.resolve(path), sample_table().resolve(path), "{path}");
        }
    }

    #[test]
    fn test_unmatched_path_is_unknown() {
        let table = sample_table();
        assert_eq!(table.resolve("other/x.xan"), Resolution::Unknown);
        assert!(table.resolve("other/x.xan").should_run());
        assert!(!table.resolve("test/a/c.xan").should_run());
    }

    #[test]
    fn test_prefix_matches_whole_components_only() {
        // "test/a" must not match "test/ab/..."
        let table = sample_table();
        assert_eq!(table.resolve("test/ab/c.xan"), Resolution::Run);
    }

    #[test]
    fn test_empty_table_resolves_unknown() {
        assert_eq!(RuleTable::new().resolve("test/x.xan"), Resolution::Unknown);
    }

    #[test]
    fn test_windows_separators_are_normalized() {
        let table = sample_table();
        assert_eq!(table.resolve("test\\a\\c.xan"), Resolution::Skip);
        assert_eq!(table.resolve("./test/a/b.xan"), Resolution::Run);
    }
}

#[cfg(test)]
mod table_tests {
    use super::*;

    #[test]
    fn test_insert_normalizes_prefix() {
        let mut table = RuleTable::new();
        table.insert("./test/limit/", RuleState::Skip);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("test/limit"), Some(RuleState::Skip));
        assert_eq!(table.resolve("test/limit/loop_too_large.xan"), Resolution::Skip);
    }

    #[test]
    fn test_insert_replaces_existing_rule() {
        let mut table = sample_table();
        table.insert("test/a", RuleState::Run);

        assert_eq!(table.len(), 3);
        assert_eq!(table.resolve("test/a/c.xan"), Resolution::Run);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Run.to_string(), "run");
        assert_eq!(Resolution::Skip.to_string(), "skip");
        assert_eq!(Resolution::Unknown.to_string(), "unknown");
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, serde::Deserialize)]
    struct Wrapper {
        rules: RuleTable,
    }

    #[test]
    fn test_deserialize_from_toml_with_pass_alias() {
        let content = r#"
[rules]
"test" = "pass"
"test/limit/" = "skip"
"test/limit/stack_overflow.xan" = "run"
"#;
        let wrapper: Wrapper = toml::from_str(content).unwrap();

        assert_eq!(wrapper.rules.get("test"), Some(RuleState::Run));
        assert_eq!(wrapper.rules.get("test/limit"), Some(RuleState::Skip));
        assert_eq!(
            wrapper.rules.resolve("test/limit/stack_overflow.xan"),
            Resolution::Run
        );
        assert_eq!(
            wrapper.rules.resolve("test/limit/loop_too_large.xan"),
            Resolution::Skip
        );
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let content = "[rules]\n\"test\" = \"maybe\"\n";
        assert!(toml::from_str::<Wrapper>(content).is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let map: BTreeMap<String, RuleState> = sample_table().into();
        assert_eq!(map.len(), 3);
        assert_eq!(map["test/a"], RuleState::Skip);

        let json = serde_json::to_string(&sample_table()).unwrap();
        assert!(json.contains("\"test/a\":\"skip\""));
        assert!(json.contains("\"test\":\"run\""));
    }
}
