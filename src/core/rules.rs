//! # Path Rules Module / 路径规则模块
//!
//! Decides whether a script runs or is skipped from a table of path prefixes.
//! Broad rules (`"test" = "run"`) can be overridden by narrower ones
//! (`"test/limit/loop_too_large.xan" = "skip"`): the deepest matching prefix
//! always wins, regardless of the order the table was written in.
//!
//! 根据路径前缀表决定脚本是运行还是跳过。
//! 宽泛的规则（`"test" = "run"`）可以被更具体的规则覆盖
//! （`"test/limit/loop_too_large.xan" = "skip"`）：无论表的书写顺序如何，
//! 最深的匹配前缀总是胜出。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The state a rule assigns to a path prefix.
/// 规则分配给路径前缀的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleState {
    #[serde(alias = "pass")]
    Run,
    Skip,
}

/// The decision for one concrete path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Run,
    Skip,
    /// No prefix of the path is in the table. Reported, then treated as `Run`.
    /// 表中没有该路径的任何前缀。会被报告，然后按 `Run` 处理。
    Unknown,
}

impl Resolution {
    pub fn should_run(self) -> bool {
        !matches!(self, Resolution::Skip)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resolution::Run => "run",
            Resolution::Skip => "skip",
            Resolution::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A table of `path-prefix -> state` rules.
/// `path-prefix -> state` 规则表。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, RuleState>",
    into = "BTreeMap<String, RuleState>"
)]
pub struct RuleTable {
    rules: BTreeMap<String, RuleState>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rule. The prefix is normalized to forward slashes
    /// without a trailing separator.
    pub fn insert(&mut self, prefix: impl AsRef<str>, state: RuleState) {
        self.rules.insert(normalize(prefix.as_ref()), state);
    }

    pub fn get(&self, prefix: &str) -> Option<RuleState> {
        self.rules.get(&normalize(prefix)).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RuleState)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Resolves `path` by rebuilding it one component at a time and letting
    /// every matching prefix overwrite the previous decision.
    ///
    /// 通过逐个组件重建 `path` 来解析它，每个匹配的前缀都会覆盖之前的决定。
    pub fn resolve(&self, path: &str) -> Resolution {
        let path = normalize(path);
        let mut prefix = String::with_capacity(path.len());
        let mut resolution = Resolution::Unknown;

        for part in path.split('/').filter(|p| !p.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);

            if let Some(state) = self.rules.get(&prefix) {
                resolution = match state {
                    RuleState::Run => Resolution::Run,
                    RuleState::Skip => Resolution::Skip,
                };
            }
        }

        log::trace!("rule resolution for {path}: {resolution}");
        resolution
    }
}

impl<S: AsRef<str>> FromIterator<(S, RuleState)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (S, RuleState)>>(iter: T) -> Self {
        let mut table = RuleTable::new();
        for (prefix, state) in iter {
            table.insert(prefix, state);
        }
        table
    }
}

impl From<BTreeMap<String, RuleState>> for RuleTable {
    fn from(rules: BTreeMap<String, RuleState>) -> Self {
        rules.into_iter().collect()
    }
}

impl From<RuleTable> for BTreeMap<String, RuleState> {
    fn from(table: RuleTable) -> Self {
        table.rules
    }
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let trimmed = path.trim_start_matches("./").trim_end_matches('/');
    trimmed.to_string()
}
