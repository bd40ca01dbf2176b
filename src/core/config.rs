//! # Configuration Module / 配置模块
//!
//! The harness configuration, loaded from a TOML file (`Conformance.toml` by
//! default). Every key is optional; missing keys fall back to the defaults of
//! the reference corpus layout.
//!
//! 测试工具的配置，从 TOML 文件（默认为 `Conformance.toml`）加载。
//! 每个键都是可选的；缺失的键会回退到参考语料库布局的默认值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::rules::{RuleState, RuleTable};
use crate::core::validator::DEFAULT_MAX_REPORTED;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "Conformance.toml";

/// Represents the complete harness configuration.
/// 代表完整的测试工具配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// The system locale is used when absent.
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。未设置时使用系统语言。
    #[serde(default)]
    pub language: Option<String>,

    /// Directory holding the test scripts, relative to the harness root.
    /// 存放测试脚本的目录，相对于测试根目录。
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,

    /// Extension (without the dot) a file needs to be treated as a script.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Paths containing any of these substrings are never considered.
    /// 包含这些子串中任意一个的路径永远不会被考虑。
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Name of the interpreter build, used to select `// [tag line N]` errors.
    /// 解释器构建的名称，用于选择 `// [tag line N]` 错误。
    #[serde(default)]
    pub interpreter_tag: Option<String>,

    /// Arguments placed before the script path on every invocation.
    #[serde(default)]
    pub interpreter_args: Vec<String>,

    /// Optional per-script timeout. No timeout is applied when absent.
    /// 可选的单脚本超时时间。未设置时不应用超时。
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// How many unexpected stderr lines are listed before truncating.
    #[serde(default = "default_max_reported")]
    pub max_reported: usize,

    /// Path-prefix run/skip overrides. An empty or missing table runs the
    /// whole corpus.
    /// 路径前缀的运行/跳过覆盖规则。表为空或缺失时运行整个语料库。
    #[serde(default)]
    pub rules: RuleTable,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let corpus = default_corpus();
        let rules = corpus_rules(&corpus);

        Self {
            language: None,
            corpus,
            extension: default_extension(),
            exclude: default_exclude(),
            interpreter_tag: None,
            interpreter_args: Vec::new(),
            timeout_secs: None,
            max_reported: default_max_reported(),
            rules,
        }
    }
}

impl HarnessConfig {
    /// Parses a configuration from TOML text. Without a `[rules]` table the
    /// configured corpus is run as a whole.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).context("Failed to parse harness configuration")?;
        if config.rules.is_empty() {
            config.rules = corpus_rules(&config.corpus);
        }
        Ok(config)
    }

    /// Points the configuration at another corpus. When the rule table is
    /// still the single `{corpus: run}` entry, it follows the new corpus.
    ///
    /// 将配置指向另一个语料库。若规则表仍然只有 `{corpus: run}` 一项，则随之更新。
    pub fn set_corpus(&mut self, corpus: PathBuf) {
        if self.rules == corpus_rules(&self.corpus) {
            self.rules = corpus_rules(&corpus);
        }
        self.corpus = corpus;
    }

    /// Loads the configuration file at `path`.
    /// 加载位于 `path` 的配置文件。
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Loads `path` if it exists, otherwise returns the defaults. Used for the
    /// implicit default path, where a missing file is not an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize harness configuration")
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_corpus() -> PathBuf {
    PathBuf::from("test")
}

fn corpus_rules(corpus: &Path) -> RuleTable {
    let mut rules = RuleTable::new();
    rules.insert(corpus.to_string_lossy(), RuleState::Run);
    rules
}

fn default_extension() -> String {
    "xan".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["benchmark".to_string(), "nano".to_string()]
}

fn default_max_reported() -> usize {
    DEFAULT_MAX_REPORTED
}
