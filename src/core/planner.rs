//! # Test Execution Planner Module / 测试执行计划模块
//!
//! This module discovers the scripts of a corpus and plans which of them this
//! runner executes, including exclusion markers and distribution of the
//! corpus across several CI runners.
//!
//! 此模块发现语料库中的脚本并规划本运行器执行其中哪些，
//! 包括排除标记以及在多个 CI 运行器之间分配语料库。

use anyhow::{Context, Result, bail};
use std::path::Path;
use walkdir::WalkDir;

use crate::infra::fs::display_path;

/// What to look for while walking a corpus.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions<'a> {
    /// Script extension, without the dot.
    pub extension: &'a str,
    /// Paths containing any of these substrings are dropped.
    pub exclude: &'a [String],
}

/// Represents a complete execution plan for a corpus.
/// 表示语料库的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Scripts this runner executes, as forward-slash paths relative to the root, in order.
    /// 本运行器要执行的脚本（相对于根目录的正斜杠路径），按顺序排列。
    pub scripts: Vec<String>,
    /// Number of scripts dropped because their path contains an exclusion marker.
    /// 因路径包含排除标记而被丢弃的脚本数量。
    pub excluded_count: usize,
    /// Whether the scripts are distributed across multiple runners (CI environment).
    /// 脚本是否分布在多个运行器上（CI 环境）。
    pub is_distributed: bool,
}

/// Recursively collects every file under `corpus` carrying the script
/// extension, returned relative to `root` and sorted for a deterministic
/// execution order. The second value counts files dropped by `exclude`.
///
/// 递归收集 `corpus` 下所有带脚本扩展名的文件，相对于 `root` 返回，
/// 并排序以确保确定的执行顺序。第二个返回值是被 `exclude` 丢弃的文件数。
pub fn discover_scripts(
    root: &Path,
    corpus: &Path,
    options: &DiscoveryOptions<'_>,
) -> Result<(Vec<String>, usize)> {
    let corpus_dir = root.join(corpus);
    if !corpus_dir.starts_with(root) {
        bail!(
            "Corpus directory {} is outside the harness root {}",
            corpus_dir.display(),
            root.display()
        );
    }
    let mut scripts = Vec::new();
    let mut excluded = 0;

    for entry in WalkDir::new(&corpus_dir).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to walk corpus directory: {}", corpus_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = display_path(root, entry.path());
        if options.exclude.iter().any(|marker| path.contains(marker.as_str())) {
            excluded += 1;
            continue;
        }
        if entry.path().extension().is_none_or(|ext| ext != options.extension) {
            continue;
        }

        scripts.push(path);
    }

    scripts.sort();
    log::debug!(
        "discovered {} scripts under {} ({excluded} excluded)",
        scripts.len(),
        corpus_dir.display()
    );
    Ok((scripts, excluded))
}

/// Creates an execution plan from the discovered scripts, keeping only this
/// runner's share when `total_runners`/`runner_index` are given.
///
/// # Arguments
/// * `scripts` - All discovered scripts, already sorted
/// * `excluded_count` - Number of scripts dropped during discovery
/// * `total_runners` - Optional total number of runners for distributed execution
/// * `runner_index` - Optional index of this runner (0-based)
pub fn plan_execution(
    scripts: Vec<String>,
    excluded_count: usize,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let (scripts, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 {
                bail!("Total runners must be greater than zero.");
            }
            if index >= total {
                bail!("Runner index must be less than total runners.");
            }
            let distributed: Vec<_> = scripts
                .into_iter()
                .enumerate()
                .filter(|(i, _)| i % total == index)
                .map(|(_, script)| script)
                .collect();
            (distributed, true)
        }
        (None, None) => (scripts, false),
        _ => bail!("Both --total-runners and --runner-index must be provided."),
    };

    Ok(ExecutionPlan {
        scripts,
        excluded_count,
        is_distributed,
    })
}
