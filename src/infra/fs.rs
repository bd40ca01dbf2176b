//! # File System Operations Module / 文件系统操作模块
//!
//! Path helpers shared by the planner and the CLI: canonicalization with
//! context, shell-style expansion of user-supplied paths, and conversion of
//! script paths to the forward-slash form used by rules and reports.
//!
//! 规划器和 CLI 共享的路径工具：带上下文的规范化、用户提供路径的
//! shell 风格展开，以及将脚本路径转换为规则和报告使用的正斜杠形式。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Gets the absolute path from a potentially relative path.
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}

/// Expands `~` and environment variables in a user-supplied path.
/// 展开用户提供路径中的 `~` 和环境变量。
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Renders `path` relative to `root` with forward slashes, the form used for
/// rule lookups, progress output and as the interpreter argument.
///
/// 以正斜杠渲染 `path` 相对于 `root` 的路径，用于规则查找、进度输出以及解释器参数。
pub fn display_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
