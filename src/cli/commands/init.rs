//! # Configuration Initialization Module / 配置初始化模块
//!
//! This module provides the `init` command, which writes a `Conformance.toml`
//! for a corpus either from the defaults or through a short interactive
//! wizard.
//!
//! 此模块提供 `init` 命令，它根据默认值或通过简短的交互式向导
//! 为语料库写出 `Conformance.toml`。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Asks for the corpus directory, script extension, interpreter tag and timeout
//! - **Overwrite Protection**: Confirmation prompt before overwriting an existing configuration
//!
//! - **交互式向导**: 询问语料库目录、脚本扩展名、解释器标签和超时时间
//! - **覆盖保护**: 覆盖现有配置前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::HarnessConfig;
use crate::infra::t;

const CONFIG_HEADER: &str = "\
# Conformance runner configuration.
# Rules map forward-slash path prefixes to \"run\" or \"skip\"; the most
# specific matching prefix wins.
";

/// Runs the wizard (or the non-interactive default) and writes the file.
///
/// 运行向导（或非交互式默认流程）并写出文件。
pub fn run_init_wizard(config_path: &Path, non_interactive: bool) -> Result<()> {
    if non_interactive {
        return write_config(config_path, &HarnessConfig::default());
    }

    let theme = ColorfulTheme::default();
    println!("\n{}", t!("init.welcome").cyan().bold());

    if config_path.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", path = config_path.display()))
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed").to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted"));
            return Ok(());
        }
    }

    let defaults = HarnessConfig::default();

    let corpus: String = Input::with_theme(&theme)
        .with_prompt(t!("init.corpus_prompt"))
        .default(defaults.corpus.to_string_lossy().into_owned())
        .interact_text()?;
    let extension: String = Input::with_theme(&theme)
        .with_prompt(t!("init.extension_prompt"))
        .default(defaults.extension.clone())
        .interact_text()?;
    let tag: String = Input::with_theme(&theme)
        .with_prompt(t!("init.tag_prompt"))
        .allow_empty(true)
        .interact_text()?;
    let timeout: String = Input::with_theme(&theme)
        .with_prompt(t!("init.timeout_prompt"))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() || input.trim().parse::<u64>().is_ok() {
                Ok(())
            } else {
                Err(t!("init.timeout_invalid").to_string())
            }
        })
        .interact_text()?;

    let config = build_config(defaults, &corpus, &extension, &tag, &timeout);
    write_config(config_path, &config)
}

/// Applies the wizard's answers to the defaults. Empty answers keep the default.
fn build_config(
    mut config: HarnessConfig,
    corpus: &str,
    extension: &str,
    tag: &str,
    timeout: &str,
) -> HarnessConfig {
    let corpus = corpus.trim();
    if !corpus.is_empty() {
        config.set_corpus(PathBuf::from(corpus));
    }

    let extension = extension.trim().trim_start_matches('.');
    if !extension.is_empty() {
        config.extension = extension.to_string();
    }

    let tag = tag.trim();
    config.interpreter_tag = (!tag.is_empty()).then(|| tag.to_string());
    config.timeout_secs = timeout.trim().parse().ok();
    config
}

/// Skip overrides the reference corpus ships with, written commented out
/// below the `[rules]` table as a starting point.
const EXAMPLE_SKIPS: &[&str] = &[
    "limit/loop_too_large",
    "limit/no_reuse_constants",
    "limit/too_many_constants",
    "function/too_many_arguments",
    "function/too_many_parameters",
    "method/too_many_arguments",
    "method/too_many_parameters",
    "regression/binary_trees",
];

/// Renders the file `init` writes: a header, the configuration, and the
/// example skip rules for its corpus as comments.
///
/// 渲染 `init` 写出的文件：文件头、配置本身，以及针对其语料库的示例跳过规则（注释形式）。
pub fn render_config(config: &HarnessConfig) -> Result<String> {
    let body = config.to_toml()?;
    let corpus = config.corpus.to_string_lossy().replace('\\', "/");
    let mut examples = String::from("# Example overrides:\n");
    for script in EXAMPLE_SKIPS {
        examples.push_str(&format!(
            "# \"{corpus}/{script}.{}\" = \"skip\"\n",
            config.extension
        ));
    }
    Ok(format!("{CONFIG_HEADER}\n{body}{examples}"))
}

fn write_config(path: &Path, config: &HarnessConfig) -> Result<()> {
    let content = render_config(config)?;
    fs::write(path, content)
        .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;
    println!("{}", t!("init.success", path = path.display()).green());
    Ok(())
}
