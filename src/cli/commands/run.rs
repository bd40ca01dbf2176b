//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which runs the interpreter given
//! on the command line against every script of the corpus.
//!
//! 此模块实现了 `run` 命令，它针对语料库中的每个脚本运行命令行中给出的解释器。

use anyhow::{Context, Result, bail};
use colored::*;
use std::{io, path::Path, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{DEFAULT_CONFIG_FILE, HarnessConfig},
        execution::{Interpreter, ProcessRunner},
        planner::{self, DiscoveryOptions},
        suite::{Suite, SuiteContext},
    },
    infra::{fs, t},
    reporting::json::generate_json_report,
};

/// Options of the `run` command, as parsed from the command line.
/// `run` 命令的选项，从命令行解析而来。
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub interpreter: String,
    pub config: Option<PathBuf>,
    pub root: PathBuf,
    pub corpus: Option<PathBuf>,
    pub tag: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_reported: Option<usize>,
    pub interpreter_args: Option<String>,
    pub json: Option<PathBuf>,
    pub total_runners: Option<usize>,
    pub runner_index: Option<usize>,
    /// Whether `--lang` was given, in which case the config file's language is ignored.
    pub lang_explicit: bool,
}

/// Executes the run command with the provided options.
///
/// # Returns
/// `Ok(())` when every test passed, an error naming the failure count otherwise.
pub async fn execute(options: RunOptions) -> Result<()> {
    let (config, config_path) = setup_and_parse_config(&options)?;

    if !options.lang_explicit {
        if let Some(language) = config.language.as_deref() {
            crate::init(Some(language));
        }
    }

    let root = fs::absolute_path(&options.root)?;
    let interpreter = resolve_interpreter(&options.interpreter, &config)?;

    println!("{}", t!("run.root_detected", path = root.display()));
    println!(
        "{}",
        t!("run.interpreter", path = interpreter.program.display()).yellow()
    );
    match &config_path {
        Some(path) => println!("{}", t!("run.config_loaded", path = path.display())),
        None => println!("{}", t!("run.config_default")),
    }

    let corpus_dir = root.join(&config.corpus);
    if !fs::is_directory(&corpus_dir) {
        bail!("{}", t!("run.corpus_not_found", path = corpus_dir.display()));
    }

    let discovery = DiscoveryOptions {
        extension: &config.extension,
        exclude: &config.exclude,
    };
    let (scripts, excluded) = planner::discover_scripts(&root, &config.corpus, &discovery)?;
    let plan = planner::plan_execution(scripts, excluded, options.total_runners, options.runner_index)?;

    if plan.excluded_count > 0 {
        println!(
            "{}",
            t!("run.excluded_scripts", count = plan.excluded_count).cyan()
        );
    }

    if let (true, Some(total), Some(index)) =
        (plan.is_distributed, options.total_runners, options.runner_index)
    {
        println!(
            "{}",
            t!(
                "run.running_as_split_runner",
                index = index + 1,
                total = total,
                count = plan.scripts.len()
            )
            .bold()
        );
    }

    if plan.scripts.is_empty() {
        println!("{}", t!("run.no_scripts").green());
        return Ok(());
    }

    let stop_token = setup_signal_handler();
    let runner = ProcessRunner::new(interpreter.clone(), &root).with_timeout(config.timeout());
    let context = SuiteContext::from_config(&root, &config);
    let mut suite = Suite::new(context, runner, io::stdout()).with_cancellation(stop_token);

    let success = suite.run_scripts(&plan.scripts).await?;

    if let Some(report_path) = &options.json {
        let interpreter_name = interpreter.program.display().to_string();
        match generate_json_report(&interpreter_name, suite.stats(), suite.results(), report_path) {
            Ok(()) => println!("{}", t!("run.json_written", path = report_path.display())),
            Err(e) => eprintln!("{} {e:#}", t!("run.json_failed").red()),
        }
    }

    if success {
        Ok(())
    } else if suite.was_interrupted() {
        bail!("{}", t!("run.interrupted"))
    } else {
        bail!("{}", t!("run.suite_failed", failed = suite.stats().failed))
    }
}

/// Loads the configuration and applies command-line overrides.
/// Returns the path the configuration was read from, if any.
fn setup_and_parse_config(options: &RunOptions) -> Result<(HarnessConfig, Option<PathBuf>)> {
    let (mut config, config_path) = match &options.config {
        Some(raw) => {
            let path = fs::expand_path(&raw.to_string_lossy())?;
            (HarnessConfig::load(&path)?, Some(path))
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            let loaded = path.exists().then(|| path.clone());
            (HarnessConfig::load_or_default(&path)?, loaded)
        }
    };

    if let Some(corpus) = &options.corpus {
        config.set_corpus(corpus.clone());
    }
    if let Some(tag) = &options.tag {
        config.interpreter_tag = Some(tag.clone());
    }
    if let Some(timeout) = options.timeout_secs {
        config.timeout_secs = Some(timeout);
    }
    if let Some(max_reported) = options.max_reported {
        config.max_reported = max_reported;
    }
    if let Some(raw) = &options.interpreter_args {
        config.interpreter_args = Interpreter::parse_args(raw)?;
    }

    Ok((config, config_path))
}

/// Expands the interpreter path and makes it absolute when it names a file,
/// since scripts run with the harness root as working directory. A bare
/// program name is left for `PATH` lookup.
///
/// 展开解释器路径；当它指向文件时将其转换为绝对路径，因为脚本以测试根目录
/// 作为工作目录运行。单纯的程序名保留给 `PATH` 查找。
fn resolve_interpreter(raw: &str, config: &HarnessConfig) -> Result<Interpreter> {
    let expanded = fs::expand_path(raw)?;
    let is_bare_name = expanded.components().count() == 1 && !Path::new(raw).is_absolute();

    let program = if is_bare_name {
        expanded
    } else {
        fs::absolute_path(&expanded)
            .with_context(|| t!("run.interpreter_not_found", path = raw).to_string())?
    };

    Ok(Interpreter::new(program).with_args(config.interpreter_args.clone()))
}

fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}
