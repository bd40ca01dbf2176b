//! # Command-Line Interface Module / 命令行接口模块
//!
//! Builds the `conformance-runner` command line and dispatches to the `run`
//! and `init` commands.
//!
//! 构建 `conformance-runner` 命令行并分发到 `run` 和 `init` 命令。

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

pub mod commands;

use commands::run::RunOptions;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

pub fn build_cli() -> Command {
    Command::new("conformance-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about").to_string())
                .arg(
                    Arg::new("interpreter")
                        .help(t!("cli.arg_interpreter").to_string())
                        .value_name("INTERPRETER")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config").to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .help(t!("cli.arg_root").to_string())
                        .value_name("ROOT")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("corpus")
                        .long("corpus")
                        .help(t!("cli.arg_corpus").to_string())
                        .value_name("CORPUS")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .help(t!("cli.arg_tag").to_string())
                        .value_name("TAG")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help(t!("cli.arg_timeout").to_string())
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("max-reported")
                        .long("max-reported")
                        .help(t!("cli.arg_max_reported").to_string())
                        .value_name("COUNT")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("interpreter-args")
                        .long("interpreter-args")
                        .help(t!("cli.arg_interpreter_args").to_string())
                        .value_name("ARGS")
                        .allow_hyphen_values(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("cli.arg_json").to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("total-runners")
                        .long("total-runners")
                        .help(t!("cli.arg_total_runners").to_string())
                        .value_name("TOTAL_RUNNERS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("runner-index"),
                )
                .arg(
                    Arg::new("runner-index")
                        .long("runner-index")
                        .help(t!("cli.arg_runner_index").to_string())
                        .value_name("RUNNER_INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set)
                        .requires("total-runners"),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about").to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_init_config").to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_options(matches: &ArgMatches, lang_explicit: bool) -> RunOptions {
    RunOptions {
        interpreter: matches
            .get_one::<String>("interpreter")
            .cloned()
            .unwrap_or_default(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        root: matches
            .get_one::<PathBuf>("root")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        corpus: matches.get_one::<PathBuf>("corpus").cloned(),
        tag: matches.get_one::<String>("tag").cloned(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        max_reported: matches.get_one::<usize>("max-reported").copied(),
        interpreter_args: matches.get_one::<String>("interpreter-args").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
        total_runners: matches.get_one::<usize>("total-runners").copied(),
        runner_index: matches.get_one::<usize>("runner-index").copied(),
        lang_explicit,
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    crate::init(language.as_deref());

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(run_options(run_matches, language.is_some())).await?;
        }
        Some(("init", init_matches)) => {
            let config = init_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let non_interactive = init_matches.get_flag("non-interactive");
            commands::init::run_init_wizard(&config, non_interactive)?;
        }
        _ => {
            // Clap has already printed help info.
        }
    }
    Ok(())
}
