//! # Script Execution Module / 脚本执行模块
//!
//! Invokes the interpreter-under-test on one script and captures what it did.
//! The interpreter is a black box: it receives the script path as its last
//! argument, no stdin, and is expected to exit with 0, 65 (compile error) or
//! 70 (runtime error).
//!
//! 在单个脚本上调用被测解释器并捕获其行为。
//! 解释器是一个黑盒：它以脚本路径作为最后一个参数，没有标准输入，
//! 并应以 0、65（编译错误）或 70（运行时错误）退出。

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::models::{RunOutcome, RunResult};
use crate::infra::command;

/// The interpreter program plus any fixed leading arguments.
/// 解释器程序以及任何固定的前置参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Interpreter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Splits a shell-quoted argument string (e.g. `--gc-stress "a b"`) into
    /// leading arguments.
    pub fn parse_args(raw: &str) -> Result<Vec<String>> {
        shlex::split(raw).ok_or_else(|| anyhow::anyhow!("Failed to parse interpreter arguments: {raw}"))
    }
}

/// Runs one script and reports how the run ended. The suite is generic over
/// this so it can be driven without spawning real processes.
///
/// 运行单个脚本并报告运行结果。测试套件对此是泛型的，
/// 因此无需派生真实进程即可驱动。
#[allow(async_fn_in_trait)]
pub trait ScriptRunner {
    /// `script` is the forward-slash path relative to the harness root.
    async fn run(&self, script: &str) -> Result<RunOutcome>;
}

/// Runs scripts by spawning the interpreter as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: Interpreter,
    working_dir: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(interpreter: Interpreter, working_dir: impl AsRef<Path>) -> Self {
        Self {
            interpreter,
            working_dir: working_dir.as_ref().to_path_buf(),
            timeout: None,
        }
    }

    /// Kills the interpreter if a single script runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    fn command(&self, script: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.interpreter.program);
        cmd.args(&self.interpreter.args)
            .arg(script)
            .current_dir(&self.working_dir)
            .kill_on_drop(true);
        cmd
    }
}

impl ScriptRunner for ProcessRunner {
    async fn run(&self, script: &str) -> Result<RunOutcome> {
        log::debug!(
            "running {} {:?} {script}",
            self.interpreter.program.display(),
            self.interpreter.args
        );

        let execution = command::spawn_and_capture(self.command(script));

        // Dropping the future on timeout drops the child, and `kill_on_drop`
        // takes care of the process.
        let captured = match self.timeout {
            Some(duration) => match tokio::time::timeout(duration, execution).await {
                Ok(captured) => captured,
                Err(_) => {
                    log::debug!("{script} timed out after {duration:?}");
                    return Ok(RunOutcome::TimedOut(duration));
                }
            },
            None => execution.await,
        };

        let captured = captured.with_context(|| {
            format!(
                "Failed to run interpreter '{}'",
                self.interpreter.program.display()
            )
        })?;

        Ok(RunOutcome::Completed(RunResult {
            exit_code: captured.status.code(),
            stdout: captured.stdout,
            stderr: captured.stderr,
        }))
    }
}
