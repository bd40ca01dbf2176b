//! # Command Execution Module / 命令执行模块
//!
//! Spawns child processes and captures their stdout and stderr as raw bytes.
//! Both streams are drained concurrently so a chatty child never blocks on a
//! full pipe.
//!
//! 派生子进程并以原始字节捕获其 stdout 和 stderr。
//! 两个流被并发读取，因此输出较多的子进程不会因管道已满而阻塞。

use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Everything a finished child process left behind.
/// 已结束子进程留下的全部信息。
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawns a command with stdin closed and captures its stdout and stderr.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// The exit status and both output streams, or the I/O error that prevented
/// the process from being spawned or awaited.
///
/// 以关闭的 stdin 派生命令，并捕获其 stdout 和 stderr。
pub async fn spawn_and_capture(mut cmd: tokio::process::Command) -> std::io::Result<CapturedOutput> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("Failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("Failed to capture stderr"))?;

    let stdout_handle = tokio::spawn(read_all(stdout));
    let stderr_handle = tokio::spawn(read_all(stderr));

    let status = child.wait().await?;

    // Join the readers so output written just before exit is not lost.
    // 等待读取任务完成，确保进程退出前写入的输出不会丢失。
    let stdout = stdout_handle.await.map_err(std::io::Error::other)??;
    let stderr = stderr_handle.await.map_err(std::io::Error::other)??;

    Ok(CapturedOutput {
        status,
        stdout,
        stderr,
    })
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    Ok(buffer)
}
