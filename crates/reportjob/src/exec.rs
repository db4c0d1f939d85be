//! Shell execution of the assembled renderer line.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::RenderError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured outcome of one renderer invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code of the shell, when it exited normally.
    pub code: Option<i32>,
    /// Captured stdout lines followed by stderr lines.
    pub lines: Vec<String>,
}

impl ExecOutput {
    /// The captured lines as one presentable message.
    pub fn joined(&self) -> String {
        self.lines.join(", ")
    }
}

/// Runs a shell line on behalf of a report job.
///
/// [`SystemShell`] is the live implementation; tests and hosts with their own
/// process management substitute their own.
pub trait ShellRunner: Send + Sync {
    fn run(&self, line: &str, timeout: Duration) -> Result<ExecOutput, RenderError>;
}

/// Executes through `sh -c`, killing the child when `timeout` expires.
///
/// The line contains an `export LC_ALL=...;` prefix, so it must go through a
/// shell rather than straight to the renderer binary.
#[derive(Debug, Clone, Default)]
pub struct SystemShell;

impl ShellRunner for SystemShell {
    fn run(&self, line: &str, timeout: Duration) -> Result<ExecOutput, RenderError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::Spawn { source: e })?;

        // Drain both pipes on their own threads; a child writing more than
        // the pipe buffer would otherwise block forever and run into the
        // timeout instead of exiting.
        let stdout_lines = drain(child.stdout.take());
        let stderr_lines = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait().map_err(|e| RenderError::Wait { source: e })? {
                Some(status) => {
                    let mut lines = stdout_lines.join().unwrap_or_default();
                    lines.extend(stderr_lines.join().unwrap_or_default());
                    return Ok(ExecOutput {
                        code: status.code(),
                        lines,
                    });
                }
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::TimedOut { limit: timeout });
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<Vec<String>> {
    std::thread::spawn(move || {
        let mut lines = Vec::new();
        if let Some(stream) = stream {
            for line in BufReader::new(stream).lines() {
                match line {
                    Ok(line) => lines.push(line),
                    Err(_) => break,
                }
            }
        }
        lines
    })
}
