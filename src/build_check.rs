//! The external build checker, seen only through its exit status

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::BuildCheckConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

const OUTPUT_GRACE: Duration = Duration::from_millis(100);

/// Lines of stderr kept in a failure message
const FAILURE_TAIL_LINES: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Success,
    Failure { status: Option<i32>, output: String },
    Timeout { after: Duration },
    ToolNotFound { program: String },
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Success => f.write_str("build check passed"),
            CheckOutcome::Failure { status, output } => {
                match status {
                    Some(code) => write!(f, "build check failed (exit code {code})")?,
                    None => f.write_str("build check failed (terminated by signal)")?,
                }
                if !output.is_empty() {
                    write!(f, ":\n{output}")?;
                }
                Ok(())
            }
            CheckOutcome::Timeout { after } => {
                write!(f, "build check timed out after {after:?}")
            }
            CheckOutcome::ToolNotFound { program } => {
                write!(f, "`{program}` not found (is it installed?)")
            }
        }
    }
}

/// Something that can check the workspace builds
pub trait Checker {
    /// Human-readable description, e.g. `cargo check --workspace`
    fn describe(&self) -> String;

    /// Run the check, giving up after `timeout`
    fn run(&self, timeout: Duration) -> CheckOutcome;
}

/// Runs an external command in the project root
#[derive(Debug, Clone)]
pub struct CommandChecker {
    program: String,
    args: Vec<String>,
    current_dir: PathBuf,
}

impl CommandChecker {
    pub fn new(program: impl Into<String>, args: Vec<String>, current_dir: &Path) -> Self {
        Self {
            program: program.into(),
            args,
            current_dir: current_dir.to_path_buf(),
        }
    }

    pub fn from_config(config: &BuildCheckConfig, current_dir: &Path) -> Self {
        Self::new(config.program.clone(), config.args.clone(), current_dir)
    }

    /// Locate the program the way the child will: `PATH` for bare names,
    /// the project root for relative paths
    fn resolve_program(&self) -> Option<PathBuf> {
        which::which_in(&self.program, std::env::var_os("PATH"), &self.current_dir).ok()
    }

    fn spawn(&self, program: &Path) -> std::io::Result<Child> {
        Command::new(program)
            .args(&self.args)
            .current_dir(&self.current_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

impl Checker for CommandChecker {
    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn run(&self, timeout: Duration) -> CheckOutcome {
        let Some(program) = self.resolve_program() else {
            return CheckOutcome::ToolNotFound {
                program: self.program.clone(),
            };
        };

        info!("Running {}", self.describe());
        let deadline = Instant::now() + timeout;
        let mut child = match self.spawn(&program) {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return CheckOutcome::ToolNotFound {
                    program: self.program.clone(),
                };
            }
            Err(e) => {
                return CheckOutcome::Failure {
                    status: None,
                    output: format!("failed to start `{}`: {e}", self.program),
                };
            }
        };

        // Drain both pipes so a chatty child can't block on a full buffer
        let (sender, receiver) = mpsc::channel();
        let mut pipes = 0;
        if let Some(stdout) = child.stdout.take() {
            drain(Pipe::Stdout, stdout, sender.clone());
            pipes += 1;
        }
        if let Some(stderr) = child.stderr.take() {
            drain(Pipe::Stderr, stderr, sender.clone());
            pipes += 1;
        }
        drop(sender);

        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!("Killing `{}` after {timeout:?}", self.program);
                let _ = child.kill();
                let _ = child.wait();
                return CheckOutcome::Timeout { after: timeout };
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return CheckOutcome::Failure {
                    status: None,
                    output: format!("failed to wait for `{}`: {e}", self.program),
                };
            }
        };

        let Captured { stdout, stderr } = collect(&receiver, pipes, deadline);

        if status.success() {
            CheckOutcome::Success
        } else {
            let captured = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            CheckOutcome::Failure {
                status: status.code(),
                output: tail(&captured, FAILURE_TAIL_LINES),
            }
        }
    }
}

fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

#[derive(Debug, Default)]
struct Captured {
    stdout: String,
    stderr: String,
}

fn drain<R: Read + Send + 'static>(pipe: Pipe, mut reader: R, sender: Sender<(Pipe, Vec<u8>)>) {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        let _ = sender.send((pipe, buffer));
    });
}

/// Gather the drained pipes, giving up at `deadline`.
///
/// A background process started by the check can inherit its pipes and keep
/// them open after the check itself exits. Whatever arrived by the deadline is
/// kept; the reader threads are left to finish on their own.
fn collect(receiver: &Receiver<(Pipe, Vec<u8>)>, pipes: usize, deadline: Instant) -> Captured {
    let mut captured = Captured::default();
    for _ in 0..pipes {
        // A child that exits right at the deadline still gets its output read
        let remaining = deadline
            .saturating_duration_since(Instant::now())
            .max(OUTPUT_GRACE);
        let Ok((pipe, bytes)) = receiver.recv_timeout(remaining) else {
            warn!("Build check output still open at the deadline, not waiting for it");
            break;
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();
        match pipe {
            Pipe::Stdout => captured.stdout = text,
            Pipe::Stderr => captured.stderr = text,
        }
    }
    captured
}

fn tail(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
