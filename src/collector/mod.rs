//! Invocation of the external cluster-status command.
//!
//! The `StatusSource` trait abstracts where status text comes from so the
//! refresh loop can run against a mock in tests. The real implementation
//! shells out to `fdbcli --exec "status json"`.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Error;

/// Interval between liveness checks while waiting for the child.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A source of raw status text.
pub trait StatusSource {
    /// Fetches one status document. Expected to block for the duration of
    /// the external command; everything else in a cycle is CPU-only.
    fn fetch(&self) -> Result<String, Error>;
}

/// Runs `fdbcli --exec "status json"` with a bounded wall-clock timeout.
pub struct CliStatusSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CliStatusSource {
    /// Builds the default fdbcli invocation. `extra_args` are the arguments
    /// the user passed after `--`, handed to fdbcli verbatim.
    pub fn new(extra_args: &[String]) -> Self {
        let mut args = vec![
            "--exec".to_string(),
            "status json".to_string(),
            "--timeout=15".to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        Self {
            program: "fdbcli".to_string(),
            args,
            // Above fdbcli's own --timeout so the cli gets to report its
            // error first; this bound only catches a hung process.
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl StatusSource for CliStatusSource {
    fn fetch(&self) -> Result<String, Error> {
        debug!("running {} {:?}", self.program, self.args);
        let started = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::FetchFailure {
                message: format!("could not run {}: {}", self.program, e),
                output: String::new(),
            })?;

        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let status = match wait_with_deadline(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!("{} timed out after {:?}", self.program, self.timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::FetchFailure {
                    message: format!(
                        "{} timed out after {} seconds",
                        self.program,
                        self.timeout.as_secs()
                    ),
                    output: collect(stdout_rx) + &collect(stderr_rx),
                });
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::FetchFailure {
                    message: format!("could not wait for {}: {}", self.program, e),
                    output: collect(stdout_rx) + &collect(stderr_rx),
                });
            }
        };

        let stdout = collect(stdout_rx);
        let stderr = collect(stderr_rx);
        debug!("fetch finished in {:?}", started.elapsed());

        if status.success() {
            Ok(stdout)
        } else {
            Err(Error::FetchFailure {
                message: format!("{} exited with {}", self.program, status),
                output: stdout + &stderr,
            })
        }
    }
}

/// Drains a child pipe on its own thread so the child never blocks on a
/// full pipe buffer while we poll for exit.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            let _ = tx.send(buf);
        });
    }
    rx
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    // Reader threads finish once the pipe hits EOF (child exited or was
    // killed); a short grace period avoids hanging on a leaked descriptor.
    rx.recv_timeout(Duration::from_secs(1)).unwrap_or_default()
}

/// Polls the child until it exits or the deadline passes. `Ok(None)` means
/// the deadline passed; a wait failure is reported as such, not as a
/// timeout.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> io::Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(Some(status)),
            None => {
                if Instant::now() >= deadline {
                    return Ok(None);
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}
