/// Engine invocation: argv construction, captured and streaming runs.
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::config::SandboxConfig;

use super::envelope::SandboxOutput;
use super::errors::SandboxError;
use super::rewrite::brand_hints;

/// Tells the engine where its own state lives.
const ENV_ENGINE_HOME: &str = "NIMBELLA_DIR";

/// Asks the engine to wrap its output in a JSON envelope.
const ENV_ENGINE_OUTPUT: &str = "SANDBOX_ENGINE_OUTPUT";

/// Flags whose values must never reach the log.
const SECRET_FLAGS: &[&str] = &["--auth"];

/// Engine commands driven by the sandbox subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    ProjectCreate,
    ProjectDeploy,
    ProjectGetMetadata,
    ProjectWatch,
}

impl EngineCommand {
    /// Command words as the engine expects them.
    #[must_use]
    pub fn words(self) -> &'static [&'static str] {
        match self {
            Self::ProjectCreate => &["project", "create"],
            Self::ProjectDeploy => &["project", "deploy"],
            Self::ProjectGetMetadata => &["project", "get-metadata"],
            Self::ProjectWatch => &["project", "watch"],
        }
    }
}

/// A single engine invocation: command, positional arguments and flags.
///
/// Flags are recorded in the order they are added; bool flags only when
/// set, string flags only when non-empty.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    command: EngineCommand,
    args: Vec<String>,
    flags: Vec<String>,
}

impl ExecRequest {
    #[must_use]
    pub fn new(command: EngineCommand) -> Self {
        Self {
            command,
            args: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Append `--<name>` when `value` is true.
    #[must_use]
    pub fn bool_flag(mut self, name: &str, value: bool) -> Self {
        if value {
            self.flags.push(format!("--{name}"));
        }
        self
    }

    /// Append `--<name> <value>` when `value` is present and non-empty.
    #[must_use]
    pub fn string_flag(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.flags.push(format!("--{name}"));
            self.flags.push(v.to_owned());
        }
        self
    }

    /// Full engine argv (excluding the entry script).
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        self.command
            .words()
            .iter()
            .map(|w| (*w).to_owned())
            .chain(self.args.iter().cloned())
            .chain(self.flags.iter().cloned())
            .collect()
    }

    /// Argv with secret flag values masked, for logging.
    #[must_use]
    pub fn redacted_argv(&self) -> Vec<String> {
        let mut argv = self.argv();
        for i in 1..argv.len() {
            if SECRET_FLAGS.contains(&argv[i - 1].as_str()) {
                argv[i] = "****".to_owned();
            }
        }
        argv
    }
}

/// A located engine installation.
#[derive(Debug, Clone)]
pub struct Engine {
    node: PathBuf,
    entry: PathBuf,
    home: PathBuf,
}

impl Engine {
    /// Resolve the node executable and engine entry script from config.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::EngineNotInstalled` if the entry script is
    /// missing and `SandboxError::NodeNotFound` if no node executable can be
    /// found.
    pub fn locate(config: &SandboxConfig) -> Result<Self, SandboxError> {
        let entry = config.engine_entry_path();
        if !entry.is_file() {
            return Err(SandboxError::EngineNotInstalled { path: entry });
        }

        let node = match &config.node {
            Some(node) => node.clone(),
            None => which::which("node").map_err(|_| SandboxError::NodeNotFound)?,
        };
        log::debug!("engine located; node={}, entry={}", node.display(), entry.display());

        Ok(Self {
            node,
            entry,
            home: config.dir.clone(),
        })
    }

    fn command(&self, req: &ExecRequest) -> Command {
        log::debug!(
            "invoking engine: {} {}",
            self.entry.display(),
            req.redacted_argv().join(" ")
        );
        let mut cmd = Command::new(&self.node);
        cmd.arg(&self.entry)
            .args(req.argv())
            .env(ENV_ENGINE_HOME, &self.home)
            .stdin(Stdio::null());
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> SandboxError {
        SandboxError::Spawn {
            program: self.node.clone(),
            source,
        }
    }

    /// Run the engine and parse its JSON envelope.
    ///
    /// An envelope carrying an `error` is still returned as `Ok`; callers
    /// decide how to present the transcript alongside the failure.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::Spawn` if the engine cannot be started,
    /// `SandboxError::EngineFailed` if it exits non-zero without an envelope,
    /// and `SandboxError::MalformedOutput` if it exits zero without one.
    pub fn run(&self, req: &ExecRequest) -> Result<SandboxOutput, SandboxError> {
        let output = self
            .command(req)
            .env(ENV_ENGINE_OUTPUT, "envelope")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.stderr.is_empty() {
            log::debug!("engine stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }

        match SandboxOutput::parse(&output.stdout) {
            Ok(mut envelope) => {
                if !output.status.success() && envelope.failure().is_none() {
                    envelope.error = Some(status_message(output.status));
                }
                Ok(envelope)
            }
            Err(err) if output.status.success() => Err(err),
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    Err(SandboxError::engine(status_message(output.status)))
                } else {
                    Err(SandboxError::engine(stderr))
                }
            }
        }
    }

    /// Run the engine, relaying its stdout line by line to `out` as it arrives.
    ///
    /// Lines are decoded lossily, so bytes that are not UTF-8 cannot end the
    /// relay. Stderr is inherited so the engine's diagnostics reach the
    /// terminal unmodified. If relaying fails the engine is killed and reaped
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns `SandboxError::Spawn` if the engine cannot be started,
    /// `SandboxError::Io` if relaying fails, and `SandboxError::EngineFailed`
    /// if the engine exits non-zero.
    pub fn run_streaming<W: Write>(
        &self,
        req: &ExecRequest,
        out: &mut W,
    ) -> Result<(), SandboxError> {
        let mut child = self
            .command(req)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(stdout) = child.stdout.take() {
            if let Err(err) = relay_lines(BufReader::new(stdout), out) {
                log::debug!("relay failed, stopping engine: {err}");
                let _ = child.kill();
                let _ = child.wait();
                return Err(err.into());
            }
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(SandboxError::engine(status_message(status)))
        }
    }

    #[cfg(test)]
    pub(crate) fn with_paths(node: PathBuf, entry: PathBuf, home: PathBuf) -> Self {
        Self { node, entry, home }
    }
}

/// Copy newline-terminated lines from `reader` to `out`, rebranding hints.
fn relay_lines<R: BufRead, W: Write>(mut reader: R, out: &mut W) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        writeln!(out, "{}", brand_hints(line))?;
        out.flush()?;
    }
}

fn status_message(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("engine exited with status {code}"),
        None => "engine was terminated by a signal".to_owned(),
    }
}
