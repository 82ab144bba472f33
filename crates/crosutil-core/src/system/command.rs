//! Synchronous command runner.
//!
//! [`run_command`] launches exactly one child process, optionally wrapped in
//! `./enter_chroot.sh --`, and records what ran and what came back in a
//! [`CommandResult`]. Launch and I/O faults follow the `error_ok` policy; a
//! nonzero exit status is data, never a fault.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

/// Prefix used to re-run a command inside the SDK chroot.
pub const CHROOT_WRAPPER: &str = "./enter_chroot.sh --";

/// A command given either as one string or as an argument sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
  Line(String),
  Args(Vec<String>),
}

impl CommandLine {
  /// Single-string form, sequences joined with single spaces.
  pub fn to_line(&self) -> String {
    match self {
      CommandLine::Line(line) => line.clone(),
      CommandLine::Args(args) => args.join(" "),
    }
  }

  pub fn wrap_chroot(&self) -> CommandLine {
    CommandLine::Line(format!("{CHROOT_WRAPPER} {}", self.to_line()))
  }

  /// Argument vector used when no shell is involved. A single string is
  /// split on whitespace.
  pub fn argv(&self) -> Vec<String> {
    match self {
      CommandLine::Line(line) => line.split_whitespace().map(String::from).collect(),
      CommandLine::Args(args) => args.clone(),
    }
  }
}

impl From<&str> for CommandLine {
  fn from(line: &str) -> Self {
    CommandLine::Line(line.to_string())
  }
}

impl From<String> for CommandLine {
  fn from(line: String) -> Self {
    CommandLine::Line(line)
  }
}

impl From<Vec<String>> for CommandLine {
  fn from(args: Vec<String>) -> Self {
    CommandLine::Args(args)
  }
}

impl From<Vec<&str>> for CommandLine {
  fn from(args: Vec<&str>) -> Self {
    CommandLine::Args(args.into_iter().map(String::from).collect())
  }
}

impl From<&[&str]> for CommandLine {
  fn from(args: &[&str]) -> Self {
    CommandLine::Args(args.iter().map(|arg| arg.to_string()).collect())
  }
}

impl<const N: usize> From<[&str; N]> for CommandLine {
  fn from(args: [&str; N]) -> Self {
    CommandLine::Args(args.iter().map(|arg| arg.to_string()).collect())
  }
}

/// Where a child's stdout or stderr goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamMode {
  #[default]
  Inherit,
  Capture,
  Null,
}

impl StreamMode {
  fn stdio(self) -> Stdio {
    match self {
      StreamMode::Inherit => Stdio::inherit(),
      StreamMode::Capture => Stdio::piped(),
      StreamMode::Null => Stdio::null(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
  pub enter_chroot: bool,
  /// Swallow launch and I/O faults and return a result holding only `cmd`.
  pub error_ok: bool,
  /// Record the exit status in [`CommandResult::returncode`].
  pub exit_code: bool,
  /// Run the command string through `/bin/sh -c`.
  pub shell: bool,
  /// Log the command at info level before running it.
  pub print_cmd: bool,
  pub cwd: Option<PathBuf>,
  /// Text written to the child's stdin. Stdin is only piped when set.
  pub input: Option<String>,
  pub stdout: StreamMode,
  pub stderr: StreamMode,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      enter_chroot: false,
      error_ok: false,
      exit_code: false,
      shell: false,
      print_cmd: true,
      cwd: None,
      input: None,
      stdout: StreamMode::Inherit,
      stderr: StreamMode::Inherit,
    }
  }
}

/// What ran and what it produced.
///
/// `output` and `error` are set together once the I/O exchange completes
/// (empty when the stream was not captured). `returncode` is only set when
/// [`RunOptions::exit_code`] was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
  cmd: String,
  output: Option<String>,
  error: Option<String>,
  returncode: Option<i32>,
}

impl CommandResult {
  fn partial(cmd: String) -> Self {
    Self {
      cmd,
      ..Default::default()
    }
  }

  pub fn cmd(&self) -> &str {
    &self.cmd
  }

  pub fn output(&self) -> Option<&str> {
    self.output.as_deref()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn returncode(&self) -> Option<i32> {
    self.returncode
  }
}

/// Everything a launcher needs to start one child.
#[derive(Debug)]
pub struct LaunchRequest<'a> {
  pub command: &'a CommandLine,
  pub shell: bool,
  pub cwd: Option<&'a Path>,
  pub input: Option<&'a str>,
  pub stdout: StreamMode,
  pub stderr: StreamMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  pub stdout: String,
  pub stderr: String,
  pub returncode: i32,
}

/// Spawns a child and runs the whole I/O exchange with it.
pub trait ProcessLauncher {
  fn launch(&self, request: &LaunchRequest<'_>) -> io::Result<ProcessOutput>;
}

/// Launcher backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
  fn build(request: &LaunchRequest<'_>) -> io::Result<Command> {
    let mut command = if request.shell {
      let mut command = Command::new("/bin/sh");
      command.arg("-c").arg(request.command.to_line());
      command
    } else {
      let argv = request.command.argv();
      let (program, args) = argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
      let mut command = Command::new(program);
      command.args(args);
      command
    };

    if let Some(cwd) = request.cwd {
      command.current_dir(cwd);
    }
    command
      .stdin(if request.input.is_some() {
        Stdio::piped()
      } else {
        Stdio::inherit()
      })
      .stdout(request.stdout.stdio())
      .stderr(request.stderr.stdio());

    Ok(command)
  }
}

impl ProcessLauncher for SystemLauncher {
  fn launch(&self, request: &LaunchRequest<'_>) -> io::Result<ProcessOutput> {
    let mut child = Self::build(request)?.spawn()?;
    let stdin = child.stdin.take();

    // stdin is fed from a scoped thread so a child filling its stdout pipe
    // cannot block our write.
    thread::scope(|scope| {
      let writer = stdin
        .zip(request.input)
        .map(|(mut pipe, input)| scope.spawn(move || pipe.write_all(input.as_bytes())));

      let output = child.wait_with_output()?;

      if let Some(writer) = writer {
        match writer.join() {
          Ok(Ok(())) => {}
          // The child is allowed to exit without reading all of its input.
          Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
          Ok(Err(e)) => return Err(e),
          Err(_) => return Err(io::Error::other("stdin writer panicked")),
        }
      }

      Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        returncode: exit_status_code(output.status),
      })
    })
  }
}

/// Exit code, or the negated signal number for a signalled child.
fn exit_status_code(status: ExitStatus) -> i32 {
  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
      return -signal;
    }
  }
  status.code().unwrap_or(-1)
}

/// Runs `command` with the system launcher.
pub fn run_command(
  command: impl Into<CommandLine>,
  options: &RunOptions,
) -> io::Result<CommandResult> {
  run_command_with(&SystemLauncher, command, options)
}

/// Runs `command` through `launcher`.
///
/// Launch and I/O faults are returned unchanged unless `options.error_ok`
/// is set, in which case they are logged and a result holding only `cmd`
/// comes back instead.
pub fn run_command_with<L: ProcessLauncher + ?Sized>(
  launcher: &L,
  command: impl Into<CommandLine>,
  options: &RunOptions,
) -> io::Result<CommandResult> {
  let command = command.into();
  let effective = if options.enter_chroot {
    command.wrap_chroot()
  } else {
    command
  };
  let cmd = effective.to_line();

  if options.print_cmd {
    log::info!("RunCommand: {cmd}");
  } else {
    log::debug!("RunCommand: {cmd}");
  }

  let request = LaunchRequest {
    command: &effective,
    shell: options.shell,
    cwd: options.cwd.as_deref(),
    input: options.input.as_deref(),
    stdout: options.stdout,
    stderr: options.stderr,
  };

  match launcher.launch(&request) {
    Ok(output) => {
      log::debug!("{cmd} exited with {}", output.returncode);
      Ok(CommandResult {
        cmd,
        output: Some(output.stdout),
        error: Some(output.stderr),
        returncode: options.exit_code.then_some(output.returncode),
      })
    }
    Err(e) if options.error_ok => {
      log::warn!("{cmd}: {e}");
      Ok(CommandResult::partial(cmd))
    }
    Err(e) => Err(e),
  }
}
