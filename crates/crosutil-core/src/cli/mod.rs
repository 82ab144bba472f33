use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::system::command::{CommandLine, RunOptions, StreamMode};

#[derive(Debug, Parser)]
#[clap(name="crosutil", version=env!("CARGO_PKG_VERSION"), about=env!("CARGO_PKG_DESCRIPTION"), author=env!("CARGO_PKG_AUTHORS"))]
pub struct Opt {
  #[clap(subcommand)]
  pub command: Command,

  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// JSON file with run defaults and the default board
  #[arg(short, long, global = true)]
  pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Run a command, optionally inside the chroot
  #[clap(name = "run")]
  Run(RunArgs),

  /// List every file below a directory
  #[clap(name = "list-files")]
  ListFiles {
    /// Directory to walk
    root: PathBuf,
  },

  /// Print the src/scripts root containing the current directory
  #[clap(name = "src-root")]
  SrcRoot,

  /// Print the output image directory for a board and version
  #[clap(name = "image-dir")]
  ImageDir {
    #[clap(long)]
    board: Option<String>,
    version: String,
  },

  /// Extract CHROMEOS_VERSION_STRING from a file or stdin
  #[clap(name = "version")]
  Version { file: Option<PathBuf> },
}

#[derive(Debug, Args)]
pub struct RunArgs {
  /// Run through ./enter_chroot.sh
  #[clap(long)]
  pub enter_chroot: bool,

  /// Return a partial result instead of failing when the command cannot run
  #[clap(long)]
  pub error_ok: bool,

  /// Exit with the command's return code
  #[clap(long)]
  pub exit_code: bool,

  /// Interpret the command with /bin/sh
  #[clap(long)]
  pub shell: bool,

  /// Capture stdout and stderr and print them once the command finishes
  #[clap(long)]
  pub capture: bool,

  /// Log the command at debug level only
  #[clap(long)]
  pub quiet_cmd: bool,

  #[clap(long)]
  pub cwd: Option<PathBuf>,

  /// Text fed to the command's stdin
  #[clap(long)]
  pub input: Option<String>,

  /// A single command string, or the program followed by its arguments
  #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
  pub command: Vec<String>,
}

impl RunArgs {
  /// One argument is taken as a command string, several as an argv.
  pub fn command_line(&self) -> CommandLine {
    match self.command.as_slice() {
      [line] => CommandLine::Line(line.clone()),
      args => CommandLine::Args(args.to_vec()),
    }
  }

  /// Flags switch on options on top of `defaults`.
  pub fn apply(&self, defaults: RunOptions) -> RunOptions {
    let capture = |mode: StreamMode| {
      if self.capture {
        StreamMode::Capture
      } else {
        mode
      }
    };
    RunOptions {
      enter_chroot: defaults.enter_chroot || self.enter_chroot,
      error_ok: defaults.error_ok || self.error_ok,
      exit_code: defaults.exit_code || self.exit_code,
      shell: defaults.shell || self.shell,
      print_cmd: defaults.print_cmd && !self.quiet_cmd,
      cwd: self.cwd.clone().or(defaults.cwd),
      input: self.input.clone().or(defaults.input),
      stdout: capture(defaults.stdout),
      stderr: capture(defaults.stderr),
    }
  }
}
