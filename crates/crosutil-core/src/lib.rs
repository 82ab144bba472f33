pub mod cli;
pub mod config;
pub mod system;
pub mod utils;

pub use system::command::{
  CommandLine, CommandResult, ProcessLauncher, RunOptions, StreamMode, run_command,
  run_command_with,
};
