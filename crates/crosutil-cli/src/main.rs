use anyhow::{Context, Result};
use clap::Parser;
use crosutil_core::{
  cli::{Command, Opt, RunArgs},
  config::Config,
  run_command,
  system::{fs::list_files, paths},
  utils::{crash, error::CrosError, exec_eval, files_eval, logging, version::get_chromeos_version},
};
use std::{
  fs,
  io::{self, Read},
  path::Path,
};

fn main() {
  human_panic::setup_panic!();
  let opt: Opt = Opt::parse();
  let _logger = match logging::init(opt.verbose.into()) {
    Ok(handle) => handle,
    Err(e) => {
      eprintln!("Error starting logger: {e}");
      std::process::exit(1);
    }
  };

  if let Err(e) = dispatch(opt) {
    crash(format!("{e:#}"), 1);
  }
}

fn dispatch(opt: Opt) -> Result<()> {
  let config = Config::load(opt.config.as_deref())?;

  match opt.command {
    Command::Run(args) => run(&args, &config),
    Command::ListFiles { root } => {
      let files = files_eval(
        list_files(&root),
        &format!("List files under {}", root.display()),
      );
      for file in files {
        println!("{}", file.display());
      }
      Ok(())
    }
    Command::SrcRoot => {
      println!("{}", paths::get_src_root()?.display());
      Ok(())
    }
    Command::ImageDir { board, version } => {
      let board = board.or(config.board).ok_or(CrosError::MissingBoard)?;
      println!(
        "{}",
        paths::get_output_image_dir(&board, &version)?.display()
      );
      Ok(())
    }
    Command::Version { file } => {
      let (source, text) = read_text(file.as_deref())?;
      let version =
        get_chromeos_version(Some(&text)).ok_or(CrosError::VersionNotFound(source))?;
      println!("{version}");
      Ok(())
    }
  }
}

fn run(args: &RunArgs, config: &Config) -> Result<()> {
  let options = args.apply(config.run.to_options());
  let result = exec_eval(
    run_command(args.command_line(), &options),
    "Command finished",
  );

  if let Some(output) = result.output() {
    print!("{output}");
  }
  if let Some(error) = result.error() {
    eprint!("{error}");
  }

  match result.returncode() {
    Some(0) | None => Ok(()),
    // Signalled children map to the shell's 128 + signal convention.
    Some(code) if code < 0 => std::process::exit(128 - code),
    Some(code) => std::process::exit(code),
  }
}

/// Contents of `file`, or of stdin when no file is given, with a label
/// naming where the text came from.
fn read_text(file: Option<&Path>) -> Result<(String, String)> {
  match file {
    Some(path) => {
      let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
      Ok((path.display().to_string(), text))
    }
    None => {
      let mut text = String::new();
      io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
      Ok((String::from("stdin"), text))
    }
  }
}
