use std::io;

use crate::utils::crash;

/// Logs `logmsg` when the command ran, crashes with the OS error otherwise.
pub fn exec_eval<T>(result: io::Result<T>, logmsg: &str) -> T {
  match result {
    Ok(value) => {
      log::info!("{logmsg}");
      value
    }
    Err(e) => {
      let exit_code = e.raw_os_error().unwrap_or(1);
      crash(format!("{logmsg} ERROR: {e}"), exit_code);
    }
  }
}

pub fn files_eval<T>(result: io::Result<T>, logmsg: &str) -> T {
  match result {
    Ok(value) => {
      log::debug!("{logmsg}");
      value
    }
    Err(e) => {
      let exit_code = e.raw_os_error().unwrap_or(1);
      crash(format!("{logmsg} ERROR: {e}"), exit_code);
    }
  }
}
