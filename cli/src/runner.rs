use log::debug;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Run `binary` with inherited stdio and environment; return the code to exit with.
///
/// 1 when the child cannot be started, 0 when it reports no code (signal).
pub fn run_binary(binary: &Path, args: &[OsString]) -> i32 {
    debug!("exec {} with {} args", binary.display(), args.len());
    match Command::new(binary).args(args).status() {
        Ok(status) => status.code().unwrap_or(0),
        Err(e) => {
            eprintln!("Failed to start agentmap: {e}");
            1
        }
    }
}
