use std::process::Command;
use tracing::debug;

/// Source of external-tool text output. Output is untrusted: callers parse it
/// defensively and treat `None` as "no information".
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String>;
}

/// Runs the real program and returns its stdout when it exits successfully.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        debug!(program, ?args, "running external command");
        let out = match Command::new(program).args(args).output() {
            Ok(o)  => o,
            Err(e) => {
                debug!(program, error = %e, "could not start command");
                return None;
            }
        };

        if !out.status.success() {
            debug!(program, status = ?out.status.code(), "command exited unsuccessfully");
            return None;
        }
        Some(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}
