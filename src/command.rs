//! External command invocation shared by the CLI-backed collaborators.

use std::io;
use std::process::{Command, Stdio};

/// Exit status of one external operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exited with status 0.
    Succeeded,
    /// Exited non-zero, or was killed by a signal (`code` is `None`).
    Failed { code: Option<i32> },
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded)
    }
}

/// Render a command line for logs and dry runs.
pub fn render(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run `program` with `args`, inheriting stdout/stderr.
pub fn run(program: &str, args: &[String]) -> io::Result<CommandOutcome> {
    tracing::debug!(command = %render(program, args), "running");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .status()?;
    Ok(if status.success() {
        CommandOutcome::Succeeded
    } else {
        CommandOutcome::Failed {
            code: status.code(),
        }
    })
}

/// Run `program` with `args` and capture stdout as text.
///
/// Returns the outcome together with whatever was written to stdout.
pub fn capture(program: &str, args: &[String]) -> io::Result<(CommandOutcome, String)> {
    tracing::debug!(command = %render(program, args), "capturing");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;
    let outcome = if output.status.success() {
        CommandOutcome::Succeeded
    } else {
        CommandOutcome::Failed {
            code: output.status.code(),
        }
    };
    Ok((outcome, String::from_utf8_lossy(&output.stdout).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let args = vec!["storage".to_string(), "cp".to_string(), "a.tif".to_string()];
        assert_eq!(render("gcloud", &args), "gcloud storage cp a.tif");
        assert_eq!(render("true", &[]), "true");
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let result = run("planet-upload-no-such-program", &[]);
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(run("true", &[]).unwrap(), CommandOutcome::Succeeded);
        assert_eq!(
            run("false", &[]).unwrap(),
            CommandOutcome::Failed { code: Some(1) }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_stdout() {
        let (outcome, out) = capture("echo", &["gs://b/x.tif".to_string()]).unwrap();
        assert!(outcome.is_success());
        assert_eq!(out.trim(), "gs://b/x.tif");
    }
}
