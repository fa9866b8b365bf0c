//! External command descriptions.
//!
//! Every external collaborator (amixer, xtitle, bspc, xrandr, xdo, lemonbar,
//! the click shell) is described by a [`CommandSpec`] so tests can swap in
//! harmless stand-ins such as `cat` or `printf`.

use std::fmt;
use std::io;
use std::process::{Command, Stdio};

/// A program plus its arguments. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// A command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Build a [`Command`] ready to configure and spawn.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Run to completion and return stdout as text.
    ///
    /// A non-zero exit status is reported as an error.
    pub fn output_text(&self) -> io::Result<String> {
        let output = self.command().stdin(Stdio::null()).stderr(Stdio::null()).output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!("`{self}` exited with {}", output.status)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_words() {
        let spec = CommandSpec::new("xtitle").args(["-s", "-t", "150"]);
        assert_eq!(spec.program(), "xtitle");
        assert_eq!(spec.arguments(), ["-s", "-t", "150"]);
        assert_eq!(spec.to_string(), "xtitle -s -t 150");
    }

    #[test]
    fn test_output_text() {
        let text = CommandSpec::new("echo").arg("hello").output_text().unwrap();
        assert_eq!(text, "hello\n");
    }

    #[test]
    fn test_output_text_failure_status() {
        assert!(CommandSpec::new("false").output_text().is_err());
    }

    #[test]
    fn test_output_text_missing_program() {
        assert!(CommandSpec::new("definitely-not-a-real-program-xyz").output_text().is_err());
    }
}
