//! External programs - Opener, recognizer and synthesizer commands

use std::process::Stdio;
use tokio::process::Command;

/// Placeholder in an argument that is replaced by the per-call value
pub const PLACEHOLDER: &str = "{}";

/// Characters `cmd.exe` treats as operators or expansions
const CMD_METACHARACTERS: &[char] = &['&', '|', '^', '<', '>', '(', ')', '%', '!', '"'];

/// Command interpreters that re-parse their arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Posix,
    Cmd,
}

/// An external program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build from a `[program, args...]` list as written in the config file
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).with_args(args.iter().cloned()))
    }

    /// The URL opener that ships with the current OS
    pub fn system_opener() -> Self {
        if cfg!(target_os = "windows") {
            Self::new("rundll32").with_args(["url.dll,FileProtocolHandler"])
        } else if cfg!(target_os = "macos") {
            Self::new("open")
        } else {
            Self::new("xdg-open")
        }
    }

    pub fn is_installed(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    /// The interpreter this program is, if it parses its arguments as a script
    pub fn shell(&self) -> Option<Shell> {
        let stem = std::path::Path::new(&self.program)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())?;
        match stem.as_str() {
            "sh" | "bash" | "dash" | "zsh" | "ksh" => Some(Shell::Posix),
            "cmd" => Some(Shell::Cmd),
            _ => None,
        }
    }

    /// Arguments for one call: `value` replaces every placeholder, or is appended when there is none.
    ///
    /// When the program is a shell the value is quoted so it stays a single literal word.
    pub fn args_for(&self, value: &str) -> Vec<String> {
        let shell = self.shell();
        let value = match shell {
            Some(Shell::Cmd) => escape_cmd(value),
            _ => value.to_string(),
        };

        if self.args.iter().any(|a| a.contains(PLACEHOLDER)) {
            let value = match shell {
                Some(Shell::Posix) => quote_posix(&value),
                _ => value,
            };
            self.args.iter().map(|a| a.replace(PLACEHOLDER, &value)).collect()
        } else {
            // A trailing argument after `sh -c script` is `$0`, never parsed
            let mut args = self.args.clone();
            args.push(value);
            args
        }
    }

    /// Async command with null stdio, ready to spawn
    pub fn tokio_command(&self, value: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args_for(value))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    /// Run to completion and return the exit status
    pub async fn status(&self, value: &str) -> Result<std::process::ExitStatus, std::io::Error> {
        self.tokio_command(value).status().await
    }
}

fn quote_posix(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn escape_cmd(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if CMD_METACHARACTERS.contains(&c) {
                format!("%{:02X}", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect()
}

impl std::fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_splits_program_and_args() {
        let argv = vec!["firefox".to_string(), "--new-tab".to_string()];
        let cmd = ExternalCommand::from_argv(&argv).unwrap();
        assert_eq!(cmd.program, "firefox");
        assert_eq!(cmd.args, vec!["--new-tab"]);
        assert!(ExternalCommand::from_argv(&[]).is_none());
    }

    #[test]
    fn value_is_appended_without_placeholder() {
        let cmd = ExternalCommand::new("espeak").with_args(["-v", "en"]);
        assert_eq!(cmd.args_for("hello"), vec!["-v", "en", "hello"]);
    }

    #[test]
    fn placeholder_is_substituted() {
        let cmd = ExternalCommand::new("firefox").with_args(["--search", "{}"]);
        assert_eq!(cmd.args_for("rust"), vec!["--search", "rust"]);
    }

    #[test]
    fn posix_shell_placeholder_is_single_quoted() {
        let cmd = ExternalCommand::new("/bin/sh").with_args(["-c", "surf {} &"]);
        assert_eq!(cmd.shell(), Some(Shell::Posix));
        assert_eq!(cmd.args_for("cats; rm -rf ~"), vec!["-c", "surf 'cats; rm -rf ~' &"]);
        assert_eq!(cmd.args_for("it's"), vec!["-c", "surf 'it'\\''s' &"]);
    }

    #[test]
    fn cmd_metacharacters_never_reach_the_argv() {
        let cmd = ExternalCommand::new("cmd").with_args(["/C", "start", ""]);
        assert_eq!(cmd.shell(), Some(Shell::Cmd));

        let args = cmd.args_for("https://example.com/a&calc|x^y");
        assert_eq!(args, vec!["/C", "start", "", "https://example.com/a%26calc%7Cx%5Ey"]);
        assert!(args.iter().all(|a| !a.contains(&['&', '|', '^'][..])));
    }

    #[test]
    fn system_opener_is_not_a_shell() {
        assert!(ExternalCommand::system_opener().shell().is_none());
        assert!(ExternalCommand::new("xdg-open").shell().is_none());
    }

    #[test]
    fn display_joins_argv() {
        let cmd = ExternalCommand::new("xdg-open").with_args(["--verbose"]);
        assert_eq!(cmd.to_string(), "xdg-open --verbose");
    }
}
