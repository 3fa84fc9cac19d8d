//! Units of work handed to the worker pool.

use std::fmt;
use std::path::{Path, PathBuf};

/// How a job's process is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCommand {
    /// Program plus discrete arguments, passed straight to process creation.
    Argv { program: PathBuf, args: Vec<String> },
    /// A single command line interpreted by the platform shell
    /// (`sh -c` on Unix, `cmd /C` on Windows).
    ///
    /// Only for commands that rely on shell quoting, pipes or redirection.
    Shell { line: String },
}

impl JobCommand {
    /// Whether there is nothing to launch.
    pub fn is_empty(&self) -> bool {
        match self {
            JobCommand::Argv { program, .. } => program.as_os_str().is_empty(),
            JobCommand::Shell { line } => line.trim().is_empty(),
        }
    }
}

impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobCommand::Argv { program, args } => {
                write!(f, "{}", quote(&program.to_string_lossy()))?;
                for arg in args {
                    write!(f, " {}", quote(arg))?;
                }
                Ok(())
            }
            JobCommand::Shell { line } => f.write_str(line),
        }
    }
}

/// Quote an argument for display when it would otherwise be ambiguous.
fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
}

/// An immutable unit of work: one process invocation plus the identity used
/// to report on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    command: JobCommand,
    identity: String,
    source: Option<PathBuf>,
}

impl Job {
    /// Create a job from a command and an identity.
    pub fn new(command: JobCommand, identity: impl Into<String>) -> Self {
        Self {
            command,
            identity: identity.into(),
            source: None,
        }
    }

    /// Create a job that runs `program` with `args` directly.
    pub fn argv<I, S>(program: impl Into<PathBuf>, args: I, identity: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            JobCommand::Argv {
                program: program.into(),
                args: args.into_iter().map(Into::into).collect(),
            },
            identity,
        )
    }

    /// Create a job that runs `line` through the platform shell.
    pub fn shell(line: impl Into<String>, identity: impl Into<String>) -> Self {
        Self::new(JobCommand::Shell { line: line.into() }, identity)
    }

    /// Attach the source file that cleanup may delete once this job succeeds.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn command(&self) -> &JobCommand {
        &self.command
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_display_quotes_spaces() {
        let job = Job::argv(
            "ffmpeg",
            ["-i", "/in/My Movie.avi", "/out/plain.mkv"],
            "/in/My Movie.avi",
        );
        assert_eq!(
            job.command().to_string(),
            "ffmpeg -i \"/in/My Movie.avi\" /out/plain.mkv"
        );
    }

    #[test]
    fn test_shell_display_is_verbatim() {
        let job = Job::shell("echo 'hi' && exit 3", "a");
        assert_eq!(job.command().to_string(), "echo 'hi' && exit 3");
    }

    #[test]
    fn test_source_is_optional() {
        let job = Job::shell("true", "a");
        assert!(job.source().is_none());

        let job = job.with_source("/in/a.mkv");
        assert_eq!(job.source(), Some(Path::new("/in/a.mkv")));
        assert_eq!(job.identity(), "a");
    }

    #[test]
    fn test_empty_commands() {
        assert!(Job::shell("   ", "a").command().is_empty());
        assert!(Job::argv("", Vec::<String>::new(), "a").command().is_empty());
        assert!(!Job::argv("ffmpeg", Vec::<String>::new(), "a").command().is_empty());
    }
}
