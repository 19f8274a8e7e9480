//! Single-shot child process supervision.
//!
//! A run moves through `Supervisor` (configured) to `RunningChild` (launched)
//! to `ChildExit` (terminated). Each step consumes the previous one, so a
//! supervisor can launch at most one child and a child is waited on once.

use crate::environment::EffectiveEnvironment;
use crate::error::{Result, SupervisorError};
use crate::exit_codes;
use std::fmt;
use std::process::{Child, Command, ExitStatus, Stdio};

/// Program and arguments of the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: String,
    args: Vec<String>,
}

impl LaunchSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program name, resolved through `PATH` at launch.
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(&self.args);
        f.write_str(&shell_words::join(words))
    }
}

/// How the child terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Normal exit with a status code.
    Exited(i32),
    /// Killed by a signal (Unix only).
    Signaled(i32),
    /// The OS reported neither a code nor a signal.
    Unknown,
}

impl ChildExit {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }

        Self::Unknown
    }

    /// Status the supervisor should exit with.
    ///
    /// Codes are relayed verbatim; signals map to `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Self::Exited(code) => code,
            Self::Signaled(signal) => exit_codes::for_signal(signal),
            Self::Unknown => exit_codes::SIGNAL_BASE,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == Self::Exited(exit_codes::SUCCESS)
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with code {}", code),
            Self::Signaled(signal) => write!(f, "was killed by signal {}", signal),
            Self::Unknown => f.write_str("terminated abnormally"),
        }
    }
}

/// A configured supervisor that has not launched anything yet.
#[derive(Debug)]
pub struct Supervisor {
    env: EffectiveEnvironment,
}

impl Supervisor {
    pub fn new(env: EffectiveEnvironment) -> Self {
        Self { env }
    }

    /// Start the child with inherited standard streams.
    ///
    /// The effective environment is layered over the ambient one. Failure to
    /// start (missing executable, permissions, resource limits) is reported
    /// as [`SupervisorError::Launch`].
    pub fn launch(self, spec: &LaunchSpec) -> Result<RunningChild> {
        let mut command = Command::new(spec.program());
        command
            .args(spec.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        self.env.apply(&mut command);

        tracing::debug!(
            command = %spec,
            defaulted = ?self.env.filled(),
            "spawning child"
        );

        let child = command.spawn().map_err(|source| SupervisorError::Launch {
            command: spec.program().to_string(),
            source,
        })?;

        tracing::debug!(pid = child.id(), "child started");

        Ok(RunningChild {
            child,
            command: spec.program().to_string(),
        })
    }
}

/// The one child of a supervisor run.
#[derive(Debug)]
pub struct RunningChild {
    child: Child,
    command: String,
}

impl RunningChild {
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Block until the child terminates. There is no timeout.
    pub fn wait(mut self) -> Result<ChildExit> {
        let status = self.child.wait().map_err(|source| SupervisorError::Wait {
            command: self.command.clone(),
            source,
        })?;

        let exit = ChildExit::from_status(status);
        tracing::debug!(pid = self.child.id(), %exit, "child terminated");
        Ok(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{EnvDefault, configure_environment};
    use tempfile::TempDir;

    fn run(env: EffectiveEnvironment, spec: &LaunchSpec) -> Result<ChildExit> {
        Supervisor::new(env).launch(spec)?.wait()
    }

    fn sh(script: &str) -> LaunchSpec {
        LaunchSpec::new("sh", ["-c", script])
    }

    fn empty_env() -> EffectiveEnvironment {
        configure_environment(&[], |_| None)
    }

    #[test]
    fn test_launch_spec_display_quotes_args() {
        let spec = LaunchSpec::new("n8n", ["start", "--tunnel"]);
        assert_eq!(spec.to_string(), "n8n start --tunnel");

        let spec = sh("exit 2");
        assert_eq!(spec.to_string(), "sh -c 'exit 2'");
    }

    #[test]
    fn test_child_exit_codes() {
        assert_eq!(ChildExit::Exited(0).exit_code(), 0);
        assert_eq!(ChildExit::Exited(42).exit_code(), 42);
        assert_eq!(ChildExit::Signaled(9).exit_code(), 137);
        assert_eq!(ChildExit::Unknown.exit_code(), exit_codes::SIGNAL_BASE);

        assert!(ChildExit::Exited(0).is_success());
        assert!(!ChildExit::Exited(1).is_success());
        assert!(!ChildExit::Signaled(15).is_success());
    }

    #[test]
    fn test_child_exit_display() {
        assert_eq!(ChildExit::Exited(3).to_string(), "exited with code 3");
        assert_eq!(ChildExit::Signaled(9).to_string(), "was killed by signal 9");
        assert_eq!(ChildExit::Unknown.to_string(), "terminated abnormally");
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_relayed_exactly() {
        for code in [0, 1, 2, 127] {
            let exit = run(empty_env(), &sh(&format!("exit {}", code))).unwrap();
            assert_eq!(exit, ChildExit::Exited(code));
            assert_eq!(exit.exit_code(), code);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_termination_maps_to_128_plus_signal() {
        let exit = run(empty_env(), &sh("kill -9 $$")).unwrap();
        assert_eq!(exit, ChildExit::Signaled(9));
        assert_eq!(exit.exit_code(), 137);
    }

    #[test]
    fn test_missing_executable_is_launch_failure() {
        let spec = LaunchSpec::new("nonexistent_command_xyz_123", Vec::<String>::new());
        let err = Supervisor::new(empty_env()).launch(&spec).unwrap_err();

        assert!(matches!(
            err,
            SupervisorError::Launch { ref command, .. } if command == "nonexistent_command_xyz_123"
        ));
        assert_eq!(err.exit_code(), exit_codes::LAUNCH_FAILURE);
        assert!(err.to_string().contains("failed to start"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_launch_failure() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("not-executable.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();

        let spec = LaunchSpec::new(script.to_string_lossy(), Vec::<String>::new());
        let err = run(empty_env(), &spec).unwrap_err();
        assert!(matches!(err, SupervisorError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_child_receives_effective_environment() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("env.txt");

        let defaults = [
            EnvDefault::new("N8N_LAUNCH_TEST_FILLED", "from-default"),
            EnvDefault::new("N8N_LAUNCH_TEST_KEPT", "unused-default"),
        ];
        let env = configure_environment(&defaults, |name| {
            (name == "N8N_LAUNCH_TEST_KEPT").then(|| "from-env".into())
        });

        let script = format!(
            "printf '%s %s' \"$N8N_LAUNCH_TEST_FILLED\" \"$N8N_LAUNCH_TEST_KEPT\" > '{}'",
            out.display()
        );
        let exit = run(env, &sh(&script)).unwrap();

        assert!(exit.is_success());
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "from-default from-env"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_child_inherits_ambient_environment() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("path.txt");

        let script = format!("printf '%s' \"$PATH\" > '{}'", out.display());
        run(empty_env(), &sh(&script)).unwrap();

        let path = std::fs::read_to_string(&out).unwrap();
        assert!(!path.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_single_launch_per_run() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("launches.txt");

        let script = format!("echo launched >> '{}'; exit 1", marker.display());
        let exit = run(empty_env(), &sh(&script)).unwrap();
        assert_eq!(exit, ChildExit::Exited(1));

        let content = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_running_child_reports_pid() {
        let running = Supervisor::new(empty_env()).launch(&sh("exit 0")).unwrap();
        assert!(running.pid() > 0);
        assert!(running.wait().unwrap().is_success());
    }
}
