//! SSH transport
//!
//! The deployer only sequences calls against the [`RemoteExecutor`]
//! port; this module provides the production implementation that shells
//! out to `ssh` for remote commands and `scp` for the upload, reusing
//! one destination for the entire run. A password, when supplied, is
//! injected by wrapping both commands with `sshpass`.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{WallyError, WallyResult};

/// Port for an established remote session.
pub trait RemoteExecutor {
    /// Run a shell command on the controller, returning its stdout.
    fn run(&self, command: &str) -> WallyResult<String>;

    /// Recursively upload a local file or directory into a remote directory.
    fn put(&self, local: &Path, remote_dir: &str) -> WallyResult<()>;
}

/// Port for establishing a remote session.
pub trait Connector {
    fn connect(
        &self,
        host: &str,
        user: &str,
        password: Option<&str>,
    ) -> WallyResult<Box<dyn RemoteExecutor>>;
}

/// Quote a string for the remote shell.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Session over the system `ssh`/`scp` binaries.
pub struct SshSession {
    /// `user@host`
    destination: String,
    password: Option<String>,
}

impl SshSession {
    fn new(host: &str, user: &str, password: Option<&str>) -> Self {
        Self {
            destination: format!("{user}@{host}"),
            password: password.map(|p| p.to_string()),
        }
    }

    /// Remote side of an `scp` transfer. The path is quoted because
    /// scp expands it through the remote shell, same as `run` commands.
    fn scp_target(&self, remote_dir: &str) -> String {
        format!("{}:{}", self.destination, shell_quote(remote_dir))
    }

    /// Base command, wrapped with `sshpass` when a password was given.
    fn base_command(&self, program: &str) -> Command {
        match &self.password {
            Some(password) => {
                let mut cmd = Command::new("sshpass");
                cmd.arg("-p").arg(password).arg(program);
                cmd
            }
            None => Command::new(program),
        }
    }
}

impl RemoteExecutor for SshSession {
    fn run(&self, command: &str) -> WallyResult<String> {
        let output = self
            .base_command("ssh")
            .arg(&self.destination)
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| WallyError::ConnectionFailed {
                host: self.destination.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(WallyError::RemoteCommandFailed {
                command: command.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn put(&self, local: &Path, remote_dir: &str) -> WallyResult<()> {
        let target = self.scp_target(remote_dir);
        let output = self
            .base_command("scp")
            .arg("-r")
            .arg(local)
            .arg(&target)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| WallyError::ConnectionFailed {
                host: self.destination.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(WallyError::RemoteCommandFailed {
                command: format!("scp -r {} {target}", local.display()),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Connector over the system `ssh` binary.
///
/// Establishing a session probes the controller with a trivial command
/// so authentication problems surface as [`WallyError::ConnectionFailed`]
/// before deployment starts.
pub struct SshConnector;

impl Connector for SshConnector {
    fn connect(
        &self,
        host: &str,
        user: &str,
        password: Option<&str>,
    ) -> WallyResult<Box<dyn RemoteExecutor>> {
        let session = SshSession::new(host, user, password);
        session.run("true").map_err(|e| WallyError::ConnectionFailed {
            host: host.to_string(),
            message: e.to_string(),
        })?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_wraps_in_single_quotes() {
        assert_eq!(shell_quote("/home/root/Documents"), "'/home/root/Documents'");
    }

    #[test]
    fn shell_quote_escapes_embedded_quotes() {
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn session_destination_includes_user() {
        let session = SshSession::new("192.168.124.1", "root", None);
        assert_eq!(session.destination, "root@192.168.124.1");
    }

    #[test]
    fn session_records_password_for_sshpass() {
        let session = SshSession::new("192.168.124.1", "root", Some("botball"));
        assert_eq!(session.password.as_deref(), Some("botball"));
    }

    #[test]
    fn scp_target_quotes_the_remote_path() {
        let session = SshSession::new("192.168.124.1", "root", None);
        assert_eq!(
            session.scp_target("/home/root/Documents/KISS/team a/line up/src"),
            "root@192.168.124.1:'/home/root/Documents/KISS/team a/line up/src'"
        );
    }
}
