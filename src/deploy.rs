//! Remote deployment sequence
//!
//! Rebuilds the project directory on the controller through one
//! established session: backup the existing tree to a `-tmp` sibling,
//! wipe it, recreate the canonical layout, write the manifest, upload
//! the sources, and wire up the entry point. Steps are ordered and
//! non-transactional; the first failing step aborts the rest and
//! surfaces the remote error verbatim.

use std::path::Path;

use crate::error::{WallyError, WallyResult};
use crate::resolver::HostPurpose;
use crate::transport::{shell_quote, RemoteExecutor};

/// Directories recreated under the project root on every deployment
pub const LAYOUT_DIRS: [&str; 4] = ["bin", "src", "data", "include"];

/// Manifest written at the project root
pub const MANIFEST_FILE: &str = "project.manifest";

/// Name the controller's launcher expects to execute
pub const ENTRY_POINT: &str = "botball_user_program";

/// Script the entry point links to
pub const MAIN_SCRIPT: &str = "main.py";

/// Target runtime of the deployed project.
///
/// Only Python is supported currently; the parse failure happens before
/// any remote step executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
}

impl Language {
    pub fn parse(raw: &str) -> WallyResult<Self> {
        match raw.to_lowercase().as_str() {
            "python" => Ok(Self::Python),
            _ => Err(WallyError::UnsupportedLanguage {
                language: raw.to_string(),
            }),
        }
    }

    /// Display form written into the manifest
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Python => "Python",
        }
    }
}

/// Fully resolved deployment target, immutable after resolution.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    pub hostname: String,
    /// Project owner on the controller
    pub owner: String,
    pub project: String,
    pub requires_network_switch: bool,
}

impl DeploymentTarget {
    pub fn new(hostname: &str, owner: &str, project: &str, purpose: HostPurpose) -> Self {
        Self {
            hostname: hostname.to_string(),
            owner: owner.trim_end_matches('/').to_string(),
            project: project.trim_end_matches('/').to_string(),
            requires_network_switch: purpose.requires_network_switch(),
        }
    }
}

/// Manifest body: a simple key-value record, one field per line.
pub fn manifest_lines(language: Language, owner: &str) -> [String; 2] {
    [
        format!("language={}", language.display_name()),
        format!("user={owner}"),
    ]
}

/// Executes the ordered remote deployment steps through a
/// [`RemoteExecutor`].
pub struct RemoteDeployer<'a> {
    executor: &'a dyn RemoteExecutor,
    remote_root: &'a str,
}

impl<'a> RemoteDeployer<'a> {
    pub fn new(executor: &'a dyn RemoteExecutor, remote_root: &'a str) -> Self {
        Self {
            executor,
            remote_root,
        }
    }

    /// Project working directory on the controller.
    pub fn working_dir(&self, target: &DeploymentTarget) -> String {
        format!(
            "{}/{}/{}",
            self.remote_root.trim_end_matches('/'),
            target.owner,
            target.project
        )
    }

    /// Run the full deployment sequence for `target`, uploading `source`
    /// into the recreated `src/` directory.
    pub fn deploy(
        &self,
        target: &DeploymentTarget,
        language: Language,
        source: &Path,
    ) -> WallyResult<()> {
        let wd = self.working_dir(target);

        println!("Creating a backup directory...");
        // The backup is a safety copy; commonly fails on a first
        // deployment because the project directory does not exist yet.
        if let Err(e) = self
            .executor
            .run(&format!("cp -a {}/. {}/", shell_quote(&wd), shell_quote(&format!("{wd}-tmp"))))
        {
            eprintln!("WARNING: backup copy failed, continuing: {e}");
        }

        println!("Creating file & directory structure...");
        self.executor
            .run(&format!("rm -rf {}/", shell_quote(&wd)))?;

        let dirs = LAYOUT_DIRS
            .iter()
            .map(|d| shell_quote(&format!("{wd}/{d}")))
            .collect::<Vec<_>>()
            .join(" ");
        self.executor.run(&format!("mkdir -p {dirs}"))?;

        let [language_line, user_line] = manifest_lines(language, &target.owner);
        self.executor.run(&format!(
            "printf '%s\\n' {} {} > {}",
            shell_quote(&language_line),
            shell_quote(&user_line),
            shell_quote(&format!("{wd}/{MANIFEST_FILE}"))
        ))?;

        println!("Transferring files...");
        self.executor.put(source, &format!("{wd}/src"))?;

        println!("Creating necessary support files...");
        self.executor.run(&format!(
            "ln -s {} {}",
            shell_quote(&format!("{wd}/bin/{MAIN_SCRIPT}")),
            shell_quote(&format!("{wd}/bin/{ENTRY_POINT}"))
        ))?;
        self.executor.run(&format!(
            "chmod +x {}",
            shell_quote(&format!("{wd}/bin/{MAIN_SCRIPT}"))
        ))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parse_is_case_insensitive() {
        assert_eq!(Language::parse("python").unwrap(), Language::Python);
        assert_eq!(Language::parse("Python").unwrap(), Language::Python);
        assert_eq!(Language::parse("PYTHON").unwrap(), Language::Python);
    }

    #[test]
    fn language_parse_rejects_everything_else() {
        let err = Language::parse("c").unwrap_err();
        assert!(matches!(err, WallyError::UnsupportedLanguage { language } if language == "c"));
        assert_eq!(Language::parse("c").unwrap_err().exit_code(), 3);
    }

    #[test]
    fn target_strips_trailing_separators() {
        let target = DeploymentTarget::new("192.168.124.1", "demo/", "lineup//", HostPurpose::Wired);
        assert_eq!(target.owner, "demo");
        assert_eq!(target.project, "lineup");
        assert!(!target.requires_network_switch);
    }

    #[test]
    fn hotspot_target_requires_switch() {
        let target = DeploymentTarget::new("192.168.125.1", "demo", "lineup", HostPurpose::Hotspot);
        assert!(target.requires_network_switch);
    }

    #[test]
    fn manifest_lines_use_display_language() {
        let [language, user] = manifest_lines(Language::Python, "demo");
        assert_eq!(language, "language=Python");
        assert_eq!(user, "user=demo");
    }

    struct NullExecutor;

    impl RemoteExecutor for NullExecutor {
        fn run(&self, _command: &str) -> WallyResult<String> {
            Ok(String::new())
        }

        fn put(&self, _local: &Path, _remote_dir: &str) -> WallyResult<()> {
            Ok(())
        }
    }

    #[test]
    fn working_dir_joins_root_owner_project() {
        let executor = NullExecutor;
        let deployer = RemoteDeployer::new(&executor, "/home/root/Documents/KISS/");
        let target = DeploymentTarget::new("192.168.124.1", "demo", "lineup", HostPurpose::Wired);
        assert_eq!(
            deployer.working_dir(&target),
            "/home/root/Documents/KISS/demo/lineup"
        );
    }
}
