//! Deployment pipeline
//!
//! [`DeployEngine`] sequences one run end to end: resolve the hostname,
//! switch Wi-Fi networks when the target is behind a hotspot, validate
//! the language, establish the SSH session, run the remote deployment,
//! and finally try to restore the previous network. Every collaborator
//! is an injected port so the whole pipeline runs against fakes in
//! tests.

use std::path::PathBuf;

use crate::config::Config;
use crate::deploy::{DeploymentTarget, Language, RemoteDeployer};
use crate::error::WallyResult;
use crate::network::{NetworkSwitcher, Platform};
use crate::prompt::Prompter;
use crate::resolver::HostResolver;
use crate::transport::Connector;

/// Parsed inputs for one deployment run.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// Raw hostname argument; may be a shorthand
    pub hostname: String,
    /// Project owner on the controller
    pub owner: String,
    pub project: String,
    pub language: String,
    pub password: Option<String>,
    /// Local tree to upload; defaults to `./<project>`
    pub source: Option<PathBuf>,
}

/// One-shot deployment orchestrator.
pub struct DeployEngine<'a> {
    config: &'a Config,
    prompter: &'a dyn Prompter,
    connector: &'a dyn Connector,
    platform: Option<Platform>,
}

impl<'a> DeployEngine<'a> {
    pub fn new(
        config: &'a Config,
        prompter: &'a dyn Prompter,
        connector: &'a dyn Connector,
        platform: Option<Platform>,
    ) -> Self {
        Self {
            config,
            prompter,
            connector,
            platform,
        }
    }

    /// Run the full pipeline. The first error aborts the run; the
    /// caller maps it to an exit code.
    pub fn run(&self, request: &DeployRequest) -> WallyResult<()> {
        let resolver = HostResolver::new(self.config);
        let (hostname, purpose) = resolver.resolve(&request.hostname, self.prompter)?;
        let target = DeploymentTarget::new(&hostname, &request.owner, &request.project, purpose);

        // Platform support is checked here, before any SSH attempt.
        let mut switcher = NetworkSwitcher::prepare(purpose, self.platform, self.config)?;
        if switcher.is_needed() {
            switcher.engage(self.prompter)?;
        }

        let language = Language::parse(&request.language)?;

        println!("Connecting to Wallaby...");
        let executor =
            self.connector
                .connect(&hostname, &self.config.remote_user, request.password.as_deref())?;

        println!("Interacting with Wallaby...");
        let deployer = RemoteDeployer::new(executor.as_ref(), &self.config.remote_root);
        let source = request
            .source
            .clone()
            .unwrap_or_else(|| PathBuf::from(&target.project));
        deployer.deploy(&target, language, &source)?;

        // Reserved: currently always fails with NotImplemented, which
        // the CLI reports with exit code 3 after a complete deployment.
        if switcher.is_needed() {
            switcher.restore()?;
        }

        Ok(())
    }
}
