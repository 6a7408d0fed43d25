//! Wally - deployment tool for KIPR Wallaby robot controllers
//!
//! Wally pushes a user's program to a Wallaby over SSH: it resolves the
//! target host from shorthand whitelists, joins the device's Wi-Fi
//! hotspot when necessary, then replaces the remote project directory
//! (backup, wipe, recreate, upload, link) in one sequential pass.

pub mod config;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod network;
pub mod prompt;
pub mod resolver;
pub mod transport;

// Re-exports for convenience
pub use config::Config;
pub use deploy::{DeploymentTarget, Language, RemoteDeployer};
pub use engine::{DeployEngine, DeployRequest};
pub use error::{WallyError, WallyResult};
pub use network::{normalize_ssid, NetworkControl, NetworkSwitcher, Platform, SwitchState};
pub use prompt::{InteractivePrompter, Prompter};
pub use resolver::{HostPurpose, HostResolver};
pub use transport::{Connector, RemoteExecutor, SshConnector};
