//! Wi-Fi network switching
//!
//! When the resolved target is only reachable through a Wallaby-hosted
//! hotspot, the operator's machine has to join that network first. The
//! [`NetworkSwitcher`] state machine prompts for an SSID, normalizes it,
//! and drives a platform-specific [`NetworkControl`] backend. Each
//! platform class gets its own backend so the stubs can grow real
//! implementations independently; today only the Windows backend
//! attempts anything (a `netsh wlan connect`), and every reserved
//! operation reports [`WallyError::NotImplemented`].

use std::process::{Command, Stdio};

use crate::config::Config;
use crate::error::{WallyError, WallyResult};
use crate::prompt::Prompter;
use crate::resolver::HostPurpose;

/// Suffix appended to four-digit SSIDs entered at the prompt. Wallabies
/// broadcast hotspots named `<serial>-wallaby`, so a bare serial number
/// is almost certainly missing it.
const WALLABY_SSID_SUFFIX: &str = "-wallaby";

/// Closed set of platform classes that can host a network switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux, the BSDs, and anything else POSIX-like
    Unix,
}

impl Platform {
    /// Identify the running platform, or `None` when network switching
    /// cannot be attempted here at all.
    pub fn detect() -> Option<Self> {
        match std::env::consts::OS {
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::MacOs),
            _ if cfg!(unix) => Some(Self::Unix),
            _ => None,
        }
    }

    /// Wi-Fi interface name configured for this platform class.
    pub fn interface<'a>(self, config: &'a Config) -> &'a str {
        match self {
            Self::Windows => &config.interfaces.windows,
            Self::MacOs => &config.interfaces.macos,
            Self::Unix => &config.interfaces.unix,
        }
    }

    /// Select the network-control backend for this platform.
    pub fn control(self) -> Box<dyn NetworkControl> {
        match self {
            Self::Windows => Box::new(NetshControl),
            Self::MacOs => Box::new(MacosControl),
            Self::Unix => Box::new(UnixControl),
        }
    }
}

/// Port for OS-level wireless control.
///
/// `interfaces` and `current_network` are reserved interface points; no
/// backend implements them yet, and callers treat their failure as an
/// expected outcome rather than a bug.
pub trait NetworkControl {
    /// Backend name, for operator-facing messages.
    fn name(&self) -> &'static str;

    /// Enumerate wireless interfaces.
    fn interfaces(&self) -> WallyResult<Vec<String>>;

    /// Report the SSID the interface is currently joined to.
    fn current_network(&self, interface: &str) -> WallyResult<String>;

    /// Join the named wireless network.
    fn connect(&self, interface: &str, ssid: &str) -> WallyResult<()>;
}

fn reserved(feature: &str) -> WallyError {
    WallyError::NotImplemented {
        feature: feature.to_string(),
    }
}

/// Windows backend driving `netsh wlan`.
pub struct NetshControl;

impl NetworkControl for NetshControl {
    fn name(&self) -> &'static str {
        "netsh"
    }

    fn interfaces(&self) -> WallyResult<Vec<String>> {
        Err(reserved("enumerating wireless interfaces with netsh"))
    }

    fn current_network(&self, _interface: &str) -> WallyResult<String> {
        Err(reserved("probing the current SSID with netsh"))
    }

    fn connect(&self, _interface: &str, ssid: &str) -> WallyResult<()> {
        // Works only when Windows already has a profile for the SSID.
        let status = Command::new("netsh")
            .args(["wlan", "connect", &format!("name=\"{ssid}\"")])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() => Ok(()),
            // No stored profile: connecting would need a generated XML
            // profile, which netsh cannot do in one shot.
            _ => Err(reserved("creation of netsh wireless profiles")),
        }
    }
}

/// macOS backend. Entirely reserved; the interface name to drive also
/// varies between machines (see `InterfaceConfig::macos`).
pub struct MacosControl;

impl NetworkControl for MacosControl {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn interfaces(&self) -> WallyResult<Vec<String>> {
        Err(reserved("enumerating wireless interfaces on macOS"))
    }

    fn current_network(&self, _interface: &str) -> WallyResult<String> {
        Err(reserved("probing the current SSID on macOS"))
    }

    fn connect(&self, _interface: &str, _ssid: &str) -> WallyResult<()> {
        Err(reserved("connecting to Wi-Fi on macOS"))
    }
}

/// POSIX backend. Entirely reserved.
pub struct UnixControl;

impl NetworkControl for UnixControl {
    fn name(&self) -> &'static str {
        "unix"
    }

    fn interfaces(&self) -> WallyResult<Vec<String>> {
        Err(reserved("enumerating wireless interfaces on UNIX-like OSes"))
    }

    fn current_network(&self, _interface: &str) -> WallyResult<String> {
        Err(reserved("probing the current SSID on UNIX-like OSes"))
    }

    fn connect(&self, _interface: &str, _ssid: &str) -> WallyResult<()> {
        Err(reserved("connecting to Wi-Fi on UNIX-like OSes"))
    }
}

/// Normalize an operator-entered SSID.
///
/// A four-character all-digit entry is taken as a bare Wallaby serial
/// and gets `-wallaby` appended; anything else is used verbatim.
pub fn normalize_ssid(input: &str, append_suffix: bool) -> String {
    if append_suffix && input.len() == 4 && input.chars().all(|c| c.is_ascii_digit()) {
        format!("{input}{WALLABY_SSID_SUFFIX}")
    } else {
        input.to_string()
    }
}

/// Lifecycle of a network switch within a single run. Transitions are
/// linear; a failure is terminal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Target is not behind a hotspot; nothing to do
    NotNeeded,
    /// Waiting for the operator to enter an SSID
    PendingSsid,
    /// Dispatching the platform connect operation
    Connecting,
    /// Joined the hotspot; deployment may proceed
    Connected,
    /// Deployment finished, trying to rejoin the previous network
    RestorePending,
    RestoreFailed,
}

/// Drives a [`NetworkControl`] backend through the switch lifecycle,
/// remembering the previously active network for restoration.
pub struct NetworkSwitcher {
    control: Option<Box<dyn NetworkControl>>,
    interface: String,
    append_suffix: bool,
    state: SwitchState,
    previous: Option<String>,
}

// Manual impl: the boxed backend has no Debug of its own.
impl std::fmt::Debug for NetworkSwitcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkSwitcher")
            .field("state", &self.state)
            .field("interface", &self.interface)
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}

impl NetworkSwitcher {
    /// Build a switcher for the resolved target.
    ///
    /// Fails with [`WallyError::UnsupportedPlatform`] when the target
    /// needs a switch but the platform cannot perform one. Must be
    /// checked before any SSH connection is attempted.
    pub fn prepare(
        purpose: HostPurpose,
        platform: Option<Platform>,
        config: &Config,
    ) -> WallyResult<Self> {
        if !purpose.requires_network_switch() {
            return Ok(Self {
                control: None,
                interface: String::new(),
                append_suffix: config.append_wallaby_suffix,
                state: SwitchState::NotNeeded,
                previous: None,
            });
        }

        let platform = platform.ok_or(WallyError::UnsupportedPlatform)?;
        Ok(Self::with_control(
            platform.control(),
            platform.interface(config),
            config.append_wallaby_suffix,
        ))
    }

    /// Build a switcher around an explicit backend. Used by tests.
    pub fn with_control(
        control: Box<dyn NetworkControl>,
        interface: &str,
        append_suffix: bool,
    ) -> Self {
        Self {
            control: Some(control),
            interface: interface.to_string(),
            append_suffix,
            state: SwitchState::PendingSsid,
            previous: None,
        }
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn is_needed(&self) -> bool {
        self.state != SwitchState::NotNeeded
    }

    /// Prompt for an SSID and join that network.
    ///
    /// On success the switcher is `Connected`; on failure the run is
    /// over, so the state is left at `Connecting`.
    pub fn engage(&mut self, prompter: &dyn Prompter) -> WallyResult<()> {
        let Some(control) = self.control.as_ref() else {
            return Ok(());
        };

        let entered =
            prompter.input("Please specify the SSID of the Wallaby you wish to connect to")?;
        let ssid = normalize_ssid(entered.trim(), self.append_suffix);
        if ssid != entered.trim() {
            println!("NOTICE: Appending \"{WALLABY_SSID_SUFFIX}\" to inputted SSID");
        }

        // Best effort: remember where we came from so restore() has a
        // target. The probe is a reserved operation on every backend.
        self.previous = control.current_network(&self.interface).ok();

        println!("Switching Wi-Fi networks ({})...", control.name());
        self.state = SwitchState::Connecting;
        control.connect(&self.interface, &ssid)?;
        self.state = SwitchState::Connected;
        Ok(())
    }

    /// Rejoin the network that was active before the switch.
    ///
    /// Reserved: with no backend able to probe the previous SSID this
    /// always fails with `NotImplemented`, which callers report as an
    /// expected outcome after an otherwise successful deployment.
    pub fn restore(&mut self) -> WallyResult<()> {
        let Some(control) = self.control.as_ref() else {
            return Ok(());
        };

        self.state = SwitchState::RestorePending;
        match self.previous.as_deref() {
            Some(previous) => match control.connect(&self.interface, previous) {
                Ok(()) => {
                    self.state = SwitchState::NotNeeded;
                    Ok(())
                }
                Err(e) => {
                    self.state = SwitchState::RestoreFailed;
                    Err(e)
                }
            },
            None => {
                self.state = SwitchState::RestoreFailed;
                Err(reserved("connecting back to previous Wi-Fi networks"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeControl {
        current: Option<String>,
        connect_ok: bool,
        connected: Rc<RefCell<Vec<String>>>,
    }

    impl FakeControl {
        fn new(current: Option<&str>, connect_ok: bool) -> (Self, Rc<RefCell<Vec<String>>>) {
            let connected = Rc::new(RefCell::new(Vec::new()));
            let control = Self {
                current: current.map(|s| s.to_string()),
                connect_ok,
                connected: Rc::clone(&connected),
            };
            (control, connected)
        }
    }

    impl NetworkControl for FakeControl {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn interfaces(&self) -> WallyResult<Vec<String>> {
            Ok(vec!["wl0".to_string()])
        }

        fn current_network(&self, _interface: &str) -> WallyResult<String> {
            self.current
                .clone()
                .ok_or_else(|| reserved("probing the current SSID"))
        }

        fn connect(&self, _interface: &str, ssid: &str) -> WallyResult<()> {
            self.connected.borrow_mut().push(ssid.to_string());
            if self.connect_ok {
                Ok(())
            } else {
                Err(reserved("fake connect"))
            }
        }
    }

    struct SsidPrompter(String);

    impl Prompter for SsidPrompter {
        fn input(&self, _message: &str) -> WallyResult<String> {
            Ok(self.0.clone())
        }

        fn select(&self, _message: &str, _items: &[String]) -> WallyResult<String> {
            panic!("switcher should never select");
        }
    }

    #[test]
    fn normalize_appends_suffix_to_four_digit_ssid() {
        assert_eq!(normalize_ssid("1234", true), "1234-wallaby");
    }

    #[test]
    fn normalize_leaves_non_digit_ssid_alone() {
        assert_eq!(normalize_ssid("12a4", true), "12a4");
    }

    #[test]
    fn normalize_leaves_other_lengths_alone() {
        assert_eq!(normalize_ssid("123", true), "123");
        assert_eq!(normalize_ssid("12345", true), "12345");
    }

    #[test]
    fn normalize_respects_disabled_suffix() {
        assert_eq!(normalize_ssid("1234", false), "1234");
    }

    #[test]
    fn detect_returns_a_platform_on_dev_hosts() {
        // Anything this test suite runs on is one of the three classes.
        assert!(Platform::detect().is_some());
    }

    #[test]
    fn prepare_skips_switch_for_wired_targets() {
        let config = Config::default();
        let switcher = NetworkSwitcher::prepare(HostPurpose::Wired, None, &config).unwrap();
        assert_eq!(switcher.state(), SwitchState::NotNeeded);
        assert!(!switcher.is_needed());
        // The switcher is debuggable despite the boxed backend
        assert!(format!("{switcher:?}").contains("NotNeeded"));
    }

    #[test]
    fn prepare_fails_for_hotspot_on_unsupported_platform() {
        let config = Config::default();
        let err = NetworkSwitcher::prepare(HostPurpose::Hotspot, None, &config).unwrap_err();
        assert!(matches!(err, WallyError::UnsupportedPlatform));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn engage_connects_with_normalized_ssid() {
        let (control, connected) = FakeControl::new(None, true);
        let mut switcher = NetworkSwitcher::with_control(Box::new(control), "wl0", true);
        switcher.engage(&SsidPrompter("1234".to_string())).unwrap();
        assert_eq!(switcher.state(), SwitchState::Connected);
        assert_eq!(*connected.borrow(), vec!["1234-wallaby".to_string()]);
    }

    #[test]
    fn engage_failure_is_terminal() {
        let (control, _) = FakeControl::new(None, false);
        let mut switcher = NetworkSwitcher::with_control(Box::new(control), "wl0", true);
        let err = switcher
            .engage(&SsidPrompter("robotics-lab".to_string()))
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(switcher.state(), SwitchState::Connecting);
    }

    #[test]
    fn restore_without_recorded_network_is_reserved() {
        let (control, _) = FakeControl::new(None, true);
        let mut switcher = NetworkSwitcher::with_control(Box::new(control), "wl0", true);
        switcher.engage(&SsidPrompter("1234".to_string())).unwrap();

        let err = switcher.restore().unwrap_err();
        assert!(matches!(err, WallyError::NotImplemented { .. }));
        assert_eq!(switcher.state(), SwitchState::RestoreFailed);
    }

    #[test]
    fn restore_rejoins_recorded_network() {
        let (control, connected) = FakeControl::new(Some("home-wifi"), true);
        let mut switcher = NetworkSwitcher::with_control(Box::new(control), "wl0", true);
        switcher.engage(&SsidPrompter("1234".to_string())).unwrap();
        switcher.restore().unwrap();
        assert_eq!(switcher.state(), SwitchState::NotNeeded);
        assert_eq!(
            *connected.borrow(),
            vec!["1234-wallaby".to_string(), "home-wifi".to_string()]
        );
    }
}
