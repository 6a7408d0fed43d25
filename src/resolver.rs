//! Hostname resolution
//!
//! Maps a raw hostname argument (or one of the `wired`/`hotspot`/`prompt`
//! shorthands) to a concrete target address using the configured
//! whitelists. A whitelist with more than one entry triggers an
//! interactive exact-match selection; the `prompt` shorthand reads a
//! fresh hostname at runtime and re-resolves it once.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::error::{WallyError, WallyResult};
use crate::prompt::Prompter;

/// Connectivity class of a resolved hostname, derived from whitelist
/// membership. `Hotspot` is what marks a run as needing a Wi-Fi switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPurpose {
    /// Member of the wired whitelist
    Wired,
    /// Member of the Wi-Fi hotspot whitelist
    Hotspot,
    /// A literal hostname outside both whitelists
    None,
}

impl HostPurpose {
    pub fn requires_network_switch(self) -> bool {
        self == HostPurpose::Hotspot
    }
}

/// Resolves hostname arguments against the configured whitelists.
pub struct HostResolver<'a> {
    config: &'a Config,
}

impl<'a> HostResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolve a raw hostname argument to a concrete hostname and its
    /// connectivity purpose.
    ///
    /// Resolution always terminates in a non-shorthand hostname: the
    /// `prompt` shorthand re-resolves exactly once, and a re-entered
    /// `prompt` token is taken literally.
    pub fn resolve(&self, raw: &str, prompter: &dyn Prompter) -> WallyResult<(String, HostPurpose)> {
        let hostname = self.resolve_concrete(raw, prompter, true)?;
        let purpose = self.classify(&hostname);
        Ok((hostname, purpose))
    }

    fn resolve_concrete(
        &self,
        raw: &str,
        prompter: &dyn Prompter,
        allow_prompt: bool,
    ) -> WallyResult<String> {
        if !self.config.accept_shorthands {
            return Ok(raw.to_string());
        }

        match raw {
            "wired" => self.pick(&self.config.wired_whitelist, "wired", prompter),
            "hotspot" => self.pick(&self.config.hotspot_whitelist, "hotspot", prompter),
            "prompt" if allow_prompt => {
                let line = prompter
                    .input("Please specify the hostname of the Wallaby you wish to connect to")?;
                self.resolve_concrete(line.trim(), prompter, false)
            }
            literal => Ok(literal.to_string()),
        }
    }

    /// Pick a hostname from a whitelist, prompting only when the
    /// whitelist holds more than one entry.
    fn pick(
        &self,
        whitelist: &BTreeSet<String>,
        purpose: &str,
        prompter: &dyn Prompter,
    ) -> WallyResult<String> {
        if whitelist.is_empty() {
            return Err(WallyError::EmptyWhitelist {
                purpose: purpose.to_string(),
            });
        }
        if whitelist.len() == 1 {
            // Sole member, no interaction needed
            return Ok(whitelist.iter().next().cloned().unwrap_or_default());
        }

        let items: Vec<String> = whitelist.iter().cloned().collect();
        let selection = prompter.select(
            &format!("Multiple {purpose} hostnames are configured, pick one"),
            &items,
        )?;

        // The terminal selector can only yield members; a scripted
        // prompter can return anything, so re-check membership rather
        // than silently accepting an unknown hostname.
        if whitelist.contains(&selection) {
            Ok(selection)
        } else {
            Err(WallyError::InvalidShorthand { input: selection })
        }
    }

    fn classify(&self, hostname: &str) -> HostPurpose {
        if self.config.hotspot_whitelist.contains(hostname) {
            HostPurpose::Hotspot
        } else if self.config.wired_whitelist.contains(hostname) {
            HostPurpose::Wired
        } else {
            HostPurpose::None
        }
    }
}
