//! Property tests for Wally.
//!
//! Properties use randomized input generation to explore edge cases in
//! SSID normalization and working-directory construction.
//!
//! Run with: `cargo test --test properties`

use proptest::prelude::*;

use wally::deploy::DeploymentTarget;
use wally::resolver::HostPurpose;
use wally::normalize_ssid;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: exactly four ASCII digits always gain the "-wallaby" suffix.
    #[test]
    fn property_four_digit_ssid_gets_suffix(
        ssid in "[0-9]{4}"
    ) {
        prop_assert_eq!(normalize_ssid(&ssid, true), format!("{}-wallaby", ssid));
    }

    /// PROPERTY: anything that is not exactly four digits passes through
    /// unchanged, whatever its content.
    #[test]
    fn property_other_ssids_pass_through(
        ssid in "(?s).{0,32}"
    ) {
        let is_four_digits = ssid.len() == 4 && ssid.chars().all(|c| c.is_ascii_digit());
        prop_assume!(!is_four_digits);
        prop_assert_eq!(normalize_ssid(&ssid, true), ssid);
    }

    /// PROPERTY: with the suffix disabled, normalization is the identity.
    #[test]
    fn property_disabled_suffix_is_identity(
        ssid in "(?s).{0,32}"
    ) {
        prop_assert_eq!(normalize_ssid(&ssid, false), ssid);
    }

    /// PROPERTY: trailing path separators on owner and project never
    /// survive into the deployment target.
    #[test]
    fn property_target_names_have_no_trailing_separator(
        owner in "[A-Za-z0-9._-]{1,16}/{0,3}",
        project in "[A-Za-z0-9._-]{1,16}/{0,3}"
    ) {
        let target = DeploymentTarget::new("192.168.124.1", &owner, &project, HostPurpose::Wired);
        prop_assert!(!target.owner.ends_with('/'));
        prop_assert!(!target.project.ends_with('/'));
    }
}
