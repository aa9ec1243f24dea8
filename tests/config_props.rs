//! Property-based tests for configuration validation.
//!
//! These verify the setter contracts with proptest-generated inputs:
//! positive values are always stored verbatim, everything else is
//! rejected without disturbing the store.
//!
//! Run with: cargo test --test config_props

use proptest::prelude::*;
use recorder_core::{ConfigStore, Configuration, ErrorClass};

proptest! {
    /// INVARIANT: positive dimensions are always accepted and stored verbatim
    #[test]
    fn resolution_accepts_positive_dimensions(
        width in 1i32..=8192,
        height in 1i32..=4320,
    ) {
        let store = ConfigStore::new(Configuration::default());
        prop_assert!(store.set_resolution(width, height).is_ok());

        let config = store.get();
        prop_assert_eq!(config.width, width as u32);
        prop_assert_eq!(config.height, height as u32);
    }

    /// INVARIANT: a non-positive width is rejected whatever the height is
    #[test]
    fn resolution_rejects_non_positive_width(
        width in i32::MIN..=0,
        height in any::<i32>(),
    ) {
        let store = ConfigStore::new(Configuration::default());
        prop_assert!(
            store.set_resolution(width, height).is_err(),
            "{}x{} should have been rejected", width, height
        );
        prop_assert_eq!(store.get(), Configuration::default());
    }

    /// INVARIANT: a non-positive height is rejected whatever the width is
    #[test]
    fn resolution_rejects_non_positive_height(
        width in any::<i32>(),
        height in i32::MIN..=0,
    ) {
        let store = ConfigStore::new(Configuration::default());
        prop_assert!(
            store.set_resolution(width, height).is_err(),
            "{}x{} should have been rejected", width, height
        );
        prop_assert_eq!(store.get(), Configuration::default());
    }

    /// INVARIANT: bitrate accepts exactly the positive range
    #[test]
    fn bitrate_accepts_exactly_positive_values(value in any::<i32>()) {
        let store = ConfigStore::new(Configuration::default());
        let result = store.set_bitrate(value);

        if value > 0 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(store.get().bitrate_kbps, value as u32);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(store.get().bitrate_kbps, 4000);
        }
    }

    /// INVARIANT: framerate accepts exactly the positive range
    #[test]
    fn framerate_accepts_exactly_positive_values(value in any::<i32>()) {
        let store = ConfigStore::new(Configuration::default());
        let result = store.set_framerate(value);

        if value > 0 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(store.get().framerate_fps, value as u32);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(store.get().framerate_fps, 30);
        }
    }

    /// INVARIANT: every validation failure carries a configuration-class code
    #[test]
    fn rejections_map_to_configuration_codes(value in i32::MIN..=0) {
        let store = ConfigStore::new(Configuration::default());
        let errors = [
            store.set_resolution(value, 1080).unwrap_err(),
            store.set_bitrate(value).unwrap_err(),
            store.set_framerate(value).unwrap_err(),
        ];

        for error in errors {
            prop_assert_eq!(error.class(), ErrorClass::Configuration);
            prop_assert!(
                (100..200).contains(&error.code()),
                "configuration code out of range: {}", error.code()
            );
        }
    }

    /// INVARIANT: a rejected update leaves the whole snapshot untouched
    #[test]
    fn rejected_update_preserves_snapshot(
        bitrate in 1i32..=100_000,
        bad in i32::MIN..=0,
    ) {
        let store = ConfigStore::new(Configuration::default());
        prop_assert!(store.set_bitrate(bitrate).is_ok());

        let before = store.get();
        prop_assert!(store.set_resolution(bad, bad).is_err());
        prop_assert!(store.set_framerate(bad).is_err());
        prop_assert_eq!(store.get(), before);
    }

    /// INVARIANT: builder methods preserve every value they set
    #[test]
    fn builders_preserve_values(
        width in 1u32..=8192,
        height in 1u32..=4320,
        bitrate in 1u32..=100_000,
        framerate in 1u32..=240,
        accel in any::<bool>(),
    ) {
        let config = Configuration::new()
            .with_resolution(width, height)
            .with_bitrate_kbps(bitrate)
            .with_framerate_fps(framerate)
            .with_hardware_acceleration(accel);

        prop_assert_eq!(config.width, width);
        prop_assert_eq!(config.height, height);
        prop_assert_eq!(config.bitrate_kbps, bitrate);
        prop_assert_eq!(config.framerate_fps, framerate);
        prop_assert_eq!(config.hardware_acceleration, accel);
        prop_assert!(config.validate().is_ok());
    }
}
