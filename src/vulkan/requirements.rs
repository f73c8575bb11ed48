use std::collections::HashSet;

use log::{debug, warn};
use vulkanalia::vk;
use vulkanalia::Version;

use crate::vulkan::config::Config;
use crate::vulkan::error::BootstrapError;

/// The one validation layer we ever enable.
pub const VALIDATION_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");

/// Required by the Vulkan SDK on macOS since 1.3.216.
pub const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

/// The fixed, declarative set of layers and extensions the bootstrap needs.
///
/// Built once from the configuration and the windowing system's extension
/// list, then threaded into instance creation, device selection, and logical
/// device creation so all three stay consistent.
#[derive(Clone, Debug)]
pub struct Requirements {
    /// Validation layers, enabled on the instance and mirrored onto the
    /// logical device. Empty unless validation is enabled.
    pub layers: Vec<vk::ExtensionName>,
    pub instance_extensions: Vec<&'static vk::ExtensionName>,
    pub device_extensions: Vec<&'static vk::ExtensionName>,
}

impl Requirements {
    pub fn for_config(
        config: &Config,
        window_extensions: &[&'static vk::ExtensionName],
        loader_version: Version,
    ) -> Self {
        let mut layers = Vec::new();
        if config.validation {
            layers.push(VALIDATION_LAYER);
        }

        let mut instance_extensions = window_extensions.to_vec();
        if config.validation {
            instance_extensions.push(&vk::EXT_DEBUG_UTILS_EXTENSION.name);
        }
        if cfg!(target_os = "macos") {
            // Allow querying extended physical device properties and
            // enumerating portability (MoltenVK) devices.
            instance_extensions.push(&vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name);
            instance_extensions.push(&vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name);
        }

        let mut device_extensions = vec![&vk::KHR_SWAPCHAIN_EXTENSION.name];
        if cfg!(target_os = "macos") && loader_version >= PORTABILITY_MACOS_VERSION {
            device_extensions.push(&vk::KHR_PORTABILITY_SUBSET_EXTENSION.name);
        }

        Self {
            layers,
            instance_extensions,
            device_extensions,
        }
    }

    /// Verifies that every required layer is present, by exact case-sensitive
    /// name. Must run before instance creation; a failure here is fatal and
    /// aborts startup before any handle exists.
    pub fn check_layer_support(
        &self,
        available: &HashSet<vk::ExtensionName>,
    ) -> Result<(), BootstrapError> {
        for layer in &self.layers {
            if !available.contains(layer) {
                return Err(BootstrapError::MissingValidationLayer(layer.to_string()));
            }
        }
        Ok(())
    }

    /// Advisory cross-reference of required vs. available instance
    /// extensions. Reports, never fails: the instance-creation call remains
    /// the authoritative pass/fail.
    pub fn report_extension_coverage(&self, available: &HashSet<vk::ExtensionName>) {
        debug!("Available instance extensions:");
        for extension in available {
            let used = self.instance_extensions.iter().any(|r| *r == extension);
            debug!(
                "  {} {}",
                extension,
                if used { "(used)" } else { "(unused)" }
            );
        }
        for required in &self.instance_extensions {
            if !available.contains(*required) {
                warn!("Required instance extension {required} is not reported as available.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulkan::config::Config;

    fn validation_config() -> Config {
        Config {
            validation: true,
            ..Config::default()
        }
    }

    #[test]
    fn layer_check_passes_when_every_required_layer_is_listed() {
        let requirements = Requirements::for_config(
            &validation_config(),
            &[&vk::KHR_SURFACE_EXTENSION.name],
            Version::new(1, 0, 0),
        );
        let available = HashSet::from([
            VALIDATION_LAYER,
            vk::ExtensionName::from_bytes(b"VK_LAYER_LUNARG_api_dump"),
        ]);

        assert!(requirements.check_layer_support(&available).is_ok());
        // No false positive: success implies verbatim membership.
        for layer in &requirements.layers {
            assert!(available.contains(layer));
        }
    }

    #[test]
    fn layer_check_fails_on_missing_validation_layer() {
        let requirements = Requirements::for_config(
            &validation_config(),
            &[&vk::KHR_SURFACE_EXTENSION.name],
            Version::new(1, 0, 0),
        );
        let available = HashSet::new();

        let result = requirements.check_layer_support(&available);
        assert!(matches!(
            result,
            Err(BootstrapError::MissingValidationLayer(_))
        ));
    }

    #[test]
    fn layer_check_is_exact_and_case_sensitive() {
        let requirements = Requirements::for_config(
            &validation_config(),
            &[&vk::KHR_SURFACE_EXTENSION.name],
            Version::new(1, 0, 0),
        );
        let available =
            HashSet::from([vk::ExtensionName::from_bytes(b"vk_layer_khronos_validation")]);

        assert!(requirements.check_layer_support(&available).is_err());
    }

    #[test]
    fn validation_toggles_layers_and_debug_extension() {
        let window_extensions: &[&'static vk::ExtensionName] = &[&vk::KHR_SURFACE_EXTENSION.name];

        let with = Requirements::for_config(
            &validation_config(),
            window_extensions,
            Version::new(1, 0, 0),
        );
        assert_eq!(with.layers, vec![VALIDATION_LAYER]);
        assert!(with
            .instance_extensions
            .contains(&&vk::EXT_DEBUG_UTILS_EXTENSION.name));

        let without = Requirements::for_config(
            &Config {
                validation: false,
                ..Config::default()
            },
            window_extensions,
            Version::new(1, 0, 0),
        );
        assert!(without.layers.is_empty());
        assert!(!without
            .instance_extensions
            .contains(&&vk::EXT_DEBUG_UTILS_EXTENSION.name));
    }

    #[test]
    fn swapchain_is_always_a_required_device_extension() {
        let requirements = Requirements::for_config(
            &Config::default(),
            &[&vk::KHR_SURFACE_EXTENSION.name],
            Version::new(1, 0, 0),
        );
        assert!(requirements
            .device_extensions
            .contains(&&vk::KHR_SWAPCHAIN_EXTENSION.name));
    }
}
