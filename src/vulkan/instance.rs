use log::debug;
use vulkanalia::vk::{self, HasBuilder, InstanceV1_0};
use vulkanalia::Instance as VkInstance;

use crate::vulkan::config::Config;
use crate::vulkan::debug;
use crate::vulkan::entry::Entry;
use crate::vulkan::error::BootstrapError;
use crate::vulkan::requirements::{Requirements, PORTABILITY_MACOS_VERSION};

/// The connection between this program and the Vulkan driver.
///
/// Exactly one per process: created first, destroyed last, after every
/// dependent handle (device, messenger, surface) is gone. The instance
/// captures the driver state at creation time; later system-level changes to
/// layers or extensions are not reflected in it.
pub struct Instance {
    instance: VkInstance,
}

impl Instance {
    /// Creates the Vulkan instance.
    ///
    /// Validates the required layers first (fatal on a missing validation
    /// layer, before any handle exists), then reports instance extension
    /// coverage as an advisory. When validation is enabled, a debug messenger
    /// create-info is chained into the instance create-info so that instance
    /// creation and destruction themselves are covered by the callback.
    pub fn new(
        entry: &Entry,
        requirements: &Requirements,
        config: &Config,
    ) -> Result<Self, BootstrapError> {
        if cfg!(target_os = "macos") && entry.version()? < PORTABILITY_MACOS_VERSION {
            return Err(BootstrapError::PlatformUnsupported(format!(
                "macOS portability requires Vulkan {PORTABILITY_MACOS_VERSION}"
            )));
        }

        requirements.check_layer_support(&entry.available_layers()?)?;
        requirements.report_extension_coverage(&entry.available_extensions()?);

        let application_info = vk::ApplicationInfo::builder()
            .application_name(b"lumen\0")
            .application_version(vk::make_version(1, 0, 0))
            .engine_name(b"lumen\0")
            .engine_version(vk::make_version(1, 0, 0))
            .api_version(vk::make_version(1, 0, 0))
            .build();

        let layers = requirements
            .layers
            .iter()
            .map(|l| l.as_ptr())
            .collect::<Vec<_>>();
        let extensions = requirements
            .instance_extensions
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();

        let flags = if cfg!(target_os = "macos") {
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };

        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .flags(flags);

        let mut debug_info = debug::messenger_create_info();
        if config.validation {
            info = info.push_next(&mut debug_info);
        }

        debug!("Creating instance...");
        let instance = entry
            .create_instance(&info)
            .map_err(BootstrapError::InstanceCreationFailed)?;

        Ok(Self { instance })
    }

    /// Enumerates the physical devices visible to this instance, in driver
    /// order. An empty list means there is nothing to select from.
    pub fn enumerate_physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, BootstrapError> {
        let devices = unsafe { self.instance.enumerate_physical_devices() }?;
        if devices.is_empty() {
            return Err(BootstrapError::NoDeviceAvailable);
        }
        Ok(devices)
    }

    pub fn get(&self) -> &VkInstance {
        &self.instance
    }

    pub fn destroy(&self) {
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}
