use std::collections::HashSet;

use vulkanalia::loader::{LibloadingLoader, LIBRARY};
use vulkanalia::vk::{self, EntryV1_0};
use vulkanalia::{Entry as VkEntry, Instance as VkInstance, Version, VkResult};

use crate::vulkan::error::BootstrapError;

/// Wraps the Vulkan loader entry point.
///
/// All queries here are pure reads against the host driver: safe to repeat,
/// no side effects. Results only change if the driver state itself changes,
/// which the bootstrap does not handle.
pub struct Entry {
    entry: VkEntry,
}

impl Entry {
    pub fn new() -> Result<Self, BootstrapError> {
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }
            .map_err(|e| BootstrapError::PlatformUnsupported(e.to_string()))?;
        let entry = unsafe { VkEntry::new(loader) }
            .map_err(|e| BootstrapError::PlatformUnsupported(e.to_string()))?;
        Ok(Self { entry })
    }

    pub fn version(&self) -> Result<Version, BootstrapError> {
        Ok(self.entry.version()?)
    }

    /// The instance layers the loader knows about, by exact name.
    pub fn available_layers(&self) -> Result<HashSet<vk::ExtensionName>, BootstrapError> {
        let layers = unsafe { self.entry.enumerate_instance_layer_properties() }?
            .iter()
            .map(|l| l.layer_name)
            .collect::<HashSet<_>>();
        Ok(layers)
    }

    /// The instance extensions the loader knows about, by exact name.
    pub fn available_extensions(&self) -> Result<HashSet<vk::ExtensionName>, BootstrapError> {
        let extensions = unsafe { self.entry.enumerate_instance_extension_properties(None) }?
            .iter()
            .map(|e| e.extension_name)
            .collect::<HashSet<_>>();
        Ok(extensions)
    }

    pub fn create_instance(&self, info: &vk::InstanceCreateInfo) -> VkResult<VkInstance> {
        unsafe { self.entry.create_instance(info, None) }
    }
}
