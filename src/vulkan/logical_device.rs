use std::collections::HashSet;

use log::debug;
use vulkanalia::vk::{self, DeviceV1_0, HasBuilder, InstanceV1_0};
use vulkanalia::Device;

use crate::vulkan::config::Config;
use crate::vulkan::error::BootstrapError;
use crate::vulkan::instance::Instance;
use crate::vulkan::physical_device::{DeviceProfile, QueueSelection};
use crate::vulkan::requirements::Requirements;

/// The application's configured view of the selected physical device,
/// exposing the graphics and presentation queues.
///
/// Destroyed before the instance. When both roles resolve to the same
/// family, both queue handles reference the same underlying queue; callers
/// may submit to it through either role, and any synchronization discipline
/// is theirs to provide.
pub struct LogicalDevice {
    device: Device,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
}

impl LogicalDevice {
    pub fn new(
        instance: &Instance,
        profile: &DeviceProfile,
        selection: QueueSelection,
        requirements: &Requirements,
        config: &Config,
    ) -> Result<Self, BootstrapError> {
        // One create-info per distinct family: graphics and present may alias.
        let unique_families = HashSet::from([selection.graphics, selection.present]);
        let queue_priorities = &[1.0];
        let queue_infos = unique_families
            .iter()
            .map(|index| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(*index)
                    .queue_priorities(queue_priorities)
                    .build()
            })
            .collect::<Vec<_>>();

        // Current implementations ignore device-level layers, but older ones
        // still enforce them, so mirror the instance layers here.
        let layers = if config.validation {
            requirements
                .layers
                .iter()
                .map(|l| l.as_ptr())
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };
        let extensions = requirements
            .device_extensions
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();
        let features = vk::PhysicalDeviceFeatures::builder();

        let info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layers)
            .enabled_extension_names(&extensions)
            .enabled_features(&features);

        debug!(
            "Creating logical device on `{}` (graphics family {}, present family {})...",
            profile.name, selection.graphics, selection.present
        );
        let device = unsafe { instance.get().create_device(profile.device, &info, None) }
            .map_err(BootstrapError::DeviceCreationFailed)?;

        let graphics_queue = unsafe { device.get_device_queue(selection.graphics, 0) };
        let present_queue = unsafe { device.get_device_queue(selection.present, 0) };

        Ok(Self {
            device,
            graphics_queue,
            present_queue,
        })
    }

    pub fn get(&self) -> &Device {
        &self.device
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    pub fn destroy(&self) {
        unsafe {
            self.device.destroy_device(None);
        }
    }
}
