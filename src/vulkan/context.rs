use log::{debug, info, warn};
use vulkanalia::vk;

use crate::info_success;
use crate::vulkan::config::Config;
use crate::vulkan::debug::DebugMessenger;
use crate::vulkan::entry::Entry;
use crate::vulkan::error::BootstrapError;
use crate::vulkan::instance::Instance;
use crate::vulkan::logical_device::LogicalDevice;
use crate::vulkan::physical_device::{self, DeviceProfile};
use crate::vulkan::requirements::Requirements;
use crate::vulkan::surface::Surface;
use crate::vulkan::swapchain::{self, SurfaceConfig, SwapchainSupport};
use crate::window::AppWindow;

/// The bootstrapped Vulkan execution context.
///
/// Creation runs the strictly linear, blocking sequence: loader entry,
/// requirements, instance, debug messenger, surface, physical device
/// selection, logical device and queues, surface negotiation. Teardown runs
/// in reverse dependency order: logical device, debug messenger, surface,
/// instance. Everything here is effectively immutable once `new` returns;
/// the render loop consumes the handles through the accessors.
pub struct VulkanContext {
    _entry: Entry,
    instance: Instance,
    messenger: DebugMessenger,
    surface: Surface,
    profile: DeviceProfile,
    device: LogicalDevice,
    surface_config: SurfaceConfig,
}

impl VulkanContext {
    /// Runs the bootstrap. Any failure is reported immediately; handles
    /// created before the failing step are released before returning.
    pub fn new(window: &AppWindow, config: &Config) -> Result<Self, BootstrapError> {
        info!("Creating entry...");
        let entry = Entry::new()?;
        info_success!("Entry created! Loader version: {}", entry.version()?);

        let window_extensions = window.required_instance_extensions()?;
        let requirements = Requirements::for_config(config, &window_extensions, entry.version()?);
        debug!("Requirements: {requirements:?}");

        info!("Creating instance...");
        let instance = Instance::new(&entry, &requirements, config)?;
        info_success!("Instance created!");

        let mut messenger = DebugMessenger::install(&entry, &instance, config);

        info!("Creating surface...");
        let surface = match Surface::new(&instance, window) {
            Ok(surface) => surface,
            Err(err) => {
                messenger.uninstall(&instance);
                instance.destroy();
                return Err(err);
            }
        };
        info_success!("Surface created!");

        match Self::create_device(window, config, &instance, &surface, &requirements) {
            Ok((profile, device, surface_config)) => Ok(Self {
                _entry: entry,
                instance,
                messenger,
                surface,
                profile,
                device,
                surface_config,
            }),
            Err(err) => {
                messenger.uninstall(&instance);
                surface.destroy(&instance);
                instance.destroy();
                Err(err)
            }
        }
    }

    fn create_device(
        window: &AppWindow,
        config: &Config,
        instance: &Instance,
        surface: &Surface,
        requirements: &Requirements,
    ) -> Result<(DeviceProfile, LogicalDevice, SurfaceConfig), BootstrapError> {
        info!("Selecting physical device...");
        let devices = instance.enumerate_physical_devices()?;
        let mut profiles = Vec::with_capacity(devices.len());
        for device in devices {
            profiles.push(DeviceProfile::query(instance, device, surface, requirements)?);
        }
        debug!(
            "Enumerated physical devices: {:?}",
            profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );

        let (index, selection) =
            physical_device::select(&profiles, requirements, config.device_selection)?;
        let profile = profiles.swap_remove(index);
        if profile.device_type != vk::PhysicalDeviceType::DISCRETE_GPU {
            warn!("The selected physical device is not discrete.");
        }
        info_success!("Physical device selected: {}", profile.name);

        // Selection guarantees adequate swapchain support on the winner.
        let support: SwapchainSupport = match profile.swapchain.as_ref() {
            Some(support) => support.clone(),
            None => return Err(BootstrapError::NoSuitableDevice),
        };

        info!("Creating logical device...");
        let device = LogicalDevice::new(instance, &profile, selection, requirements, config)?;
        info_success!("Logical device created!");

        let surface_config = swapchain::negotiate(&support, window.size());
        info_success!("Surface configuration negotiated!");

        Ok((profile, device, surface_config))
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn device(&self) -> &LogicalDevice {
        &self.device
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_config(&self) -> SurfaceConfig {
        self.surface_config
    }

    pub fn device_name(&self) -> &str {
        &self.profile.name
    }

    /// Tears the context down in reverse dependency order. The instance goes
    /// last; getting this order wrong is undefined behavior at the driver
    /// boundary, not a recoverable error.
    pub fn destroy(&mut self) {
        info!("Destroying Vulkan context...");
        self.device.destroy();
        self.messenger.uninstall(&self.instance);
        self.surface.destroy(&self.instance);
        self.instance.destroy();
    }
}
