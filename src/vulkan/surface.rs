use vulkanalia::vk::{self, KhrSurfaceExtension};
use vulkanalia::window as vk_window;

use crate::vulkan::error::BootstrapError;
use crate::vulkan::instance::Instance;
use crate::window::AppWindow;

/// The presentation target bound to our window.
///
/// Created right after the instance because it influences physical device
/// selection; destroyed after any device created against it and before the
/// instance. `vk::SurfaceKHR` usage is platform-agnostic but its creation is
/// not, so it goes through `vulkanalia::window`, which picks the right
/// platform extension for the winit window handle.
pub struct Surface {
    surface: vk::SurfaceKHR,
}

impl Surface {
    pub fn new(instance: &Instance, window: &AppWindow) -> Result<Self, BootstrapError> {
        let surface =
            unsafe { vk_window::create_surface(instance.get(), window.get(), window.get()) }
                .map_err(BootstrapError::SurfaceCreationFailed)?;
        Ok(Self { surface })
    }

    pub fn get(&self) -> vk::SurfaceKHR {
        self.surface
    }

    pub fn destroy(&self, instance: &Instance) {
        unsafe {
            instance.get().destroy_surface_khr(self.surface, None);
        }
    }
}
