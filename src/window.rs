use vulkanalia::vk;
use vulkanalia::window as vk_window;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::vulkan::config::Config;
use crate::vulkan::error::BootstrapError;

/// Thin wrapper around the winit window: the bootstrap only needs its size,
/// its required Vulkan extensions, and its raw handles for surface creation.
pub struct AppWindow {
    window: Window,
}

impl AppWindow {
    pub fn new(event_loop: &EventLoop<()>, config: &Config) -> anyhow::Result<Self> {
        let window = WindowBuilder::new()
            .with_title(config.window_title)
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
            .with_resizable(false)
            .build(event_loop)?;
        Ok(Self { window })
    }

    pub fn get(&self) -> &Window {
        &self.window
    }

    /// The instance extensions the windowing system needs for presentation.
    /// An empty list means Vulkan cannot present on this platform at all.
    pub fn required_instance_extensions(
        &self,
    ) -> Result<Vec<&'static vk::ExtensionName>, BootstrapError> {
        let extensions = vk_window::get_required_instance_extensions(&self.window).to_vec();
        if extensions.is_empty() {
            return Err(BootstrapError::PlatformUnsupported(
                "the windowing system reported no Vulkan instance extensions".to_string(),
            ));
        }
        Ok(extensions)
    }

    pub fn size(&self) -> vk::Extent2D {
        let size = self.window.inner_size();
        vk::Extent2D {
            width: size.width,
            height: size.height,
        }
    }
}
