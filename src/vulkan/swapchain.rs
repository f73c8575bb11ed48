use log::debug;
use vulkanalia::vk::{self, KhrSurfaceExtension};

use crate::vulkan::error::BootstrapError;
use crate::vulkan::instance::Instance;
use crate::vulkan::surface::Surface;

/// What a device can offer for a given surface: extent bounds and image
/// counts, the supported format/color-space pairs, and the supported present
/// modes. Only valid for the (device, surface) pair it was queried against.
#[derive(Clone, Debug)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub fn query(
        instance: &Instance,
        device: vk::PhysicalDevice,
        surface: &Surface,
    ) -> Result<Self, BootstrapError> {
        let vk_instance = instance.get();
        unsafe {
            Ok(Self {
                capabilities: vk_instance
                    .get_physical_device_surface_capabilities_khr(device, surface.get())?,
                formats: vk_instance
                    .get_physical_device_surface_formats_khr(device, surface.get())?,
                present_modes: vk_instance
                    .get_physical_device_surface_present_modes_khr(device, surface.get())?,
            })
        }
    }

    /// A swapchain can be configured at all iff there is at least one format
    /// and one present mode.
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// The negotiated surface configuration handed to the render loop.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceConfig {
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
}

/// Applies the fixed preference rules to the reported support.
/// `support` must be adequate, which device selection guarantees.
pub fn negotiate(support: &SwapchainSupport, window_size: vk::Extent2D) -> SurfaceConfig {
    let config = SurfaceConfig {
        format: choose_surface_format(&support.formats),
        present_mode: choose_present_mode(&support.present_modes),
        extent: choose_extent(&support.capabilities, window_size),
    };
    debug!(
        "Negotiated surface configuration: format {:?}, color space {:?}, present mode {:?}, extent {:?}",
        config.format.format, config.format.color_space, config.present_mode, config.extent
    );
    config
}

/// Picks the first entry matching the preferred pair, B8G8R8A8 with
/// nonlinear sRGB, and otherwise falls back to the first reported format.
/// Never fails for a non-empty list.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .unwrap_or(formats[0])
}

/// Mailbox when available for its low latency, otherwise FIFO, which every
/// implementation is required to support.
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    present_modes
        .iter()
        .copied()
        .find(|m| *m == vk::PresentModeKHR::MAILBOX)
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

/// Resolves the swapchain extent against the window size.
///
/// When the driver reports the `u32::MAX` sentinel it is deferring the
/// choice to the window, so the window size is returned unmodified. When the
/// driver reports a concrete extent, the window size is clamped componentwise
/// into the supported range. Callers must re-evaluate this after a resize.
pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    window_size: vk::Extent2D,
) -> vk::Extent2D {
    if capabilities.current_extent.width == u32::MAX {
        window_size
    } else {
        vk::Extent2D {
            width: window_size.width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: window_size.height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}
