use thiserror::Error;
use vulkanalia::vk;

/// Everything that can abort the bootstrap sequence.
///
/// All variants are fatal except [`BootstrapError::DiagnosticsInstallFailed`],
/// which the diagnostics bridge downgrades to a warning: a missing debug
/// messenger never prevents the application from running.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Vulkan cannot be used on this machine: either the loader library is
    /// missing or the windowing system reported no instance extensions.
    #[error("Vulkan is not available on this platform: {0}")]
    PlatformUnsupported(String),

    #[error("validation layer `{0}` is not available")]
    MissingValidationLayer(String),

    #[error("failed to create the Vulkan instance")]
    InstanceCreationFailed(#[source] vk::ErrorCode),

    #[error("failed to install the debug messenger")]
    DiagnosticsInstallFailed(#[source] vk::ErrorCode),

    #[error("failed to create the window surface")]
    SurfaceCreationFailed(#[source] vk::ErrorCode),

    #[error("no Vulkan-capable physical devices are available")]
    NoDeviceAvailable,

    #[error("no physical device satisfies the requirements")]
    NoSuitableDevice,

    #[error("failed to create the logical device")]
    DeviceCreationFailed(#[source] vk::ErrorCode),

    /// A read-only capability query failed at the driver boundary.
    #[error("Vulkan call failed during capability enumeration")]
    Enumeration(#[from] vk::ErrorCode),
}
