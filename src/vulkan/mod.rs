//! Vulkan bootstrap: capability enumeration, requirement validation,
//! diagnostics, device selection, and surface negotiation.

pub mod config;
pub mod context;
pub mod debug;
pub mod entry;
pub mod error;
pub mod instance;
pub mod logical_device;
pub mod physical_device;
pub mod requirements;
pub mod surface;
pub mod swapchain;
