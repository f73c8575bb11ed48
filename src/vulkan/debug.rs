use std::ffi::CStr;
use std::os::raw::c_void;

use log::{debug, error, trace, warn};
use vulkanalia::vk::{self, ExtDebugUtilsExtension, HasBuilder};

use crate::vulkan::config::Config;
use crate::vulkan::entry::Entry;
use crate::vulkan::error::BootstrapError;
use crate::vulkan::instance::Instance;

/// The diagnostics bridge between the validation layer and our log output.
///
/// Its lifetime is strictly nested inside the instance's: installed right
/// after instance creation, uninstalled right before instance destruction.
/// `VK_EXT_debug_utils` is an extension, so its entry points are resolved
/// dynamically at instance scope; when they cannot be resolved the bridge
/// stays [`DebugMessenger::Unavailable`] and the application keeps running
/// without diagnostics.
#[derive(Debug)]
pub enum DebugMessenger {
    Installed(vk::DebugUtilsMessengerEXT),
    Unavailable,
}

impl DebugMessenger {
    /// Installs the debug callback. Requires a live instance.
    ///
    /// Every failure path degrades to `Unavailable` with a warning;
    /// diagnostics are never load-bearing.
    pub fn install(entry: &Entry, instance: &Instance, config: &Config) -> Self {
        if !config.validation {
            return Self::Unavailable;
        }

        let resolvable = entry
            .available_extensions()
            .map(|available| available.contains(&vk::EXT_DEBUG_UTILS_EXTENSION.name))
            .unwrap_or(false);
        if !resolvable {
            warn!("{} is not available; diagnostics are disabled.", vk::EXT_DEBUG_UTILS_EXTENSION.name);
            return Self::Unavailable;
        }

        let info = messenger_create_info();
        match unsafe { instance.get().create_debug_utils_messenger_ext(&info, None) } {
            Ok(messenger) => {
                debug!("Debug messenger installed.");
                Self::Installed(messenger)
            }
            Err(code) => {
                warn!("{}", BootstrapError::DiagnosticsInstallFailed(code));
                Self::Unavailable
            }
        }
    }

    /// Uninstalls the callback. Unconditional and best-effort: safe to call
    /// in any state, must happen before the instance is destroyed.
    pub fn uninstall(&mut self, instance: &Instance) {
        if let Self::Installed(messenger) = *self {
            unsafe {
                instance
                    .get()
                    .destroy_debug_utils_messenger_ext(messenger, None);
            }
        }
        *self = Self::Unavailable;
    }
}

pub(crate) fn messenger_create_info<'b>() -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'b> {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback))
}

/// The callback handed to the validation layer. `extern "system"` so the
/// (external) Vulkan loader can call it.
///
/// It only surfaces the message on the matching log level and always returns
/// `vk::FALSE`: the call that triggered the message must not be aborted.
extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let data = unsafe { *data };
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        error!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        warn!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        debug!("({:?}) {}", type_, message);
    } else {
        trace!("({:?}) {}", type_, message);
    }

    vk::FALSE
}
