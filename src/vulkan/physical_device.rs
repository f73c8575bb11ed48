use std::collections::HashSet;

use log::{debug, info};
use thiserror::Error;
use vulkanalia::vk::{self, InstanceV1_0, KhrSurfaceExtension};

use crate::vulkan::config::DeviceSelection;
use crate::vulkan::error::BootstrapError;
use crate::vulkan::instance::Instance;
use crate::vulkan::requirements::Requirements;
use crate::vulkan::surface::Surface;
use crate::vulkan::swapchain::SwapchainSupport;

/// Per-family capability flags, with presentation evaluated against the
/// target surface.
#[derive(Copy, Clone, Debug)]
pub struct QueueFamilySupport {
    pub graphics: bool,
    pub present: bool,
}

/// Maps each logical queue role to a family index, if one was found.
/// A single family may satisfy both roles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }
}

/// A complete role-to-family mapping for a suitable device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QueueSelection {
    pub graphics: u32,
    pub present: u32,
}

/// Scans the family list in order, recording the lowest index that supports
/// each role, and stops as soon as both roles are resolved. Deterministic for
/// a given input sequence.
pub fn find_queue_families(families: &[QueueFamilySupport]) -> QueueFamilyIndices {
    let mut indices = QueueFamilyIndices::default();
    for (index, family) in families.iter().enumerate() {
        if indices.graphics.is_none() && family.graphics {
            indices.graphics = Some(index as u32);
        }
        if indices.present.is_none() && family.present {
            indices.present = Some(index as u32);
        }
        if indices.is_complete() {
            break;
        }
    }
    indices
}

/// Why a device was skipped during selection.
#[derive(Debug, Error)]
pub enum Unsuitability {
    #[error("missing a graphics or presentation queue family")]
    MissingQueueFamily,
    #[error("missing required device extensions")]
    MissingDeviceExtension,
    #[error("insufficient swapchain support")]
    InadequateSwapchain,
}

/// Everything the selector needs to know about one enumerated device.
///
/// Valid only relative to the surface it was queried against; a different
/// surface requires a fresh profile.
#[derive(Clone, Debug)]
pub struct DeviceProfile {
    pub device: vk::PhysicalDevice,
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub geometry_shader: bool,
    pub max_image_dimension_2d: u32,
    pub queue_families: Vec<QueueFamilySupport>,
    pub extensions: HashSet<vk::ExtensionName>,
    /// Only queried once the swapchain extension is known to be present;
    /// swapchain queries are undefined without it.
    pub swapchain: Option<SwapchainSupport>,
}

impl DeviceProfile {
    pub fn query(
        instance: &Instance,
        device: vk::PhysicalDevice,
        surface: &Surface,
        requirements: &Requirements,
    ) -> Result<Self, BootstrapError> {
        let vk_instance = instance.get();
        let properties = unsafe { vk_instance.get_physical_device_properties(device) };
        let features = unsafe { vk_instance.get_physical_device_features(device) };

        let mut queue_families = Vec::new();
        let families = unsafe { vk_instance.get_physical_device_queue_family_properties(device) };
        for (index, family) in families.iter().enumerate() {
            let graphics = family.queue_flags.contains(vk::QueueFlags::GRAPHICS);
            let present = unsafe {
                vk_instance.get_physical_device_surface_support_khr(
                    device,
                    index as u32,
                    surface.get(),
                )
            }?;
            queue_families.push(QueueFamilySupport { graphics, present });
        }

        let extensions = unsafe { vk_instance.enumerate_device_extension_properties(device, None) }?
            .iter()
            .map(|e| e.extension_name)
            .collect::<HashSet<_>>();

        let has_required_extensions = requirements
            .device_extensions
            .iter()
            .all(|e| extensions.contains(*e));
        let swapchain = if has_required_extensions {
            Some(SwapchainSupport::query(instance, device, surface)?)
        } else {
            None
        };

        Ok(Self {
            device,
            name: properties.device_name.to_string(),
            device_type: properties.device_type,
            geometry_shader: features.geometry_shader == vk::TRUE,
            max_image_dimension_2d: properties.limits.max_image_dimension_2d,
            queue_families,
            extensions,
            swapchain,
        })
    }
}

/// Judges one device against the requirements: complete queue family
/// indices, the required device extensions, and a usable swapchain
/// configuration (at least one format and one present mode).
pub fn evaluate(
    profile: &DeviceProfile,
    requirements: &Requirements,
) -> Result<QueueSelection, Unsuitability> {
    let indices = find_queue_families(&profile.queue_families);
    let (Some(graphics), Some(present)) = (indices.graphics, indices.present) else {
        return Err(Unsuitability::MissingQueueFamily);
    };

    let supported = requirements
        .device_extensions
        .iter()
        .all(|e| profile.extensions.contains(*e));
    if !supported {
        return Err(Unsuitability::MissingDeviceExtension);
    }

    match &profile.swapchain {
        Some(support) if support.is_adequate() => Ok(QueueSelection { graphics, present }),
        _ => Err(Unsuitability::InadequateSwapchain),
    }
}

/// Rates a device for the [`DeviceSelection::HighestScore`] strategy:
/// discrete GPUs get a large bonus, resolution headroom breaks ties, and a
/// device without geometry shader support scores zero.
pub fn score(profile: &DeviceProfile) -> u32 {
    if !profile.geometry_shader {
        return 0;
    }
    let mut score = 0;
    if profile.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += 1000;
    }
    score + profile.max_image_dimension_2d
}

/// Picks a device from the enumerated profiles.
///
/// The default strategy is first-fit: the first suitable device in
/// enumeration order wins. `HighestScore` instead rates every suitable
/// device and takes the best one.
pub fn select(
    profiles: &[DeviceProfile],
    requirements: &Requirements,
    strategy: DeviceSelection,
) -> Result<(usize, QueueSelection), BootstrapError> {
    if profiles.is_empty() {
        return Err(BootstrapError::NoDeviceAvailable);
    }

    let mut suitable = Vec::new();
    for (index, profile) in profiles.iter().enumerate() {
        match evaluate(profile, requirements) {
            Ok(selection) => {
                if strategy == DeviceSelection::FirstFit {
                    info!("Selected physical device (`{}`).", profile.name);
                    return Ok((index, selection));
                }
                suitable.push((index, selection));
            }
            Err(reason) => {
                debug!("Skipping physical device (`{}`): {reason}", profile.name);
            }
        }
    }

    suitable
        .into_iter()
        .max_by_key(|(index, _)| score(&profiles[*index]))
        .map(|(index, selection)| {
            info!(
                "Selected physical device (`{}`) with score {}.",
                profiles[index].name,
                score(&profiles[index])
            );
            (index, selection)
        })
        .ok_or(BootstrapError::NoSuitableDevice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vulkanalia::vk::Handle;

    fn family(graphics: bool, present: bool) -> QueueFamilySupport {
        QueueFamilySupport { graphics, present }
    }

    fn adequate_swapchain() -> SwapchainSupport {
        SwapchainSupport {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            }],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        }
    }

    fn suitable_profile(name: &str) -> DeviceProfile {
        DeviceProfile {
            device: vk::PhysicalDevice::null(),
            name: name.to_string(),
            device_type: vk::PhysicalDeviceType::INTEGRATED_GPU,
            geometry_shader: true,
            max_image_dimension_2d: 4096,
            queue_families: vec![family(true, true)],
            extensions: HashSet::from([vk::KHR_SWAPCHAIN_EXTENSION.name]),
            swapchain: Some(adequate_swapchain()),
        }
    }

    fn requirements() -> Requirements {
        Requirements {
            layers: vec![],
            instance_extensions: vec![],
            device_extensions: vec![&vk::KHR_SWAPCHAIN_EXTENSION.name],
        }
    }

    #[test]
    fn queue_scan_records_the_lowest_index_per_role() {
        let indices = find_queue_families(&[
            family(false, false),
            family(true, false),
            family(true, true),
            family(false, true),
        ]);
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(2));
        assert!(indices.is_complete());
    }

    #[test]
    fn queue_scan_allows_one_family_to_satisfy_both_roles() {
        let indices = find_queue_families(&[family(true, true)]);
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, Some(0));
    }

    #[test]
    fn queue_scan_is_deterministic() {
        let families = [family(false, true), family(true, false), family(true, true)];
        assert_eq!(find_queue_families(&families), find_queue_families(&families));
    }

    #[test]
    fn queue_scan_reports_incomplete_roles_as_absent() {
        let indices = find_queue_families(&[family(true, false)]);
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, None);
        assert!(!indices.is_complete());
    }

    #[test]
    fn empty_format_list_makes_a_device_unsuitable() {
        let mut profile = suitable_profile("gpu");
        profile.swapchain = Some(SwapchainSupport {
            formats: vec![],
            ..adequate_swapchain()
        });

        let result = evaluate(&profile, &requirements());
        assert!(matches!(result, Err(Unsuitability::InadequateSwapchain)));
    }

    #[test]
    fn empty_present_mode_list_makes_a_device_unsuitable() {
        let mut profile = suitable_profile("gpu");
        profile.swapchain = Some(SwapchainSupport {
            present_modes: vec![],
            ..adequate_swapchain()
        });

        let result = evaluate(&profile, &requirements());
        assert!(matches!(result, Err(Unsuitability::InadequateSwapchain)));
    }

    #[test]
    fn missing_swapchain_extension_is_rejected_before_swapchain_queries() {
        let mut profile = suitable_profile("gpu");
        profile.extensions = HashSet::new();
        profile.swapchain = None;

        let result = evaluate(&profile, &requirements());
        assert!(matches!(result, Err(Unsuitability::MissingDeviceExtension)));
    }

    #[test]
    fn selecting_from_zero_devices_reports_none_available() {
        let result = select(&[], &requirements(), DeviceSelection::FirstFit);
        assert!(matches!(result, Err(BootstrapError::NoDeviceAvailable)));
    }

    #[test]
    fn selecting_with_no_suitable_device_reports_it() {
        let mut profile = suitable_profile("gpu");
        profile.extensions = HashSet::new();
        profile.swapchain = None;

        let result = select(
            &[profile],
            &requirements(),
            DeviceSelection::FirstFit,
        );
        assert!(matches!(result, Err(BootstrapError::NoSuitableDevice)));
    }

    #[test]
    fn first_fit_takes_the_first_suitable_device_in_order() {
        let mut unsuitable = suitable_profile("first");
        unsuitable.queue_families = vec![family(false, false)];
        let second = suitable_profile("second");
        let third = suitable_profile("third");

        let (index, selection) = select(
            &[unsuitable, second, third],
            &requirements(),
            DeviceSelection::FirstFit,
        )
        .unwrap();
        assert_eq!(index, 1);
        assert_eq!(selection.graphics, 0);
        assert_eq!(selection.present, 0);
    }

    #[test]
    fn scoring_zeroes_devices_without_geometry_shaders() {
        let mut profile = suitable_profile("gpu");
        profile.device_type = vk::PhysicalDeviceType::DISCRETE_GPU;
        profile.geometry_shader = false;
        assert_eq!(score(&profile), 0);
    }

    #[test]
    fn scoring_grants_the_discrete_bonus() {
        let integrated = suitable_profile("integrated");
        let mut discrete = suitable_profile("discrete");
        discrete.device_type = vk::PhysicalDeviceType::DISCRETE_GPU;

        assert_eq!(score(&integrated), 4096);
        assert_eq!(score(&discrete), 1000 + 4096);
    }

    #[test]
    fn highest_score_prefers_a_later_discrete_device() {
        let integrated = suitable_profile("integrated");
        let mut discrete = suitable_profile("discrete");
        discrete.device_type = vk::PhysicalDeviceType::DISCRETE_GPU;

        let (index, _) = select(
            &[integrated, discrete],
            &requirements(),
            DeviceSelection::HighestScore,
        )
        .unwrap();
        assert_eq!(index, 1);
    }
}
