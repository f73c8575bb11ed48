/// How the selector decides between several suitable physical devices.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeviceSelection {
    /// Take the first suitable device in enumeration order.
    #[default]
    FirstFit,
    /// Rate every suitable device and take the highest-scoring one.
    HighestScore,
}

/// Bootstrap configuration, built once in `main` and threaded explicitly
/// into every component constructor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Enables the validation layer and the debug messenger.
    pub validation: bool,
    pub window_title: &'static str,
    pub window_width: u32,
    pub window_height: u32,
    pub device_selection: DeviceSelection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validation: cfg!(debug_assertions),
            window_title: "Lumen",
            window_width: 800,
            window_height: 600,
            device_selection: DeviceSelection::FirstFit,
        }
    }
}
