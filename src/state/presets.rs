//! Session modes and preset durations

use serde::{Deserialize, Serialize};

/// Session mode selecting one of the preset durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Short,
    Long,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Short => "short",
            Mode::Long => "long",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Focus
    }
}

/// Upper bound on preset minutes (24 hours). Anything longer is nonsense
/// for a session timer and would risk overflowing the seconds conversion.
pub const MAX_PRESET_MINUTES: u64 = 1440;

/// Preset minute values per mode, replaceable at runtime through the
/// settings endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presets {
    /// Focus session length in minutes
    pub focus: u64,
    /// Short break length in minutes
    pub short: u64,
    /// Long break length in minutes
    pub long: u64,
}

impl Presets {
    pub fn new(focus: u64, short: u64, long: u64) -> Self {
        Self { focus, short, long }
    }

    /// Minutes configured for the given mode
    pub fn minutes(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Focus => self.focus,
            Mode::Short => self.short,
            Mode::Long => self.long,
        }
    }

    /// Reject presets containing a zero-minute or oversized session. The
    /// countdown core accepts any duration; the boundary filters nonsense
    /// input.
    pub fn validate(&self) -> Result<(), String> {
        for (name, minutes) in [
            ("focus", self.focus),
            ("short", self.short),
            ("long", self.long),
        ] {
            if minutes == 0 {
                return Err(format!("preset '{}' must be at least 1 minute", name));
            }
            if minutes > MAX_PRESET_MINUTES {
                return Err(format!(
                    "preset '{}' must be at most {} minutes",
                    name, MAX_PRESET_MINUTES
                ));
            }
        }
        Ok(())
    }
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            focus: 25,
            short: 5,
            long: 15,
        }
    }
}
