//! Timer modes: named focus/break configurations.
//!
//! Presets are process-wide constant data. Custom modes are built at runtime
//! and validated before use.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerPhase;

/// Minimum allowed duration for any phase, in seconds.
pub const MIN_PHASE_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_custom: bool,
    /// Focus duration in seconds.
    pub focus_secs: u64,
    /// Short break duration in seconds.
    pub short_break_secs: u64,
    /// Long break duration in seconds.
    pub long_break_secs: u64,
    pub cycles_until_long_break: u32,
    /// Display accent; irrelevant to timing.
    pub accent_color: String,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

struct Preset {
    id: &'static str,
    name: &'static str,
    focus_min: u64,
    short_min: u64,
    long_min: u64,
    cycles: u32,
    accent: &'static str,
    disclaimer: &'static str,
}

const PRESETS: [Preset; 4] = [
    Preset {
        id: "traditional",
        name: "Traditional",
        focus_min: 25,
        short_min: 5,
        long_min: 15,
        cycles: 4,
        accent: "#7aa2f7",
        disclaimer: "Classic preset.",
    },
    Preset {
        id: "sustainable",
        name: "Sustainable Focus",
        focus_min: 50,
        short_min: 10,
        long_min: 30,
        cycles: 3,
        accent: "#9ece6a",
        disclaimer: "Inspired by sustainable productivity heuristics.",
    },
    Preset {
        id: "animedoro",
        name: "Animedoro",
        focus_min: 40,
        short_min: 20,
        long_min: 60,
        cycles: 2,
        accent: "#bb9af7",
        disclaimer: "Inspired by breaks spent on short episodes.",
    },
    Preset {
        id: "mangadoro",
        name: "Mangadoro",
        focus_min: 45,
        short_min: 15,
        long_min: 45,
        cycles: 3,
        accent: "#e0af68",
        disclaimer: "Inspired by breaks spent reading a chapter or two.",
    },
];

/// Ids of every fixed preset, in display order.
pub const PRESET_IDS: [&str; 4] = ["traditional", "sustainable", "animedoro", "mangadoro"];

impl Preset {
    fn to_mode(&self) -> Mode {
        Mode {
            id: self.id.to_string(),
            name: self.name.to_string(),
            is_custom: false,
            focus_secs: self.focus_min * 60,
            short_break_secs: self.short_min * 60,
            long_break_secs: self.long_min * 60,
            cycles_until_long_break: self.cycles,
            accent_color: self.accent.to_string(),
            disclaimer: Some(self.disclaimer.to_string()),
        }
    }
}

pub fn presets() -> Vec<Mode> {
    PRESETS.iter().map(Preset::to_mode).collect()
}

pub fn preset_by_id(id: &str) -> Option<Mode> {
    PRESETS.iter().find(|p| p.id == id).map(Preset::to_mode)
}

pub fn default_preset() -> Mode {
    PRESETS[0].to_mode()
}

pub fn is_preset_id(id: &str) -> bool {
    PRESET_IDS.contains(&id)
}

impl Mode {
    /// Custom mode with the traditional durations.
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug: String = name
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        Self {
            id: format!("custom_{slug}"),
            name,
            is_custom: true,
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            cycles_until_long_break: 4,
            accent_color: "#7aa2f7".into(),
            disclaimer: Some("Custom mode".into()),
        }
    }

    /// Configured duration of `phase`, in seconds.
    pub fn duration_for(&self, phase: TimerPhase) -> u64 {
        match phase {
            TimerPhase::Focus => self.focus_secs,
            TimerPhase::ShortBreak => self.short_break_secs,
            TimerPhase::LongBreak => self.long_break_secs,
        }
    }

    /// Whole focus minutes credited for one completed cycle.
    pub fn focus_minutes(&self) -> u64 {
        self.focus_secs / 60
    }

    /// Check the mode is usable by the timer.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "name is required"));
        }
        for (field, secs) in [
            ("focus_secs", self.focus_secs),
            ("short_break_secs", self.short_break_secs),
            ("long_break_secs", self.long_break_secs),
        ] {
            if secs < MIN_PHASE_SECS {
                return Err(ValidationError::invalid(
                    field,
                    format!("must be at least {MIN_PHASE_SECS} seconds"),
                ));
            }
        }
        if self.cycles_until_long_break < 1 {
            return Err(ValidationError::invalid(
                "cycles_until_long_break",
                "must be at least 1",
            ));
        }
        if !is_hex_color(&self.accent_color) {
            return Err(ValidationError::invalid(
                "accent_color",
                format!("'{}' is not a #RRGGBB color", self.accent_color),
            ));
        }
        Ok(())
    }
}

impl Default for Mode {
    fn default() -> Self {
        default_preset()
    }
}

pub(crate) fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Human readable duration: "25 min", "1h", "1h 30min".
pub fn format_duration(secs: u64) -> String {
    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{hours}h {rest}min")
    } else {
        format!("{hours}h")
    }
}
