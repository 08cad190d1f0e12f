use crate::rgb::Hsl;
use std::fmt;

const MIN_VIBRANT_SATURATION: f32 = 0.5;
const MIN_LIGHT_LIGHTNESS: f32 = 0.7;
const MAX_DARK_LIGHTNESS: f32 = 0.3;

/// One of the six swatch categories a color can fall into.
///
/// Saturation above 0.5 makes a color vibrant, anything else is muted. Lightness above 0.7 makes it light, below 0.3
/// dark, and anything in between normal. Every color belongs to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Target {
    LightVibrant,
    Vibrant,
    DarkVibrant,
    LightMuted,
    Muted,
    DarkMuted,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::LightVibrant,
        Target::Vibrant,
        Target::DarkVibrant,
        Target::LightMuted,
        Target::Muted,
        Target::DarkMuted,
    ];

    pub fn classify(hsl: Hsl) -> Target {
        let vibrant = hsl.saturation > MIN_VIBRANT_SATURATION;

        match (vibrant, hsl.lightness) {
            (true, l) if l > MIN_LIGHT_LIGHTNESS => Target::LightVibrant,
            (true, l) if l < MAX_DARK_LIGHTNESS => Target::DarkVibrant,
            (true, _) => Target::Vibrant,
            (false, l) if l > MIN_LIGHT_LIGHTNESS => Target::LightMuted,
            (false, l) if l < MAX_DARK_LIGHTNESS => Target::DarkMuted,
            (false, _) => Target::Muted,
        }
    }

    pub fn is_vibrant(self) -> bool {
        matches!(self, Target::LightVibrant | Target::Vibrant | Target::DarkVibrant)
    }

    /// The camel-cased name of the category, e.g. `lightVibrant`.
    pub fn name(self) -> &'static str {
        match self {
            Target::LightVibrant => "lightVibrant",
            Target::Vibrant => "vibrant",
            Target::DarkVibrant => "darkVibrant",
            Target::LightMuted => "lightMuted",
            Target::Muted => "muted",
            Target::DarkMuted => "darkMuted",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
