use crate::{
    rgb::{Hsl, Rgb},
    target::Target,
};

/// A representative color together with the number of samples it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    color: Rgb,
    population: u32,
}

impl Swatch {
    pub fn new(color: Rgb, population: u32) -> Swatch {
        Self { color, population }
    }

    pub fn rgb(self) -> Rgb {
        self.color
    }

    pub fn hsl(self) -> Hsl {
        self.color.hsl()
    }

    pub fn target(self) -> Target {
        Target::classify(self.hsl())
    }

    pub fn population(self) -> u32 {
        self.population
    }
}
