use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Backend operating profile. Parameters live server-side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    Aggressive,
    Balanced,
    Conservative,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Aggressive => "Agresif",
            Mode::Balanced => "Dengeli",
            Mode::Conservative => "Muhafazakar",
        }
    }
}
