use std::fmt;
use std::str::FromStr;

/// Console families with a known game directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Atari,
    GB,
    GBA,
    NES,
    SNES,
    Genesis,
    PCE,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Atari,
        Platform::GB,
        Platform::GBA,
        Platform::NES,
        Platform::SNES,
        Platform::Genesis,
        Platform::PCE,
    ];

    /// Suffix of the game directory, as in `SonicTheHedgehog-Genesis`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Atari => "Atari",
            Platform::GB => "GB",
            Platform::GBA => "GBA",
            Platform::NES => "NES",
            Platform::SNES => "SNES",
            Platform::Genesis => "Genesis",
            Platform::PCE => "PCE",
        }
    }

    /// ROM file name inside the game directory.
    pub fn rom_name(&self) -> &'static str {
        match self {
            Platform::Atari => "rom.a26",
            Platform::GB => "rom.gb",
            Platform::GBA => "rom.gba",
            Platform::NES => "rom.nes",
            Platform::SNES => "rom.sfc",
            Platform::Genesis => "rom.md",
            Platform::PCE => "rom.pce",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown platform: {s}"))
    }
}
