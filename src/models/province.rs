use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provinces offered by the appointment form, stored by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Province {
    Manicaland,
    MatebelelandSouth,
    MatebelelandNorth,
    Midlands,
    MashonalandWest,
    MashonalandEast,
    Masvingo,
    Bulawayo,
    MashonalandCentral,
}

impl Province {
    pub const ALL: [Province; 9] = [
        Province::Manicaland,
        Province::MatebelelandSouth,
        Province::MatebelelandNorth,
        Province::Midlands,
        Province::MashonalandWest,
        Province::MashonalandEast,
        Province::Masvingo,
        Province::Bulawayo,
        Province::MashonalandCentral,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Province::Manicaland => "manicaland",
            Province::MatebelelandSouth => "matebeleland_south",
            Province::MatebelelandNorth => "matebeleland_north",
            Province::Midlands => "midlands",
            Province::MashonalandWest => "mashonaland_west",
            Province::MashonalandEast => "mashonaland_east",
            Province::Masvingo => "masvingo",
            Province::Bulawayo => "bulawayo",
            Province::MashonalandCentral => "mashonaland_central",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Province::Manicaland => "Manicaland",
            Province::MatebelelandSouth => "Matebeleland South",
            Province::MatebelelandNorth => "Matebeleland North",
            Province::Midlands => "Midlands",
            Province::MashonalandWest => "Mashonaland West",
            Province::MashonalandEast => "Mashonaland East",
            Province::Masvingo => "Masvingo",
            Province::Bulawayo => "Bulawayo",
            Province::MashonalandCentral => "Mashonaland Central",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Province {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Province::ALL
            .iter()
            .copied()
            .find(|p| p.slug() == slug)
            .ok_or_else(|| format!("unknown province '{}'", s))
    }
}
