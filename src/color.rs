use std::fmt;

/// Color band assigned to the checked weeks of a given year of life
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AgeColor {
    /// First year of life
    Red,
    /// Age 1
    Yellow,
    /// Ages 2 through 6
    Green,
    /// Ages 7 through 11
    LightBlue,
    /// Ages 12 through 18
    Pink,
    /// Ages 19 through 39
    Purple,
    /// Ages 40 through 65
    Orange,
    /// Older than 65
    Brown,
}

impl AgeColor {
    pub const ALL: [AgeColor; 8] = [
        AgeColor::Red,
        AgeColor::Yellow,
        AgeColor::Green,
        AgeColor::LightBlue,
        AgeColor::Pink,
        AgeColor::Purple,
        AgeColor::Orange,
        AgeColor::Brown,
    ];

    /// Band for the checked weeks of year `age` of life
    pub fn for_age(age: i64) -> AgeColor {
        match age {
            ..=0 => AgeColor::Red,
            1 => AgeColor::Yellow,
            2..=6 => AgeColor::Green,
            7..=11 => AgeColor::LightBlue,
            12..=18 => AgeColor::Pink,
            19..=39 => AgeColor::Purple,
            40..=65 => AgeColor::Orange,
            66.. => AgeColor::Brown,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            AgeColor::Red => (0xff, 0x69, 0x61),
            AgeColor::Yellow => (0xfd, 0xfd, 0x96),
            AgeColor::Green => (0x77, 0xdd, 0x77),
            AgeColor::LightBlue => (0xae, 0xc6, 0xcf),
            AgeColor::Pink => (0xff, 0xd1, 0xdc),
            AgeColor::Purple => (0xb1, 0x9c, 0xd9),
            AgeColor::Orange => (0xff, 0xb3, 0x47),
            AgeColor::Brown => (0x83, 0x69, 0x53),
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            AgeColor::Red => "#ff6961",
            AgeColor::Yellow => "#fdfd96",
            AgeColor::Green => "#77dd77",
            AgeColor::LightBlue => "#aec6cf",
            AgeColor::Pink => "#ffd1dc",
            AgeColor::Purple => "#b19cd9",
            AgeColor::Orange => "#ffb347",
            AgeColor::Brown => "#836953",
        }
    }
}

impl fmt::Display for AgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Maps an age in years to its color band.  Every integer has exactly one
/// band.
pub fn color_for_age(age: i64) -> AgeColor {
    AgeColor::for_age(age)
}
