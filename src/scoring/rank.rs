use strum_macros::{Display, EnumIter};

/// Letter grade for an aggregate relic score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Rank {
    #[strum(serialize = "ACE")]
    Ace,
    #[strum(serialize = "SSS")]
    Sss,
    #[strum(serialize = "SS")]
    Ss,
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    /// Thresholds are closed at the bottom and open at the top
    pub fn from_aggregate(aggregate: f64) -> Self {
        match aggregate {
            a if a >= 90.0 => Rank::Ace,
            a if a >= 85.0 => Rank::Sss,
            a if a >= 80.0 => Rank::Ss,
            a if a >= 70.0 => Rank::S,
            a if a >= 60.0 => Rank::A,
            a if a >= 50.0 => Rank::B,
            a if a >= 40.0 => Rank::C,
            _ => Rank::D,
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            Rank::Ace => [255, 0, 63],
            Rank::Sss => [255, 115, 0],
            Rank::Ss => [255, 185, 15],
            Rank::S => [255, 255, 0],
            Rank::A => [72, 118, 255],
            Rank::B => [135, 206, 235],
            Rank::C => [255, 128, 153],
            Rank::D => [190, 190, 190],
        }
    }
}
