use serde::{Deserialize, Serialize};

/// One of the fixed 7-color ball palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BallColor {
    Red,
    Blue,
    Green,
    Yellow,
    Cyan,
    Magenta,
    Orange,
}

impl BallColor {
    pub const PALETTE: [Self; 7] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Cyan,
        Self::Magenta,
        Self::Orange,
    ];

    /// Lowercase color name, stable across versions (used as a style key).
    pub const fn as_str(self) -> &'static str {
        use BallColor::*;
        match self {
            Red => "red",
            Blue => "blue",
            Green => "green",
            Yellow => "yellow",
            Cyan => "cyan",
            Magenta => "magenta",
            Orange => "orange",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_seven_distinct_colors() {
        let mut colors = BallColor::PALETTE;
        colors.sort();
        let unique = colors.windows(2).all(|pair| pair[0] != pair[1]);

        assert_eq!(colors.len(), 7);
        assert!(unique);
    }
}
