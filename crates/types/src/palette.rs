use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{Color, NoiseAmount, NoiseType};

/// Number of swatches in every palette.
pub const PALETTE_SIZE: usize = 9;

/// Exactly nine colors, in grid order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette([Color; PALETTE_SIZE]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("palette must hold exactly 9 colors, found {0}")]
pub struct PaletteLengthError(pub usize);

impl Palette {
    pub fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Self(colors)
    }

    /// A palette of nine copies of `color`.
    pub fn uniform(color: Color) -> Self {
        Self([color; PALETTE_SIZE])
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.0.get(index).copied()
    }

    pub fn to_hex_strings(&self) -> Vec<String> {
        self.0.iter().map(Color::to_hex).collect()
    }
}

impl Index<usize> for Palette {
    type Output = Color;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = PaletteLengthError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        let len = colors.len();
        <[Color; PALETTE_SIZE]>::try_from(colors)
            .map(Self)
            .map_err(|_| PaletteLengthError(len))
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.0.to_vec()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One committed step of the playground: the base color, the palette that
/// was on screen, and the noise settings that produced it.
///
/// Field names on disk (`color`, `palette`, `noiseType`, `noise`) are shared
/// with existing saved histories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Base color at commit time.
    pub color: Color,
    /// Palette exactly as displayed; restored verbatim on navigation.
    pub palette: Palette,
    /// Noise policy that generated the palette.
    #[serde(rename = "noiseType")]
    pub noise_type: NoiseType,
    /// Noise amount that generated the palette.
    #[serde(rename = "noise", alias = "noiseAmount")]
    pub noise_amount: NoiseAmount,
}

impl HistoryEntry {
    pub fn new(color: Color, palette: Palette, noise_type: NoiseType, noise_amount: NoiseAmount) -> Self {
        Self {
            color,
            palette,
            noise_type,
            noise_amount,
        }
    }
}
