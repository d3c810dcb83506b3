//! Noise types and noise amounts: the two knobs that shape a generated palette.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Language;

/// Error returned when a noise type tag is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown noise type '{0}'")]
pub struct UnknownNoiseType(pub String);

/// Named policy that determines the shape of a generated palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseType {
    #[default]
    Pastel,
    Neon,
    Earthy,
    Muted,
    Dust,
    Deep,
    Bright,
    Mono,
    Analogous,
    Complementary,
    Split,
    Triadic,
    Cold,
    Warm,
    Ice,
    Sunset,
    Contrast,
    Shadow,
    Pop,
    Toxic,
    Vintage,
    Random,
}

impl NoiseType {
    /// Every variant in display order (the order of [`NoiseGroup::ALL`]).
    pub const ALL: [NoiseType; 22] = [
        NoiseType::Pastel,
        NoiseType::Neon,
        NoiseType::Earthy,
        NoiseType::Muted,
        NoiseType::Dust,
        NoiseType::Deep,
        NoiseType::Bright,
        NoiseType::Mono,
        NoiseType::Analogous,
        NoiseType::Complementary,
        NoiseType::Split,
        NoiseType::Triadic,
        NoiseType::Cold,
        NoiseType::Warm,
        NoiseType::Ice,
        NoiseType::Sunset,
        NoiseType::Contrast,
        NoiseType::Shadow,
        NoiseType::Pop,
        NoiseType::Toxic,
        NoiseType::Vintage,
        NoiseType::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pastel => "pastel",
            Self::Neon => "neon",
            Self::Earthy => "earthy",
            Self::Muted => "muted",
            Self::Dust => "dust",
            Self::Deep => "deep",
            Self::Bright => "bright",
            Self::Mono => "mono",
            Self::Analogous => "analogous",
            Self::Complementary => "complementary",
            Self::Split => "split",
            Self::Triadic => "triadic",
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Ice => "ice",
            Self::Sunset => "sunset",
            Self::Contrast => "contrast",
            Self::Shadow => "shadow",
            Self::Pop => "pop",
            Self::Toxic => "toxic",
            Self::Vintage => "vintage",
            Self::Random => "random",
        }
    }

    pub fn group(&self) -> NoiseGroup {
        match self {
            Self::Pastel | Self::Neon | Self::Earthy | Self::Muted | Self::Dust | Self::Deep | Self::Bright => {
                NoiseGroup::Character
            }
            Self::Mono | Self::Analogous | Self::Complementary | Self::Split | Self::Triadic => NoiseGroup::Harmony,
            Self::Cold | Self::Warm | Self::Ice | Self::Sunset => NoiseGroup::Temperature,
            Self::Contrast | Self::Shadow | Self::Pop => NoiseGroup::Contrast,
            Self::Toxic | Self::Vintage | Self::Random => NoiseGroup::Experimental,
        }
    }

    /// Display label. The tags are shared between languages.
    pub fn label(&self, _language: Language) -> &'static str {
        self.as_str()
    }

    /// One-line description shown next to the label.
    pub fn description(&self, language: Language) -> &'static str {
        let (en, es) = match self {
            Self::Pastel => ("soft, light, desaturated", "suave, claro, desaturado"),
            Self::Neon => ("maximum saturation, highly vibrant", "saturacion maxima, muy vibrante"),
            Self::Earthy => ("earthy, warm, darker", "tierra, calido, oscuro"),
            Self::Muted => ("grayish, editorial, quiet", "grisaceo, editorial, tranquilo"),
            Self::Dust => ("dusty, pale, near gray", "polvoriento, palido, casi gris"),
            Self::Deep => ("dark, rich, deep", "oscuro, rico, profundo"),
            Self::Bright => ("vivid, bright, energetic", "vivo, luminoso, energetico"),
            Self::Mono => (
                "monochromatic, only saturation and lightness vary",
                "monocromatico, solo varia saturacion y brillo",
            ),
            Self::Analogous => ("very close hues, very harmonious", "matices muy cercanos, muy armonioso"),
            Self::Complementary => (
                "your color and its opposite on the wheel",
                "tu color y su opuesto en el circulo",
            ),
            Self::Split => (
                "split opposite, subtler than complementary",
                "opuesto dividido, mas sutil que complementary",
            ),
            Self::Triadic => (
                "three zones 120 degrees apart, balanced",
                "tres zonas separadas 120 grados, equilibrado",
            ),
            Self::Cold => ("cool blues, cyans and violets", "azules, cianes y violetas frios"),
            Self::Warm => ("warm reds, oranges and yellows", "rojos, naranjas y amarillos calidos"),
            Self::Ice => ("very light cyan, almost icy white", "muy claro, cian, casi blanco frio"),
            Self::Sunset => (
                "pinks, reds and oranges, ignores the base color",
                "rosas, rojos y naranjas, ignora el color base",
            ),
            Self::Contrast => ("alternates very light and very dark", "alterna muy claro y muy oscuro"),
            Self::Shadow => ("everything darker than the base color", "todo mas oscuro que el color base"),
            Self::Pop => ("mixes neon and pastel in the same grid", "mezcla neon y pastel en el mismo grid"),
            Self::Toxic => ("aggressive acidic yellows and greens", "amarillos y verdes acidos perturbadores"),
            Self::Vintage => ("soft sepia, warm and desaturated", "sepia suave, desaturado y calido"),
            Self::Random => ("no constraints, pure chaos", "sin restricciones, caos puro"),
        };
        match language {
            Language::En => en,
            Language::Es => es,
        }
    }

    /// Pick uniformly among every type other than `current`.
    pub fn random_except<R: Rng + ?Sized>(current: NoiseType, rng: &mut R) -> NoiseType {
        let candidates: Vec<NoiseType> = Self::ALL.into_iter().filter(|t| *t != current).collect();
        candidates[rng.gen_range(0..candidates.len())]
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseType {
    type Err = UnknownNoiseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownNoiseType(s.to_string()))
    }
}

/// Section of the noise type picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseGroup {
    Character,
    Harmony,
    Temperature,
    Contrast,
    Experimental,
}

impl NoiseGroup {
    pub const ALL: [NoiseGroup; 5] = [
        NoiseGroup::Character,
        NoiseGroup::Harmony,
        NoiseGroup::Temperature,
        NoiseGroup::Contrast,
        NoiseGroup::Experimental,
    ];

    /// Member types, in picker order.
    pub fn types(&self) -> impl Iterator<Item = NoiseType> + '_ {
        NoiseType::ALL.into_iter().filter(move |t| t.group() == *self)
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Character, Language::En) => "character",
            (Self::Character, Language::Es) => "caracter",
            (Self::Harmony, Language::En) => "color harmony",
            (Self::Harmony, Language::Es) => "armonia cromatica",
            (Self::Temperature, Language::En) => "temperature",
            (Self::Temperature, Language::Es) => "temperatura",
            (Self::Contrast, Language::En) => "contrast and structure",
            (Self::Contrast, Language::Es) => "contraste y estructura",
            (Self::Experimental, _) => "experimental",
        }
    }
}

/// Dispersion magnitude in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u8")]
pub struct NoiseAmount(u8);

impl NoiseAmount {
    pub const MAX: u8 = 100;
    pub const DEFAULT: NoiseAmount = NoiseAmount(35);

    /// Clamps `value` into range.
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Rounds to the nearest integer and clamps. Non-finite input yields the default.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::DEFAULT;
        }
        Self(value.round().clamp(0.0, f64::from(Self::MAX)) as u8)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..=Self::MAX))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for NoiseAmount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f64> for NoiseAmount {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<NoiseAmount> for u8 {
    fn from(value: NoiseAmount) -> Self {
        value.0
    }
}

impl fmt::Display for NoiseAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn tags_round_trip_through_from_str() {
        for noise_type in NoiseType::ALL {
            assert_eq!(noise_type.as_str().parse::<NoiseType>().unwrap(), noise_type);
        }
        assert_eq!(
            "plaid".parse::<NoiseType>(),
            Err(UnknownNoiseType("plaid".to_string()))
        );
        assert!("Pastel".parse::<NoiseType>().is_err());
    }

    #[test]
    fn groups_partition_all_types() {
        let grouped: Vec<NoiseType> = NoiseGroup::ALL.iter().flat_map(|g| g.types()).collect();
        assert_eq!(grouped.len(), NoiseType::ALL.len());
        let unique: HashSet<NoiseType> = grouped.iter().copied().collect();
        assert_eq!(unique.len(), NoiseType::ALL.len());
        assert_eq!(grouped, NoiseType::ALL.to_vec());
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&NoiseType::Complementary).unwrap(), "\"complementary\"");
        let parsed: NoiseType = serde_json::from_str("\"sunset\"").unwrap();
        assert_eq!(parsed, NoiseType::Sunset);
    }

    #[test]
    fn random_except_never_returns_current() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_ne!(NoiseType::random_except(NoiseType::Neon, &mut rng), NoiseType::Neon);
        }
    }

    #[test]
    fn noise_amount_rounds_and_clamps() {
        assert_eq!(NoiseAmount::from_f64(42.6).get(), 43);
        assert_eq!(NoiseAmount::from_f64(-5.0).get(), 0);
        assert_eq!(NoiseAmount::from_f64(250.0).get(), 100);
        assert_eq!(NoiseAmount::from_f64(f64::NAN), NoiseAmount::DEFAULT);
        assert_eq!(NoiseAmount::new(200).get(), 100);

        let parsed: NoiseAmount = serde_json::from_str("180").unwrap();
        assert_eq!(parsed.get(), 100);
        assert_eq!(serde_json::to_string(&NoiseAmount::new(12)).unwrap(), "12");
    }

    #[test]
    fn every_type_has_descriptions() {
        for noise_type in NoiseType::ALL {
            for language in Language::ALL {
                assert!(!noise_type.description(language).is_empty());
            }
        }
    }
}
