//! Standalone noise palette widget.
//!
//! A lighter cousin of the playground: a row of chips jittered around
//! whatever `lastColor` currently holds, reshaped by one of five styles.
//! Nothing is committed to history; picking a chip copies it and publishes
//! it as the new `lastColor`.

use std::fmt;
use std::str::FromStr;

use colorfun_types::{Color, DEFAULT_BASE_COLOR, Hsl, NoiseAmount, PALETTE_SIZE, UnknownNoiseType, clamp};
use colorfun_util::Clipboard;
use rand::RngCore;
use rand::rngs::ThreadRng;
use rand::thread_rng;
use tracing::debug;

use crate::color_wall::WidgetMode;
use crate::palette::{Jitter, SwatchContext, jitter_base};
use crate::storage::SessionStorage;

/// Chips shown when embedded.
pub const MINI_CHIP_COUNT: usize = 6;

/// Reshaping applied after the jitter. Cold and warm rotate the hue by 20
/// degrees instead of forcing it into a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChipStyle {
    #[default]
    Pastel,
    Neon,
    Earthy,
    Cold,
    Warm,
}

impl ChipStyle {
    pub const ALL: [ChipStyle; 5] = [
        ChipStyle::Pastel,
        ChipStyle::Neon,
        ChipStyle::Earthy,
        ChipStyle::Cold,
        ChipStyle::Warm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pastel => "pastel",
            Self::Neon => "neon",
            Self::Earthy => "earthy",
            Self::Cold => "cold",
            Self::Warm => "warm",
        }
    }

    pub fn adjust(&self, hsl: Hsl) -> Hsl {
        let Hsl { h, s, l } = hsl;
        match self {
            Self::Pastel => Hsl::new(h, clamp(s * 0.65, 18.0, 65.0), clamp(l * 1.10, 55.0, 92.0)),
            Self::Neon => Hsl::new(h, clamp(s * 1.25, 70.0, 100.0), clamp(l, 45.0, 65.0)),
            Self::Earthy => Hsl::new(h + 15.0, clamp(s * 0.75, 20.0, 70.0), clamp(l * 0.95, 25.0, 70.0)),
            Self::Cold => Hsl::new(h - 20.0, clamp(s, 30.0, 90.0), l),
            Self::Warm => Hsl::new(h + 20.0, clamp(s, 30.0, 95.0), l),
        }
    }
}

impl fmt::Display for ChipStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChipStyle {
    type Err = UnknownNoiseType;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let tag = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == tag)
            .ok_or(UnknownNoiseType(tag))
    }
}

pub struct NoisePalette<R: RngCore = ThreadRng> {
    rng: R,
    mode: WidgetMode,
    noise: NoiseAmount,
    style: ChipStyle,
    chips: Vec<Color>,
    storage: SessionStorage,
}

impl NoisePalette<ThreadRng> {
    pub fn mount(mode: WidgetMode, storage: SessionStorage) -> Self {
        Self::mount_with_rng(mode, storage, thread_rng())
    }
}

impl<R: RngCore> NoisePalette<R> {
    /// Mount with the default noise and style and generate the first chips.
    pub fn mount_with_rng(mode: WidgetMode, storage: SessionStorage, rng: R) -> Self {
        let mut widget = Self {
            rng,
            mode,
            noise: NoiseAmount::DEFAULT,
            style: ChipStyle::default(),
            chips: Vec::new(),
            storage,
        };
        widget.reroll();
        widget
    }

    pub fn mode(&self) -> WidgetMode {
        self.mode
    }

    pub fn noise(&self) -> NoiseAmount {
        self.noise
    }

    pub fn style(&self) -> ChipStyle {
        self.style
    }

    pub fn chips(&self) -> &[Color] {
        &self.chips
    }

    /// Six chips embedded, a full palette otherwise.
    pub fn chip_count(&self) -> usize {
        match self.mode {
            WidgetMode::Mini => MINI_CHIP_COUNT,
            WidgetMode::Full => PALETTE_SIZE,
        }
    }

    pub fn set_noise(&mut self, value: f64) -> NoiseAmount {
        self.noise = NoiseAmount::from_f64(value);
        self.reroll();
        self.noise
    }

    pub fn set_style(&mut self, style: ChipStyle) {
        self.style = style;
        self.reroll();
    }

    /// Regenerate around the current `lastColor`, which other widgets may
    /// have changed since the previous roll.
    pub fn reroll(&mut self) -> &[Color] {
        let base = self.storage.last_color().unwrap_or(DEFAULT_BASE_COLOR);
        let context = SwatchContext {
            base: base.to_hsl(),
            noise: self.noise.as_f64(),
        };
        let style = self.style;
        let count = self.chip_count();
        let mut jitter = Jitter::new(&mut self.rng);
        self.chips = (0..count)
            .map(|_| style.adjust(jitter_base(&mut jitter, &context)).to_color())
            .collect();
        debug!(base = %base, style = %style, noise = self.noise.get(), "Rerolled noise palette");
        &self.chips
    }

    /// Copy a chip and publish it as the last color.
    pub fn pick(&mut self, index: usize, clipboard: &mut dyn Clipboard) -> Option<Color> {
        let color = *self.chips.get(index)?;
        clipboard.copy_text(&color.to_hex());
        self.storage.set_last_color(color);
        Some(color)
    }
}
