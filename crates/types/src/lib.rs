//! Shared data model for the colorfun playground: colors, noise settings,
//! palettes, history entries and the named-color catalog.

pub mod catalog;
pub mod color;
pub mod language;
pub mod noise;
pub mod palette;

pub use catalog::{NamedColor, NamedColorCatalog, NamedColorGroup};
pub use color::{Color, ColorParseError, DEFAULT_BASE_COLOR, Hsl, clamp, wrap_hue};
pub use language::{Language, UnsupportedLanguage};
pub use noise::{NoiseAmount, NoiseGroup, NoiseType, UnknownNoiseType};
pub use palette::{HistoryEntry, PALETTE_SIZE, Palette, PaletteLengthError};
