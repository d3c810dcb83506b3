//! # Colorfun Engine
//!
//! Palette generation and the state behind the colorfun widgets.
//!
//! ## Key Features
//!
//! - **Palette generation**: nine-color palettes derived in HSL space from a
//!   base color, a noise amount and one of 22 noise types
//! - **History log**: bounded (400 entries), cursor-navigable and persisted
//!   through a key-value store
//! - **Playground session**: one widget instance's state with commit,
//!   reroll, fresh start and navigation operations
//! - **Widgets**: named-color wall, a 4-bit hex picker and a standalone noise
//!   palette, all sharing `lastColor`
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use colorfun_engine::{PlaygroundSession, SessionStorage};
//! use colorfun_util::InMemoryStore;
//!
//! let storage = SessionStorage::new(Arc::new(InMemoryStore::new()));
//! let mut session = PlaygroundSession::new(storage);
//! session.hydrate();
//! session.apply_hex("#3a7bd5", true)?;
//!
//! assert_eq!(session.palette().iter().count(), 9);
//! assert_eq!(session.history().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`palette`**: noise-type policies and palette generation
//! - **`history`**: the history log and persisted-data sanitization
//! - **`storage`**: session view of the key-value store
//! - **`session`**: the playground widget state
//! - **`timer`** / **`scroll`**: cancellable timers, debouncing and history scroll sync
//! - **`color_wall`** / **`nibble_picker`**: the named-color widgets
//! - **`noise_palette`**: quick noise chips around the last color
//! - **`catalog`**: named-color catalog loading

pub mod catalog;
pub mod color_wall;
pub mod history;
pub mod nibble_picker;
pub mod noise_palette;
pub mod palette;
pub mod scroll;
pub mod session;
pub mod storage;
pub mod timer;

pub use catalog::{CatalogError, embedded_catalog, load_catalog, parse_catalog};
pub use color_wall::{ColorWall, MINI_WALL_LIMIT, ROTATION_INTERVAL, WallChip, WidgetMode};
pub use history::{HISTORY_LIMIT, HistoryLog};
pub use nibble_picker::{NIBBLE_MAX, NibblePicker};
pub use noise_palette::{ChipStyle, MINI_CHIP_COUNT, NoisePalette};
pub use palette::{NoiseShape, generate_palette, generate_palette_with, shape_of};
pub use scroll::{HistoryScroller, RowGeometry, ScrollAnimation, ScrollTick, Viewport, row_at_arrow, target_scroll_top};
pub use session::{Channel, Notice, PlaygroundSession, UnknownChannel, resolve_language};
pub use storage::SessionStorage;
pub use timer::{CancellableTimer, Debouncer, TimerToken};
