//! Picker working in 4-bit channels (`#RGB`).
//!
//! Dials move in `0..=15`; every change publishes the expanded `#RRGGBB`
//! form as `lastColor`. A words mode swaps the dials for named-color
//! browsing by group.

use colorfun_types::{Color, NamedColor, NamedColorCatalog};
use colorfun_util::Clipboard;

use crate::catalog::named_color_value;
use crate::session::Channel;
use crate::storage::SessionStorage;

/// Largest value of a 4-bit channel.
pub const NIBBLE_MAX: u8 = 15;

const INITIAL_CHANNELS: (u8, u8, u8) = (15, 0, 10);

pub struct NibblePicker {
    r: u8,
    g: u8,
    b: u8,
    words_mode: bool,
    group: Option<String>,
    last_color: Color,
    storage: SessionStorage,
}

impl NibblePicker {
    /// Mount the picker at `(15, 0, 10)` and publish that color.
    pub fn mount(storage: SessionStorage) -> Self {
        let (r, g, b) = INITIAL_CHANNELS;
        let mut picker = Self {
            r,
            g,
            b,
            words_mode: false,
            group: None,
            last_color: storage.last_color().unwrap_or_default(),
            storage,
        };
        picker.publish_dials();
        picker
    }

    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Set one dial, clamped to `0..=15`. Ignored in words mode.
    pub fn set_channel(&mut self, channel: Channel, value: u8) {
        if self.words_mode {
            return;
        }
        let value = value.min(NIBBLE_MAX);
        match channel {
            Channel::Red => self.r = value,
            Channel::Green => self.g = value,
            Channel::Blue => self.b = value,
        }
        self.publish_dials();
    }

    /// Short form built from the dials, e.g. `#F0A`.
    pub fn short_hex(&self) -> String {
        format!("#{:X}{:X}{:X}", self.r, self.g, self.b)
    }

    /// Dial color with each digit doubled.
    pub fn expanded(&self) -> Color {
        Color::new(self.r * 17, self.g * 17, self.b * 17)
    }

    /// Color currently on display: the dials, or the picked name in words mode.
    pub fn current_color(&self) -> Color {
        if self.words_mode { self.last_color } else { self.expanded() }
    }

    pub fn words_mode(&self) -> bool {
        self.words_mode
    }

    pub fn set_words_mode(&mut self, enabled: bool) {
        self.words_mode = enabled;
        if !enabled {
            self.publish_dials();
        }
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Choose a group by id and list its colors. Unknown ids clear the choice.
    pub fn select_group<'a>(&mut self, catalog: &'a NamedColorCatalog, id: &str) -> &'a [NamedColor] {
        match catalog.group(id) {
            Some(group) => {
                self.group = Some(group.group.clone());
                &group.colors
            }
            None => {
                self.group = None;
                &[]
            }
        }
    }

    /// Adopt a named color and publish it.
    pub fn pick_named(&mut self, named: &NamedColor) -> Option<Color> {
        let color = named_color_value(named)?;
        self.last_color = color;
        self.storage.set_last_color(color);
        Some(color)
    }

    /// Copy the expanded hex of what is on display.
    pub fn copy_current(&self, clipboard: &mut dyn Clipboard) -> Option<String> {
        let hex = self.current_color().to_hex();
        clipboard.copy_text(&hex).then_some(hex)
    }

    fn publish_dials(&mut self) {
        let color = self.expanded();
        self.last_color = color;
        self.storage.set_last_color(color);
    }
}
