//! One playground widget instance.
//!
//! [`PlaygroundSession`] owns the base color, the noise settings, the palette
//! on screen and the history log. Every operation is a plain method; the
//! renderer reads state back through the accessors and drains user-facing
//! [`Notice`]s after each call.

use std::fmt;
use std::str::FromStr;

use colorfun_types::{
    Color, ColorParseError, DEFAULT_BASE_COLOR, HistoryEntry, Language, NoiseAmount, NoiseType, Palette, UnknownNoiseType,
};
use colorfun_util::Clipboard;
use rand::rngs::ThreadRng;
use rand::{Rng, RngCore, thread_rng};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::history::HistoryLog;
use crate::palette::generate_palette_with;
use crate::scroll::{HistoryScroller, RowGeometry, Viewport, row_at_arrow};
use crate::storage::{NOISE_KEY, NOISE_TYPE_KEY, SessionStorage};

/// One of the three RGB dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Error)]
#[error("unknown channel: {0} (expected r, g or b)")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::Red),
            "g" | "green" => Ok(Channel::Green),
            "b" | "blue" => Ok(Channel::Blue),
            other => Err(UnknownChannel(other.to_string())),
        }
    }
}

/// Transient, user-facing message produced by a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Copied(Color),
    InvalidHex,
    HistoryReset,
    StorageWarning,
    NoiseTypeChanged(NoiseType),
}

impl Notice {
    pub fn message(&self, language: Language) -> String {
        match (self, language) {
            (Notice::Copied(color), Language::En) => format!("copied {color}"),
            (Notice::Copied(color), Language::Es) => format!("copiado {color}"),
            (Notice::InvalidHex, Language::En) => "invalid hex".to_string(),
            (Notice::InvalidHex, Language::Es) => "hex invalido".to_string(),
            (Notice::HistoryReset, Language::En) => "history reset".to_string(),
            (Notice::HistoryReset, Language::Es) => "historial reiniciado".to_string(),
            (Notice::StorageWarning, Language::En) => "Could not save data".to_string(),
            (Notice::StorageWarning, Language::Es) => "No se pudo guardar".to_string(),
            (Notice::NoiseTypeChanged(noise_type), _) => {
                format!("{} - {}", noise_type.label(language), noise_type.description(language))
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(Language::default()))
    }
}

/// Pick the UI language: explicit choice, then environment override, then
/// the stored preference, then the system locale, then English. Only the
/// explicit choice is written back.
pub fn resolve_language(
    storage: &SessionStorage,
    explicit: Option<&str>,
    env_override: Option<&str>,
    system_locale: Option<&str>,
) -> Language {
    if let Some(language) = explicit.and_then(Language::normalize) {
        storage.set_language(language);
        return language;
    }
    env_override
        .and_then(Language::normalize)
        .or_else(|| storage.language())
        .or_else(|| system_locale.and_then(Language::normalize))
        .unwrap_or_default()
}

pub struct PlaygroundSession<R: RngCore = ThreadRng> {
    rng: R,
    storage: SessionStorage,
    language: Language,
    color: Color,
    noise_amount: NoiseAmount,
    noise_type: NoiseType,
    palette: Palette,
    history: HistoryLog,
    scroller: HistoryScroller,
    notices: Vec<Notice>,
}

impl PlaygroundSession<ThreadRng> {
    pub fn new(storage: SessionStorage) -> Self {
        Self::with_rng(storage, thread_rng())
    }
}

impl<R: RngCore> PlaygroundSession<R> {
    /// Build an empty session; call [`hydrate`](Self::hydrate) to pick up
    /// persisted state.
    pub fn with_rng(storage: SessionStorage, rng: R) -> Self {
        Self {
            rng,
            history: HistoryLog::new(storage.clone()),
            storage,
            language: Language::default(),
            color: DEFAULT_BASE_COLOR,
            noise_amount: NoiseAmount::DEFAULT,
            noise_type: NoiseType::default(),
            palette: Palette::uniform(DEFAULT_BASE_COLOR),
            scroller: HistoryScroller::new(),
            notices: Vec::new(),
        }
    }

    /// Restore history, noise settings and the base color from storage.
    /// Reads only; nothing is written back.
    pub fn hydrate(&mut self) {
        self.history = HistoryLog::restore(self.storage.clone());
        if let Some(amount) = self.storage.noise_amount() {
            self.noise_amount = amount;
        }
        if let Some(noise_type) = self.storage.noise_type() {
            self.noise_type = noise_type;
        }

        if let Some(entry) = self.history.current() {
            self.color = entry.color;
            self.palette = entry.palette;
        } else {
            self.color = self.storage.last_color().unwrap_or(DEFAULT_BASE_COLOR);
            self.palette = self.generate();
        }
        debug!(
            color = %self.color,
            noise_type = %self.noise_type,
            noise = self.noise_amount.get(),
            entries = self.history.len(),
            "Hydrated playground session"
        );
    }

    /// Page-load refresh: new noise character, a random base color, and a
    /// history entry for it.
    pub fn begin_visit(&mut self) -> Color {
        self.randomize_noise();
        let color = self.random_color();
        self.apply_color(color, true);
        color
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn noise_amount(&self) -> NoiseAmount {
        self.noise_amount
    }

    pub fn noise_type(&self) -> NoiseType {
        self.noise_type
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    pub fn scroller_mut(&mut self) -> &mut HistoryScroller {
        &mut self.scroller
    }

    /// Move one dial. Previews the new color without committing it.
    pub fn set_channel(&mut self, channel: Channel, value: u8) {
        let mut color = self.color;
        match channel {
            Channel::Red => color.r = value,
            Channel::Green => color.g = value,
            Channel::Blue => color.b = value,
        }
        self.color = color;
        self.palette = self.generate();
        self.storage.set_last_color(self.color);
    }

    /// Commit the color and palette currently on screen.
    pub fn commit_current(&mut self) {
        let entry = HistoryEntry::new(self.color, self.palette, self.noise_type, self.noise_amount);
        self.history.append(entry);
    }

    /// Set the noise amount (rounded, clamped) and regenerate the palette.
    pub fn set_noise_amount(&mut self, value: f64) -> NoiseAmount {
        self.noise_amount = NoiseAmount::from_f64(value);
        self.storage.persist(NOISE_KEY, Value::from(self.noise_amount.get()));
        self.palette = self.generate();
        self.noise_amount
    }

    /// Switch noise type, regenerate and commit.
    pub fn set_noise_type(&mut self, noise_type: NoiseType) {
        self.store_noise_type(noise_type);
        self.notices.push(Notice::NoiseTypeChanged(noise_type));
        self.palette = self.generate();
        self.commit_current();
    }

    /// Like [`set_noise_type`](Self::set_noise_type) for a textual tag.
    /// Unknown tags change nothing.
    pub fn set_noise_type_tag(&mut self, tag: &str) -> Result<NoiseType, UnknownNoiseType> {
        let noise_type = tag.parse::<NoiseType>()?;
        self.set_noise_type(noise_type);
        Ok(noise_type)
    }

    /// Parse pasted text and make it the base color. Invalid input queues a
    /// notice and leaves the session untouched.
    pub fn apply_hex(&mut self, text: &str, commit: bool) -> Result<Color, ColorParseError> {
        match Color::parse_hex(text) {
            Ok(color) => {
                self.apply_color(color, commit);
                Ok(color)
            }
            Err(error) => {
                debug!(input = text, error = %error, "Rejected hex input");
                self.notices.push(Notice::InvalidHex);
                Err(error)
            }
        }
    }

    /// Make `color` the base color with a freshly generated palette.
    pub fn apply_color(&mut self, color: Color, commit: bool) {
        self.color = color;
        self.palette = self.generate();
        self.storage.set_last_color(color);
        if commit {
            self.commit_current();
        }
    }

    /// Copy a swatch and adopt it as the new base color.
    pub fn pick_palette_color(&mut self, index: usize, clipboard: &mut dyn Clipboard) -> Option<Color> {
        let color = self.palette.get(index)?;
        self.copy_color(color, clipboard);
        self.apply_color(color, true);
        Some(color)
    }

    /// Read a hex color from the clipboard, or from `fallback` when the
    /// clipboard is empty or unreadable, and commit it as the base color.
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard, fallback: Option<&str>) -> Result<Color, ColorParseError> {
        let text = clipboard
            .read_text()
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_default();
        self.apply_hex(&text, true)
    }

    /// Copy the current base color.
    pub fn copy_current(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        self.copy_color(self.color, clipboard)
    }

    /// Random noise type, amount and base color, committed.
    pub fn reroll(&mut self) -> Color {
        self.randomize_noise();
        let color = self.random_color();
        self.apply_color(color, true);
        color
    }

    /// Drop the whole history and start over from one random entry.
    pub fn fresh_start(&mut self) -> Color {
        self.scroller.cancel_all();
        self.randomize_noise();
        let color = self.random_color();
        self.apply_color(color, false);
        let entry = HistoryEntry::new(self.color, self.palette, self.noise_type, self.noise_amount);
        self.history.reset_with_fresh_entry(entry);
        self.notices.push(Notice::HistoryReset);
        info!(color = %color, "Started fresh history");
        color
    }

    /// Navigate relative to the cursor. `None` at either end.
    pub fn step(&mut self, delta: isize) -> Option<HistoryEntry> {
        let entry = self.history.step_by(delta)?;
        self.restore_entry(&entry);
        Some(entry)
    }

    /// Jump to an absolute history position.
    pub fn select(&mut self, index: usize) -> Option<HistoryEntry> {
        let entry = self.history.select_index(index)?;
        self.restore_entry(&entry);
        Some(entry)
    }

    /// Select the row under the arrow after a user scroll settled. Does
    /// nothing when that row is already current.
    pub fn settle_scroll(&mut self, rows: &[RowGeometry], viewport: &Viewport) -> Option<HistoryEntry> {
        let index = row_at_arrow(rows, viewport)?;
        if self.history.cursor() == Some(index) {
            return None;
        }
        self.select(index)
    }

    pub fn can_step_back(&self) -> bool {
        self.history.can_step_back()
    }

    pub fn can_step_forward(&self) -> bool {
        self.history.can_step_forward()
    }

    /// Drain pending notices, including a one-time storage warning.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        if self.storage.take_write_warning() {
            self.notices.push(Notice::StorageWarning);
        }
        std::mem::take(&mut self.notices)
    }

    fn restore_entry(&mut self, entry: &HistoryEntry) {
        self.store_noise_type(entry.noise_type);
        self.noise_amount = entry.noise_amount;
        self.storage.persist(NOISE_KEY, Value::from(self.noise_amount.get()));
        self.color = entry.color;
        self.palette = entry.palette;
        self.storage.set_last_color(self.color);
    }

    fn store_noise_type(&mut self, noise_type: NoiseType) {
        self.noise_type = noise_type;
        self.storage.persist(NOISE_TYPE_KEY, Value::String(noise_type.as_str().to_string()));
    }

    fn randomize_noise(&mut self) {
        let noise_type = NoiseType::random_except(self.noise_type, &mut self.rng);
        self.store_noise_type(noise_type);
        let amount = NoiseAmount::random(&mut self.rng);
        self.set_noise_amount(amount.as_f64());
    }

    fn random_color(&mut self) -> Color {
        Color::from_u24(self.rng.gen_range(0..0xFF_FFFF))
    }

    fn copy_color(&mut self, color: Color, clipboard: &mut dyn Clipboard) -> bool {
        let copied = clipboard.copy_text(&color.to_hex());
        if copied {
            self.notices.push(Notice::Copied(color));
        }
        copied
    }

    fn generate(&mut self) -> Palette {
        generate_palette_with(&mut self.rng, self.color, self.noise_amount, self.noise_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{HISTORY_INDEX_KEY, HISTORY_KEY, LANG_KEY, LAST_COLOR_KEY};
    use colorfun_util::{InMemoryStore, MemoryClipboard};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use std::sync::Arc;

    fn session_on(store: InMemoryStore) -> PlaygroundSession<StdRng> {
        let storage = SessionStorage::new(Arc::new(store));
        let mut session = PlaygroundSession::with_rng(storage, StdRng::seed_from_u64(7));
        session.hydrate();
        session
    }

    fn session() -> PlaygroundSession<StdRng> {
        session_on(InMemoryStore::new())
    }

    #[test]
    fn hydrate_without_data_uses_defaults() {
        let session = session();
        assert_eq!(session.color(), DEFAULT_BASE_COLOR);
        assert_eq!(session.noise_type(), NoiseType::Pastel);
        assert_eq!(session.noise_amount(), NoiseAmount::DEFAULT);
        assert!(session.history().is_empty());
        assert!(!session.can_step_back());
        assert!(!session.can_step_forward());
    }

    #[test]
    fn hydrate_restores_entry_under_cursor() {
        let palette = vec!["#010101"; 9];
        let store = InMemoryStore::new()
            .with_value(
                HISTORY_KEY,
                json!([
                    {"color": "#FF0000", "palette": palette, "noiseType": "neon", "noise": 10},
                    {"color": "#00FF00", "palette": palette, "noiseType": "mono", "noise": 20},
                ]),
            )
            .with_value(HISTORY_INDEX_KEY, json!(0))
            .with_value(NOISE_KEY, json!(55))
            .with_value(NOISE_TYPE_KEY, json!("earthy"));
        let session = session_on(store);
        assert_eq!(session.color().to_hex(), "#FF0000");
        assert_eq!(session.palette(), &Palette::uniform(Color::new(1, 1, 1)));
        assert_eq!(session.noise_amount(), NoiseAmount::new(55));
        assert_eq!(session.noise_type(), NoiseType::Earthy);
        assert!(session.can_step_forward());
    }

    #[test]
    fn hydrate_falls_back_to_last_color() {
        let session = session_on(InMemoryStore::new().with_value(LAST_COLOR_KEY, json!("#123")));
        assert_eq!(session.color().to_hex(), "#112233");
    }

    #[test]
    fn begin_visit_commits_a_fresh_entry() {
        let mut session = session();
        let before = session.noise_type();
        let color = session.begin_visit();
        assert_ne!(session.noise_type(), before);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().current().map(|entry| entry.color), Some(color));
        assert_eq!(session.storage().get(LAST_COLOR_KEY), Some(json!(color.to_hex())));
        assert_eq!(
            session.storage().get(NOISE_TYPE_KEY),
            Some(json!(session.noise_type().as_str()))
        );
    }

    #[test]
    fn channel_changes_preview_until_committed() {
        let mut session = session();
        session.set_channel(Channel::Red, 0xFF);
        session.set_channel(Channel::Blue, 0x10);
        assert_eq!(session.color().to_hex(), "#FF8010");
        assert!(session.history().is_empty());
        assert_eq!(session.storage().get(LAST_COLOR_KEY), Some(json!("#FF8010")));

        session.commit_current();
        let entry = session.history().current().unwrap();
        assert_eq!(entry.color, session.color());
        assert_eq!(&entry.palette, session.palette());
    }

    #[test]
    fn invalid_hex_is_rejected_without_changes() {
        let mut session = session();
        session.apply_hex("#FF0000", true).unwrap();
        let palette = *session.palette();
        assert!(session.apply_hex("#GGGGGG", true).is_err());
        assert!(session.apply_hex("#1234", true).is_err());
        assert_eq!(session.color().to_hex(), "#FF0000");
        assert_eq!(session.palette(), &palette);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.take_notices(), vec![Notice::InvalidHex, Notice::InvalidHex]);
    }

    #[test]
    fn navigation_restores_stored_state_verbatim() {
        let mut session = session();
        session.set_noise_type(NoiseType::Neon);
        session.apply_hex("#336699", true).unwrap();
        let first = session.history().get(1).cloned().unwrap();
        session.set_noise_amount(90.0);
        session.set_noise_type(NoiseType::Random);
        assert_eq!(session.history().len(), 3);

        let restored = session.step(-1).unwrap();
        assert_eq!(restored, first);
        assert_eq!(session.color(), first.color);
        assert_eq!(session.palette(), &first.palette);
        assert_eq!(session.noise_type(), NoiseType::Neon);
        assert_eq!(session.noise_amount(), first.noise_amount);
        assert_eq!(session.storage().get(NOISE_TYPE_KEY), Some(json!("neon")));
        assert_eq!(session.storage().get(HISTORY_INDEX_KEY), Some(json!(1)));

        assert!(session.select(0).is_some());
        assert!(session.step(-1).is_none());
        assert!(session.select(3).is_none());
        assert_eq!(session.history().cursor(), Some(0));
    }

    #[test]
    fn noise_type_change_announces_and_commits() {
        let mut session = session();
        session.take_notices();
        assert!(session.set_noise_type_tag("plaid").is_err());
        assert!(session.history().is_empty());

        assert_eq!(session.set_noise_type_tag("sunset").unwrap(), NoiseType::Sunset);
        assert_eq!(session.history().len(), 1);
        let notices = session.take_notices();
        assert_eq!(notices, vec![Notice::NoiseTypeChanged(NoiseType::Sunset)]);
        assert!(notices[0].message(Language::En).starts_with("sunset - "));
    }

    #[test]
    fn noise_amount_is_rounded_and_clamped() {
        let mut session = session();
        assert_eq!(session.set_noise_amount(-4.0), NoiseAmount::new(0));
        assert_eq!(session.set_noise_amount(42.6), NoiseAmount::new(43));
        assert_eq!(session.set_noise_amount(f64::NAN), NoiseAmount::DEFAULT);
        assert_eq!(session.storage().get(NOISE_KEY), Some(json!(35)));
    }

    #[test]
    fn picking_a_swatch_copies_and_commits() {
        let mut session = session();
        session.apply_hex("#808080", false).unwrap();
        let swatch = session.palette().get(4).unwrap();
        let mut clipboard = MemoryClipboard::new();

        assert_eq!(session.pick_palette_color(4, &mut clipboard), Some(swatch));
        assert_eq!(clipboard.copied(), vec![swatch.to_hex()]);
        assert_eq!(session.color(), swatch);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.take_notices(), vec![Notice::Copied(swatch)]);
        assert!(session.pick_palette_color(9, &mut clipboard).is_none());
    }

    #[test]
    fn paste_reads_clipboard_then_fallback() {
        let mut session = session();
        let mut clipboard = MemoryClipboard::with_text(" #0af ");
        assert_eq!(session.paste(&mut clipboard, Some("#123456")).unwrap().to_hex(), "#00AAFF");
        assert_eq!(session.history().len(), 1);

        let mut empty = MemoryClipboard::new();
        assert_eq!(session.paste(&mut empty, Some("123456")).unwrap().to_hex(), "#123456");
        assert_eq!(session.color().to_hex(), "#123456");
        assert_eq!(session.history().len(), 2);
        assert!(session.take_notices().is_empty());
    }

    #[test]
    fn paste_of_invalid_text_changes_nothing() {
        let mut session = session();
        session.apply_hex("#FF0000", true).unwrap();

        let mut clipboard = MemoryClipboard::with_text("tomato");
        assert!(session.paste(&mut clipboard, Some("#00FF00")).is_err());
        assert!(session.paste(&mut MemoryClipboard::new(), None).is_err());
        assert_eq!(session.color().to_hex(), "#FF0000");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.take_notices(), vec![Notice::InvalidHex, Notice::InvalidHex]);
    }

    #[test]
    fn reroll_appends_and_fresh_start_resets() {
        let mut session = session();
        session.reroll();
        session.reroll();
        assert_eq!(session.history().len(), 2);

        let color = session.fresh_start();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().cursor(), Some(0));
        assert_eq!(session.history().current().map(|entry| entry.color), Some(color));
        assert_eq!(session.take_notices(), vec![Notice::HistoryReset]);
    }

    #[test]
    fn storage_failure_is_reported_once() {
        let mut session = session_on(InMemoryStore::read_only());
        session.reroll();
        session.reroll();
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.take_notices(), vec![Notice::StorageWarning]);
        session.reroll();
        assert!(session.take_notices().is_empty());
    }

    #[test]
    fn settled_scroll_selects_row_under_arrow() {
        let mut session = session();
        for hex in ["#110000", "#220000", "#330000"] {
            session.apply_hex(hex, true).unwrap();
        }
        let rows: Vec<RowGeometry> = (0..3)
            .map(|index| RowGeometry {
                offset_top: index as f64 * 20.0,
                height: 20.0,
            })
            .collect();
        let viewport = Viewport {
            scroll_top: 0.0,
            client_height: 20.0,
            scroll_height: 60.0,
        };
        let entry = session.settle_scroll(&rows, &viewport).unwrap();
        assert_eq!(entry.color.to_hex(), "#110000");
        assert!(session.settle_scroll(&rows, &viewport).is_none());
    }

    #[test]
    fn language_resolution_order() {
        let storage = SessionStorage::new(Arc::new(InMemoryStore::new().with_value(LANG_KEY, json!("es"))));
        assert_eq!(resolve_language(&storage, None, None, Some("en_US.UTF-8")), Language::Es);
        assert_eq!(resolve_language(&storage, None, Some("EN"), None), Language::En);
        assert_eq!(storage.get(LANG_KEY), Some(json!("es")));

        assert_eq!(resolve_language(&storage, Some("en-GB"), Some("es"), None), Language::En);
        assert_eq!(storage.get(LANG_KEY), Some(json!("en")));

        let empty = SessionStorage::new(Arc::new(InMemoryStore::new()));
        assert_eq!(resolve_language(&empty, None, None, Some("es_ES")), Language::Es);
        assert_eq!(resolve_language(&empty, Some("fr"), None, Some("de")), Language::En);
    }

    #[test]
    fn channels_parse_from_text() {
        assert_eq!("R".parse::<Channel>().unwrap(), Channel::Red);
        assert_eq!("green".parse::<Channel>().unwrap(), Channel::Green);
        assert!("alpha".parse::<Channel>().is_err());
    }
}
