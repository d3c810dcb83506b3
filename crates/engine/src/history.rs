//! Bounded, navigable color history.
//!
//! The log keeps committed [`HistoryEntry`] values oldest first together with
//! a single cursor. Appending always moves the cursor to the new last entry;
//! entries after a stale cursor are kept, not truncated. Every mutation writes
//! both `history` and `historyIndex` through the [`SessionStorage`].

use colorfun_types::{Color, HistoryEntry, NoiseAmount, NoiseType, PALETTE_SIZE, Palette};
use serde_json::Value;
use tracing::{debug, warn};

use crate::storage::{HISTORY_INDEX_KEY, HISTORY_KEY, SessionStorage};

/// Maximum number of entries retained.
pub const HISTORY_LIMIT: usize = 400;

pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    capacity: usize,
    storage: SessionStorage,
}

impl HistoryLog {
    pub fn new(storage: SessionStorage) -> Self {
        Self::with_capacity(storage, HISTORY_LIMIT)
    }

    /// Create an empty log with a custom cap (at least one entry).
    pub fn with_capacity(storage: SessionStorage, capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
            storage,
        }
    }

    /// Build a log hydrated from whatever the storage currently holds.
    pub fn restore(storage: SessionStorage) -> Self {
        let raw_history = storage.get(HISTORY_KEY);
        let raw_index = storage.get(HISTORY_INDEX_KEY);
        let mut log = Self::new(storage);
        log.load(raw_history.as_ref(), raw_index.as_ref());
        log
    }

    /// Replace the contents with sanitized persisted data. Never fails and
    /// never writes back; malformed records are dropped.
    pub fn load(&mut self, raw_history: Option<&Value>, raw_index: Option<&Value>) {
        let mut entries = sanitize_history(raw_history);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        let last = entries.len() as i64 - 1;
        let requested = match raw_index.and_then(Value::as_f64) {
            Some(index) if index.is_finite() => index.trunc() as i64,
            _ => last,
        };
        let cursor = requested.clamp(-1, last);

        debug!(entries = entries.len(), cursor, "Loaded history");
        self.entries = entries;
        self.cursor = usize::try_from(cursor).ok();
    }

    /// Push `entry`, move the cursor onto it and evict from the front when
    /// over capacity.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        let mut cursor = self.entries.len() - 1;
        let overflow = self.entries.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.entries.drain(..overflow);
            cursor = cursor.saturating_sub(overflow);
        }
        self.cursor = Some(cursor);
        self.persist();
    }

    /// Move the cursor by `delta`. Out-of-range targets leave the log
    /// untouched and return `None`.
    ///
    /// A loaded log can sit at `-1` with entries present; stepping forward
    /// from there lands on the first entry.
    pub fn step_by(&mut self, delta: isize) -> Option<HistoryEntry> {
        let target = (self.cursor_index() as isize).checked_add(delta)?;
        let index = usize::try_from(target).ok()?;
        self.select_index(index)
    }

    /// Jump to an absolute position.
    pub fn select_index(&mut self, index: usize) -> Option<HistoryEntry> {
        let entry = self.entries.get(index)?.clone();
        self.cursor = Some(index);
        self.persist();
        debug!(index, color = %entry.color, "Selected history entry");
        Some(entry)
    }

    /// Discard everything and keep only `entry`.
    pub fn reset_with_fresh_entry(&mut self, entry: HistoryEntry) {
        self.entries.clear();
        self.cursor = None;
        self.append(entry);
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor in its persisted form, `-1` when empty.
    pub fn cursor_index(&self) -> i64 {
        self.cursor.map_or(-1, |cursor| cursor as i64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn can_step_back(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor_index() + 1 < self.entries.len() as i64
    }

    fn persist(&self) {
        match serde_json::to_value(&self.entries) {
            Ok(value) => {
                self.storage.persist(HISTORY_KEY, value);
            }
            Err(error) => warn!(error = %error, "Failed to serialize history"),
        }
        self.storage.persist(HISTORY_INDEX_KEY, Value::from(self.cursor_index()));
    }
}

fn sanitize_history(raw: Option<&Value>) -> Vec<HistoryEntry> {
    let Some(Value::Array(records)) = raw else {
        if raw.is_some_and(|value| !value.is_null()) {
            warn!("Stored history is not a list; ignoring it");
        }
        return Vec::new();
    };

    let entries: Vec<HistoryEntry> = records.iter().filter_map(sanitize_entry).collect();
    if entries.len() != records.len() {
        warn!(
            dropped = records.len() - entries.len(),
            kept = entries.len(),
            "Dropped malformed history entries"
        );
    }
    entries
}

fn sanitize_entry(record: &Value) -> Option<HistoryEntry> {
    let color = Color::parse_hex(record.get("color")?.as_str()?).ok()?;

    let swatches = record.get("palette")?.as_array()?;
    let colors = swatches
        .iter()
        .take(PALETTE_SIZE)
        .map(|swatch| swatch.as_str().and_then(|hex| Color::parse_hex(hex).ok()))
        .collect::<Option<Vec<Color>>>()?;
    let palette = Palette::try_from(colors).ok()?;

    let noise_type = record
        .get("noiseType")
        .and_then(Value::as_str)
        .and_then(|tag| tag.parse::<NoiseType>().ok())
        .unwrap_or_default();

    let noise_amount = NoiseAmount::from_f64(loose_number(record.get("noise")));

    Some(HistoryEntry::new(color, palette, noise_type, noise_amount))
}

/// Numeric coercion for loosely typed stored values; anything without a
/// numeric reading becomes NaN.
fn loose_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Null) => 0.0,
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorfun_util::InMemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn storage() -> SessionStorage {
        SessionStorage::new(Arc::new(InMemoryStore::new()))
    }

    fn entry(seed: u32) -> HistoryEntry {
        let color = Color::from_u24(seed);
        HistoryEntry::new(color, Palette::uniform(color), NoiseType::Pastel, NoiseAmount::DEFAULT)
    }

    fn raw_entry(color: &str, swatches: usize) -> Value {
        json!({
            "color": color,
            "palette": vec!["#112233"; swatches],
            "noiseType": "neon",
            "noise": 20,
        })
    }

    #[test]
    fn append_caps_the_log_and_evicts_the_oldest() {
        let mut log = HistoryLog::new(storage());
        for seed in 0..401 {
            log.append(entry(seed));
        }
        assert_eq!(log.len(), HISTORY_LIMIT);
        assert_eq!(log.get(0), Some(&entry(1)));
        assert_eq!(log.cursor(), Some(HISTORY_LIMIT - 1));
        assert_eq!(log.current(), Some(&entry(400)));
    }

    #[test]
    fn append_after_backtracking_keeps_later_entries() {
        let mut log = HistoryLog::new(storage());
        for seed in 0..3 {
            log.append(entry(seed));
        }
        log.select_index(0).unwrap();
        log.append(entry(9));
        assert_eq!(log.len(), 4);
        assert_eq!(log.cursor(), Some(3));
        assert_eq!(log.get(2), Some(&entry(2)));
    }

    #[test]
    fn eviction_preserves_distance_from_cursor() {
        let mut log = HistoryLog::with_capacity(storage(), 3);
        for seed in 0..3 {
            log.append(entry(seed));
        }
        log.append(entry(3));
        assert_eq!(log.entries(), &[entry(1), entry(2), entry(3)]);
        assert_eq!(log.cursor(), Some(2));
    }

    #[test]
    fn stepping_past_the_ends_is_rejected() {
        let mut log = HistoryLog::new(storage());
        assert!(log.step_by(-1).is_none());
        assert!(!log.can_step_back());

        log.append(entry(1));
        log.append(entry(2));
        assert!(log.step_by(1).is_none());
        assert_eq!(log.cursor(), Some(1));

        assert_eq!(log.step_by(-1), Some(entry(1)));
        assert!(log.step_by(-1).is_none());
        assert_eq!(log.cursor(), Some(0));
        assert!(log.can_step_forward());
        assert!(log.select_index(2).is_none());
        assert_eq!(log.cursor(), Some(0));
    }

    #[test]
    fn reset_leaves_exactly_one_entry() {
        let mut log = HistoryLog::new(storage());
        for seed in 0..5 {
            log.append(entry(seed));
        }
        log.reset_with_fresh_entry(entry(42));
        assert_eq!(log.len(), 1);
        assert_eq!(log.cursor(), Some(0));
        assert_eq!(log.current(), Some(&entry(42)));
    }

    #[test]
    fn mutations_persist_entries_and_cursor() {
        let storage = storage();
        let mut log = HistoryLog::new(storage.clone());
        log.append(entry(0xABCDEF));
        log.append(entry(0x123456));
        log.step_by(-1);

        assert_eq!(storage.get(HISTORY_INDEX_KEY), Some(json!(0)));
        let stored = storage.get(HISTORY_KEY).unwrap();
        assert_eq!(stored[0]["color"], json!("#ABCDEF"));
        assert_eq!(stored[1]["palette"].as_array().map(Vec::len), Some(PALETTE_SIZE));

        let restored = HistoryLog::restore(storage);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.cursor(), Some(0));
    }

    #[test]
    fn load_drops_short_palettes_and_clamps_cursor() {
        let history = json!([
            raw_entry("#FF0000", 9),
            raw_entry("#00FF00", 5),
            raw_entry("#0000FF", 12),
            raw_entry("#ABC", 9),
        ]);
        let mut log = HistoryLog::new(storage());
        log.load(Some(&history), Some(&json!(999)));
        assert_eq!(log.len(), 3);
        assert_eq!(log.cursor(), Some(2));
        assert_eq!(log.get(2).unwrap().color.to_hex(), "#AABBCC");
    }

    #[test]
    fn load_coerces_type_and_amount() {
        let history = json!([
            {"color": "#101010", "palette": vec!["#000000"; 9], "noiseType": "plaid", "noise": 140.6},
            {"color": "#202020", "palette": vec!["#000000"; 9], "noise": "12.4"},
            {"color": "#303030", "palette": vec!["#000000"; 9], "noiseType": "ice", "noise": "lots"},
        ]);
        let mut log = HistoryLog::new(storage());
        log.load(Some(&history), None);

        let first = log.get(0).unwrap();
        assert_eq!(first.noise_type, NoiseType::Pastel);
        assert_eq!(first.noise_amount, NoiseAmount::new(100));
        assert_eq!(log.get(1).unwrap().noise_amount, NoiseAmount::new(12));
        assert_eq!(log.get(2).unwrap().noise_type, NoiseType::Ice);
        assert_eq!(log.get(2).unwrap().noise_amount, NoiseAmount::DEFAULT);
        assert_eq!(log.cursor(), Some(2));
    }

    #[test]
    fn load_filters_malformed_records() {
        let history = json!([
            null,
            {"palette": vec!["#000000"; 9]},
            {"color": 12, "palette": vec!["#000000"; 9]},
            {"color": "#000000", "palette": "#000000"},
            {"color": "#000000", "palette": ["#000000", "#000000", "#000000", "#000000", "oops", "#000000", "#000000", "#000000", "#000000"]},
            raw_entry("#FFFFFF", 9),
        ]);
        let mut log = HistoryLog::new(storage());
        log.load(Some(&history), Some(&json!(-7)));
        assert_eq!(log.len(), 1);
        assert_eq!(log.cursor(), None);
        assert_eq!(log.cursor_index(), -1);
    }

    #[test]
    fn stepping_forward_from_unset_cursor_reaches_first_entry() {
        let history = json!([raw_entry("#010101", 9), raw_entry("#020202", 9), raw_entry("#030303", 9)]);
        let mut log = HistoryLog::new(storage());
        log.load(Some(&history), Some(&json!(-1)));
        assert_eq!(log.len(), 3);
        assert_eq!(log.cursor_index(), -1);
        assert!(log.can_step_forward());
        assert!(!log.can_step_back());
        assert!(log.step_by(-1).is_none());

        let first = log.step_by(1).unwrap();
        assert_eq!(first.color.to_hex(), "#010101");
        assert_eq!(log.cursor(), Some(0));
    }

    #[test]
    fn load_handles_missing_and_non_list_history() {
        let mut log = HistoryLog::new(storage());
        log.load(None, None);
        assert!(log.is_empty());
        assert_eq!(log.cursor(), None);

        log.load(Some(&json!({"color": "#FFFFFF"})), Some(&json!("3")));
        assert!(log.is_empty());
    }

    #[test]
    fn load_keeps_only_the_newest_entries() {
        let records: Vec<Value> = (0..HISTORY_LIMIT + 10)
            .map(|seed| serde_json::to_value(entry(seed as u32)).unwrap())
            .collect();
        let mut log = HistoryLog::new(storage());
        log.load(Some(&Value::Array(records)), Some(&json!(2.9)));
        assert_eq!(log.len(), HISTORY_LIMIT);
        assert_eq!(log.get(0), Some(&entry(10)));
        assert_eq!(log.cursor(), Some(2));
    }
}
