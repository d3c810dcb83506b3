//! Session-scoped access to the key-value store.
//!
//! Wraps a [`KeyValueStore`] with the boolean write contract the playground
//! relies on, the typed readers for the keys it owns, and the "could not
//! save" warning that is raised at most once per session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colorfun_types::{Color, Language, NoiseAmount, NoiseType};
use colorfun_util::KeyValueStore;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

pub const LAST_COLOR_KEY: &str = "lastColor";
pub const HISTORY_KEY: &str = "history";
pub const HISTORY_INDEX_KEY: &str = "historyIndex";
pub const NOISE_KEY: &str = "noise";
pub const NOISE_TYPE_KEY: &str = "noiseType";
pub const LANG_KEY: &str = "lang";
pub const SESSION_SEED_KEY: &str = "sessionSeed";

#[derive(Debug, Default)]
struct WriteWarning {
    shown: AtomicBool,
    pending: AtomicBool,
}

/// Cloneable handle shared by every component of one session.
#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn KeyValueStore>,
    warning: Arc<WriteWarning>,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            warning: Arc::new(WriteWarning::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.get(key)
    }

    /// Write `value` under `key`. Returns `false` when the store rejected the
    /// write; the first rejection of the session queues a warning.
    pub fn persist(&self, key: &str, value: Value) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(error) => {
                if !self.warning.shown.swap(true, Ordering::SeqCst) {
                    warn!(key, error = %error, "Could not persist playground state");
                    self.warning.pending.store(true, Ordering::SeqCst);
                } else {
                    debug!(key, error = %error, "Persist failed again");
                }
                false
            }
        }
    }

    /// Returns `true` once after the first failed write.
    pub fn take_write_warning(&self) -> bool {
        self.warning.pending.swap(false, Ordering::SeqCst)
    }

    pub fn last_color(&self) -> Option<Color> {
        self.get(LAST_COLOR_KEY)
            .and_then(|value| value.as_str().and_then(|text| Color::parse_hex(text).ok()))
    }

    pub fn set_last_color(&self, color: Color) -> bool {
        self.persist(LAST_COLOR_KEY, Value::String(color.to_hex()))
    }

    /// Stored noise amount, only when it was saved as a number.
    pub fn noise_amount(&self) -> Option<NoiseAmount> {
        self.get(NOISE_KEY)
            .and_then(|value| value.as_f64())
            .map(NoiseAmount::from_f64)
    }

    /// Stored noise type, only when it names a known type.
    pub fn noise_type(&self) -> Option<NoiseType> {
        self.get(NOISE_TYPE_KEY)
            .and_then(|value| value.as_str().and_then(|tag| tag.parse().ok()))
    }

    pub fn language(&self) -> Option<Language> {
        self.get(LANG_KEY)
            .and_then(|value| value.as_str().and_then(Language::normalize))
    }

    pub fn set_language(&self, language: Language) -> bool {
        self.persist(LANG_KEY, Value::String(language.code().to_string()))
    }

    /// Seed `lastColor` the way the home page does before mounting its
    /// widgets, so the first widget to read it finds a color. An existing
    /// `lastColor` wins. Otherwise a stored `sessionSeed` is reused, or a
    /// random 24-bit seed is drawn and kept so later runs start from the
    /// same color.
    pub fn ensure_seed_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        if let Some(color) = self.last_color() {
            return color;
        }
        let seed = self
            .get(SESSION_SEED_KEY)
            .and_then(|value| value.as_u64())
            .map(|seed| (seed & 0xFF_FFFF) as u32)
            .unwrap_or_else(|| rng.gen_range(0..0xFF_FFFF));
        self.persist(SESSION_SEED_KEY, Value::from(seed));
        let color = Color::from_u24(seed);
        self.set_last_color(color);
        color
    }
}
