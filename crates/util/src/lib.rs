//! Collaborators shared by colorfun front ends: persistence, clipboard and
//! configuration.

pub mod clipboard;
pub mod config;
pub mod store;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use config::{AppConfig, expand_tilde};
pub use store::{DEFAULT_NAMESPACE, InMemoryStore, JsonFileStore, KeyValueStore, StoreError};
