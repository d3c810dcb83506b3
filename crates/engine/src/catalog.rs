//! Named-color catalog loading.
//!
//! The catalog is read once at startup, either from a configured JSON file or
//! from the copy embedded in this crate. File problems are fatal for the
//! caller; individual entries with unusable hex values are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use colorfun_types::{Color, NamedColor, NamedColorCatalog};
use thiserror::Error;
use tracing::{debug, warn};

const EMBEDDED_CATALOG: &str = include_str!("../data/html_named_colors.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read named colors from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse named colors from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("named color document {origin} has no groups")]
    Empty { origin: String },
}

/// Load the catalog from `path`, or the embedded catalog when `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<NamedColorCatalog, CatalogError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_catalog(&content, &path.display().to_string())
        }
        None => embedded_catalog(),
    }
}

pub fn embedded_catalog() -> Result<NamedColorCatalog, CatalogError> {
    parse_catalog(EMBEDDED_CATALOG, "embedded catalog")
}

/// Parse a catalog document and normalize every color to `#RRGGBB`.
pub fn parse_catalog(content: &str, origin: &str) -> Result<NamedColorCatalog, CatalogError> {
    let mut catalog: NamedColorCatalog = serde_json::from_str(content).map_err(|source| CatalogError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    if catalog.groups.is_empty() {
        return Err(CatalogError::Empty {
            origin: origin.to_string(),
        });
    }

    for group in &mut catalog.groups {
        let before = group.colors.len();
        group.colors.retain_mut(|color| match Color::parse_hex(&color.hex) {
            Ok(parsed) => {
                color.hex = parsed.to_hex();
                true
            }
            Err(error) => {
                warn!(group = %group.group, name = %color.name, hex = %color.hex, error = %error, "Skipping named color");
                false
            }
        });
        if group.colors.len() != before {
            debug!(group = %group.group, kept = group.colors.len(), before, "Normalized named color group");
        }
    }
    Ok(catalog)
}

/// Parsed color of a catalog entry. Entries are normalized on load, so this
/// only fails for hand-built values.
pub fn named_color_value(color: &NamedColor) -> Option<Color> {
    Color::parse_hex(&color.hex).ok()
}
