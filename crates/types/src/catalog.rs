use serde::{Deserialize, Serialize};

/// A single named color as described by the static configuration document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColor {
    /// Display name (e.g. "Tomato").
    pub name: String,
    /// Hex text; canonical `#RRGGBB` once loaded through the engine.
    pub hex: String,
}

/// Named colors sharing a hue family.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColorGroup {
    /// Machine identifier (e.g. "reds").
    #[serde(default)]
    pub group: String,
    /// Human-friendly label; falls back to `group` when empty.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub colors: Vec<NamedColor>,
}

impl NamedColorGroup {
    /// Label to display, falling back to the identifier and then to `fallback`.
    pub fn display_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        if !self.label.trim().is_empty() {
            &self.label
        } else if !self.group.trim().is_empty() {
            &self.group
        } else {
            fallback
        }
    }
}

/// Root of the named-color configuration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColorCatalog {
    #[serde(default)]
    pub groups: Vec<NamedColorGroup>,
}

impl NamedColorCatalog {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.colors.is_empty())
    }

    pub fn color_count(&self) -> usize {
        self.groups.iter().map(|group| group.colors.len()).sum()
    }

    /// Case-insensitive lookup by color name across all groups.
    pub fn find_by_name(&self, name: &str) -> Option<&NamedColor> {
        let needle = name.trim();
        self.groups
            .iter()
            .flat_map(|group| group.colors.iter())
            .find(|color| color.name.eq_ignore_ascii_case(needle))
    }

    pub fn group(&self, id: &str) -> Option<&NamedColorGroup> {
        self.groups.iter().find(|group| group.group == id)
    }
}
