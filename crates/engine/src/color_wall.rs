//! Named-color wall.
//!
//! Shows one catalog group at a time. The mini variant caps the visible
//! chips and rotates through groups on a fixed interval; picking a chip copies
//! its hex and publishes it as `lastColor` for the other widgets.

use std::sync::Arc;
use std::time::{Duration, Instant};

use colorfun_types::{Color, Language, NamedColor, NamedColorCatalog, NamedColorGroup};
use colorfun_util::Clipboard;
use tracing::debug;

use crate::catalog::named_color_value;
use crate::storage::SessionStorage;
use crate::timer::CancellableTimer;

/// Chips shown by the mini wall.
pub const MINI_WALL_LIMIT: usize = 18;
/// Group rotation period of the mini wall.
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(2500);

/// How a widget is mounted: embedded on the home page or full screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidgetMode {
    #[default]
    Mini,
    Full,
}

/// A chip ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallChip<'a> {
    pub name: &'a str,
    pub color: Color,
    pub text_color: Color,
}

pub struct ColorWall {
    catalog: Arc<NamedColorCatalog>,
    mode: WidgetMode,
    group_index: usize,
    rotation: Option<CancellableTimer>,
    storage: SessionStorage,
}

impl ColorWall {
    /// Mount the wall. Rotation only runs in mini mode with more than one
    /// group.
    pub fn mount(catalog: Arc<NamedColorCatalog>, mode: WidgetMode, storage: SessionStorage, now: Instant) -> Self {
        let rotation = (mode == WidgetMode::Mini && catalog.groups.len() > 1).then(|| {
            let mut timer = CancellableTimer::new(ROTATION_INTERVAL);
            timer.start(now);
            timer
        });
        Self {
            catalog,
            mode,
            group_index: 0,
            rotation,
            storage,
        }
    }

    pub fn mode(&self) -> WidgetMode {
        self.mode
    }

    pub fn group_index(&self) -> usize {
        self.group_index
    }

    pub fn current_group(&self) -> Option<&NamedColorGroup> {
        let count = self.catalog.groups.len();
        if count == 0 {
            return None;
        }
        self.catalog.groups.get(self.group_index % count)
    }

    /// Label of the current group, with a localized fallback for unnamed ones.
    pub fn group_label(&self, language: Language) -> Option<&str> {
        let fallback = match language {
            Language::En => "group",
            Language::Es => "grupo",
        };
        self.current_group().map(|group| group.display_label(fallback))
    }

    /// Choose a group by position; wraps around the catalog.
    pub fn select_group(&mut self, index: usize) {
        let count = self.catalog.groups.len();
        self.group_index = if count == 0 { 0 } else { index % count };
    }

    pub fn next_group(&mut self) {
        self.select_group(self.group_index + 1);
    }

    pub fn visible_colors(&self) -> &[NamedColor] {
        let Some(group) = self.current_group() else {
            return &[];
        };
        match self.mode {
            WidgetMode::Mini => &group.colors[..group.colors.len().min(MINI_WALL_LIMIT)],
            WidgetMode::Full => &group.colors,
        }
    }

    pub fn chips(&self) -> Vec<WallChip<'_>> {
        self.visible_colors()
            .iter()
            .filter_map(|named| {
                let color = named_color_value(named)?;
                Some(WallChip {
                    name: &named.name,
                    color,
                    text_color: color.text_color(),
                })
            })
            .collect()
    }

    /// Advance the rotation if its interval elapsed. Returns `true` when the
    /// group changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(timer) = self.rotation.as_mut() else {
            return false;
        };
        if !timer.poll(now) {
            return false;
        }
        timer.start(now);
        self.next_group();
        debug!(group = self.group_index, "Rotated color wall");
        true
    }

    /// Copy a visible chip and publish it as the last color.
    pub fn pick(&mut self, index: usize, clipboard: &mut dyn Clipboard) -> Option<Color> {
        let color = self.visible_colors().get(index).and_then(named_color_value)?;
        clipboard.copy_text(&color.to_hex());
        self.storage.set_last_color(color);
        Some(color)
    }

    pub fn unmount(&mut self) {
        if let Some(timer) = self.rotation.as_mut() {
            timer.cancel();
        }
        self.rotation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::embedded_catalog;
    use colorfun_util::{InMemoryStore, MemoryClipboard};

    fn storage() -> SessionStorage {
        SessionStorage::new(Arc::new(InMemoryStore::new()))
    }

    fn catalog() -> Arc<NamedColorCatalog> {
        Arc::new(embedded_catalog().unwrap())
    }

    #[test]
    fn mini_wall_caps_visible_colors() {
        let catalog = catalog();
        let largest = catalog
            .groups
            .iter()
            .position(|group| group.colors.len() > MINI_WALL_LIMIT)
            .unwrap();
        let mut mini = ColorWall::mount(Arc::clone(&catalog), WidgetMode::Mini, storage(), Instant::now());
        mini.select_group(largest);
        assert_eq!(mini.visible_colors().len(), MINI_WALL_LIMIT);

        let mut full = ColorWall::mount(catalog, WidgetMode::Full, storage(), Instant::now());
        full.select_group(largest);
        assert!(full.visible_colors().len() > MINI_WALL_LIMIT);
    }

    #[test]
    fn group_selection_wraps() {
        let catalog = catalog();
        let count = catalog.groups.len();
        let mut wall = ColorWall::mount(catalog, WidgetMode::Full, storage(), Instant::now());
        wall.select_group(count + 2);
        assert_eq!(wall.group_index(), 2);
        wall.select_group(count - 1);
        wall.next_group();
        assert_eq!(wall.group_index(), 0);
    }

    #[test]
    fn mini_wall_rotates_on_interval() {
        let start = Instant::now();
        let mut wall = ColorWall::mount(catalog(), WidgetMode::Mini, storage(), start);
        assert!(!wall.tick(start + Duration::from_millis(2499)));
        assert!(wall.tick(start + ROTATION_INTERVAL));
        assert_eq!(wall.group_index(), 1);
        assert!(wall.tick(start + ROTATION_INTERVAL * 2));
        assert_eq!(wall.group_index(), 2);

        wall.unmount();
        assert!(!wall.tick(start + ROTATION_INTERVAL * 10));
    }

    #[test]
    fn full_wall_does_not_rotate() {
        let start = Instant::now();
        let mut wall = ColorWall::mount(catalog(), WidgetMode::Full, storage(), start);
        assert!(!wall.tick(start + ROTATION_INTERVAL * 3));
        assert_eq!(wall.group_index(), 0);
    }

    #[test]
    fn pick_publishes_last_color() {
        let storage = storage();
        let mut wall = ColorWall::mount(catalog(), WidgetMode::Full, storage.clone(), Instant::now());
        let mut clipboard = MemoryClipboard::new();
        let first = wall.visible_colors()[0].clone();

        let picked = wall.pick(0, &mut clipboard).unwrap();
        assert_eq!(picked.to_hex(), first.hex);
        assert_eq!(clipboard.copied(), vec![first.hex.clone()]);
        assert_eq!(storage.last_color(), Some(picked));
        assert!(wall.pick(999, &mut clipboard).is_none());
    }

    #[test]
    fn empty_catalog_renders_nothing() {
        let mut wall = ColorWall::mount(
            Arc::new(NamedColorCatalog::default()),
            WidgetMode::Mini,
            storage(),
            Instant::now(),
        );
        assert!(wall.current_group().is_none());
        assert!(wall.visible_colors().is_empty());
        assert!(wall.group_label(Language::Es).is_none());
        wall.next_group();
        assert_eq!(wall.group_index(), 0);
    }

    #[test]
    fn chips_carry_readable_text_color() {
        let catalog = Arc::new(NamedColorCatalog {
            groups: vec![NamedColorGroup {
                group: String::new(),
                label: String::new(),
                colors: vec![
                    NamedColor {
                        name: "Black".into(),
                        hex: "#000000".into(),
                    },
                    NamedColor {
                        name: "White".into(),
                        hex: "#FFFFFF".into(),
                    },
                ],
            }],
        });
        let wall = ColorWall::mount(catalog, WidgetMode::Full, storage(), Instant::now());
        let chips = wall.chips();
        assert_eq!(chips[0].text_color.to_hex(), "#FFFFFF");
        assert_eq!(chips[1].text_color.to_hex(), "#111111");
        assert_eq!(wall.group_label(Language::Es), Some("grupo"));
    }
}
