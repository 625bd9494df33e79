//! Runtime settings.
//!
//! upclick has no config file; everything is a constant with a CLI override.
//! [`Settings`] is built once at startup and shared read-only with the
//! worker.

use std::time::Duration;

/// Maximum interval between two left-button-downs for them to count as one
/// logical double-click.
pub const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(250);

/// Window class of File Explorer's top-level browser windows. Clicks whose
/// owning top-level window has any other class are ignored outright.
pub const TARGET_WINDOW_CLASS: &str = "CabinetWClass";

/// How many generations (including the hit element) the ancestry walk
/// inspects before giving up and calling the spot blank.
pub const MAX_WALK_DEPTH: usize = 5;

/// How long the worker waits on the queue before re-checking the shutdown
/// flag. Not latency-critical.
pub const QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Control types treated as content even when the element does not expose
/// the selection-item pattern. Fallback list only; the pattern probe is the
/// primary signal.
pub const CONTENT_CONTROL_TYPES: &[&str] =
    &["ListItem", "TreeItem", "Image", "Text", "Edit", "Hyperlink"];

/// Virtual-key chord for "navigate to parent folder": VK_MENU + VK_UP
/// (Alt+Up). Raw VK codes so the list stays host-independent.
pub const PARENT_NAV_CHORD: &[u16] = &[0x12, 0x26];

/// All knobs in one place.
#[derive(Debug, Clone)]
pub struct Settings {
    pub double_click_threshold: Duration,
    pub target_window_class: String,
    pub max_walk_depth: usize,
    pub content_types: Vec<String>,
    pub poll_interval: Duration,
    pub nav_chord: Vec<u16>,
    /// Log every probed generation of the ancestry walk.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            double_click_threshold: DOUBLE_CLICK_THRESHOLD,
            target_window_class: TARGET_WINDOW_CLASS.to_owned(),
            max_walk_depth: MAX_WALK_DEPTH,
            content_types: CONTENT_CONTROL_TYPES
                .iter()
                .map(|t| (*t).to_owned())
                .collect(),
            poll_interval: QUEUE_POLL_INTERVAL,
            nav_chord: PARENT_NAV_CHORD.to_vec(),
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.double_click_threshold, DOUBLE_CLICK_THRESHOLD);
        assert_eq!(s.target_window_class, TARGET_WINDOW_CLASS);
        assert_eq!(s.max_walk_depth, 5);
        assert_eq!(s.content_types.len(), CONTENT_CONTROL_TYPES.len());
        assert_eq!(s.nav_chord, vec![0x12, 0x26]);
        assert!(!s.debug);
    }

    #[test]
    fn test_content_types_cover_fallback_list() {
        for t in ["ListItem", "TreeItem", "Image", "Text", "Edit", "Hyperlink"] {
            assert!(CONTENT_CONTROL_TYPES.contains(&t), "missing {t}");
        }
    }
}
