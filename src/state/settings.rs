//! Simulation and canvas toggles owned by the state manager.
//!
//! These are pass-through fields for the presentation layer; only the zoom
//! level has an invariant.

use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Color theme of the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Whether the presentation layer is animating current flow
    pub simulating: bool,
    pub grid_visible: bool,
    pub snap_to_grid: bool,
    zoom: f64,
    pub theme: Theme,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            simulating: false,
            grid_visible: true,
            snap_to_grid: true,
            zoom: 1.0,
            theme: Theme::Light,
        }
    }
}

impl UiSettings {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    /// Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn toggle_grid(&mut self) {
        self.grid_visible = !self.grid_visible;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let mut ui = UiSettings::default();
        ui.set_zoom(12.0);
        assert_eq!(ui.zoom(), MAX_ZOOM);
        ui.set_zoom(0.0);
        assert_eq!(ui.zoom(), MIN_ZOOM);
        ui.set_zoom(f64::NAN);
        assert_eq!(ui.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_toggles() {
        let mut ui = UiSettings::default();
        ui.toggle_theme();
        ui.toggle_grid();
        assert_eq!(ui.theme, Theme::Dark);
        assert!(!ui.grid_visible);
    }
}
