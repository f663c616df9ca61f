//! Container hit testing
//!
//! Priority: header buttons, resize corners, header band, resize edges,
//! then content.

use crate::config::DashboardConfig;
use crate::math::{ScreenRect, Vec2};
use super::{ResizeHandle, WidgetRegion};

/// Pixel sizes of a container's interactive chrome
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitStyle {
    pub header_height: f32,
    pub handle_size: f32,
    pub button_size: f32,
}

impl Default for HitStyle {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl HitStyle {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            header_height: config.header_height_px,
            handle_size: config.resize_handle_px,
            button_size: config.button_size_px,
        }
    }

    #[inline]
    fn button_padding(&self) -> f32 {
        ((self.header_height - self.button_size) / 2.0).max(0.0)
    }

    /// Right-most header button
    pub fn settings_button_rect(&self, rect: ScreenRect) -> ScreenRect {
        let pad = self.button_padding();
        ScreenRect::new(
            rect.right() - pad - self.button_size,
            rect.y + pad,
            self.button_size,
            self.button_size,
        )
    }

    /// Header button left of settings
    pub fn minimize_button_rect(&self, rect: ScreenRect) -> ScreenRect {
        let settings = self.settings_button_rect(rect);
        ScreenRect::new(
            settings.x - self.button_padding() - self.button_size,
            settings.y,
            self.button_size,
            self.button_size,
        )
    }

    #[inline]
    fn corner_size(&self) -> f32 {
        self.handle_size * 2.0
    }
}

/// Find which region of a container lies under `pos`
pub fn hit_test(rect: ScreenRect, pos: Vec2, style: &HitStyle) -> Option<WidgetRegion> {
    if !rect.contains(pos) {
        return None;
    }

    if style.settings_button_rect(rect).contains(pos) {
        return Some(WidgetRegion::SettingsButton);
    }
    if style.minimize_button_rect(rect).contains(pos) {
        return Some(WidgetRegion::MinimizeButton);
    }

    if let Some(handle) = hit_test_corners(rect, pos, style.corner_size()) {
        return Some(WidgetRegion::Resize(handle));
    }

    // Header band sits below the north edge strip
    let in_header = pos.y >= rect.y + style.handle_size && pos.y < rect.y + style.header_height;
    if in_header {
        return Some(WidgetRegion::DragHandle);
    }

    if let Some(handle) = hit_test_edges(rect, pos, style.handle_size) {
        return Some(WidgetRegion::Resize(handle));
    }

    Some(WidgetRegion::Content)
}

fn hit_test_corners(rect: ScreenRect, pos: Vec2, size: f32) -> Option<ResizeHandle> {
    let left = pos.x < rect.x + size;
    let right = pos.x > rect.right() - size;
    let top = pos.y < rect.y + size;
    let bottom = pos.y > rect.bottom() - size;

    match (top, bottom, left, right) {
        (true, _, true, _) => Some(ResizeHandle::NW),
        (true, _, _, true) => Some(ResizeHandle::NE),
        (_, true, true, _) => Some(ResizeHandle::SW),
        (_, true, _, true) => Some(ResizeHandle::SE),
        _ => None,
    }
}

fn hit_test_edges(rect: ScreenRect, pos: Vec2, size: f32) -> Option<ResizeHandle> {
    if pos.y < rect.y + size {
        return Some(ResizeHandle::N);
    }
    if pos.y > rect.bottom() - size {
        return Some(ResizeHandle::S);
    }
    if pos.x < rect.x + size {
        return Some(ResizeHandle::W);
    }
    if pos.x > rect.right() - size {
        return Some(ResizeHandle::E);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2 cells at the default 84px cell, 16px gap, 80px row
    const RECT: ScreenRect = ScreenRect::new(100.0, 50.0, 284.0, 176.0);

    fn hit(x: f32, y: f32) -> Option<WidgetRegion> {
        hit_test(RECT, Vec2::new(100.0 + x, 50.0 + y), &HitStyle::default())
    }

    #[test]
    fn test_outside() {
        assert_eq!(hit(-1.0, 10.0), None);
        assert_eq!(hit(284.0, 10.0), None);
    }

    #[test]
    fn test_buttons_win() {
        assert_eq!(hit(260.0, 12.0), Some(WidgetRegion::SettingsButton));
        assert_eq!(hit(230.0, 12.0), Some(WidgetRegion::MinimizeButton));
        // inside the NE corner square but on the button
        assert_eq!(hit(275.0, 10.0), Some(WidgetRegion::SettingsButton));
    }

    #[test]
    fn test_corners() {
        assert_eq!(hit(2.0, 2.0), Some(WidgetRegion::Resize(ResizeHandle::NW)));
        assert_eq!(hit(282.0, 2.0), Some(WidgetRegion::Resize(ResizeHandle::NE)));
        assert_eq!(hit(2.0, 174.0), Some(WidgetRegion::Resize(ResizeHandle::SW)));
        assert_eq!(hit(282.0, 174.0), Some(WidgetRegion::Resize(ResizeHandle::SE)));
    }

    #[test]
    fn test_header_and_edges() {
        assert_eq!(hit(100.0, 20.0), Some(WidgetRegion::DragHandle));
        assert_eq!(hit(100.0, 3.0), Some(WidgetRegion::Resize(ResizeHandle::N)));
        assert_eq!(hit(100.0, 172.0), Some(WidgetRegion::Resize(ResizeHandle::S)));
        assert_eq!(hit(3.0, 100.0), Some(WidgetRegion::Resize(ResizeHandle::W)));
        assert_eq!(hit(280.0, 100.0), Some(WidgetRegion::Resize(ResizeHandle::E)));
    }

    #[test]
    fn test_content() {
        assert_eq!(hit(140.0, 100.0), Some(WidgetRegion::Content));
    }
}
