//! Headless map surface
//!
//! Keeps marker state in memory and records every call it receives, so the
//! controller can run server-side, in a CLI, or under test without a map
//! engine.

use crate::{
    core::{
        config::SurfaceOptions,
        geo::{LatLng, LatLngBounds},
    },
    layers::marker::{MarkerAnimation, MarkerId, MarkerOptions},
    prelude::HashMap,
    traits::MarkerMapSurface,
    MapError, Result,
};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ApplyOptions(SurfaceOptions),
    AddMarker(MarkerId),
    SetVisible(MarkerId, bool),
    SetAnimation(MarkerId, Option<MarkerAnimation>),
    OpenPopup(MarkerId),
    ClosePopup(MarkerId),
    SetCenter(LatLng),
    FitBounds(LatLngBounds),
}

/// What the surface currently shows for one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarker {
    pub options: MarkerOptions,
    pub visible: bool,
    pub animation: Option<MarkerAnimation>,
    pub popup: Option<String>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    markers: HashMap<MarkerId, RenderedMarker>,
    options: Option<SurfaceOptions>,
    center: Option<LatLng>,
    fitted: Option<LatLngBounds>,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&RenderedMarker> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn visible_count(&self) -> usize {
        self.markers.values().filter(|m| m.visible).count()
    }

    /// Markers whose popup is currently open
    pub fn open_popups(&self) -> Vec<MarkerId> {
        let mut open: Vec<_> = self
            .markers
            .iter()
            .filter(|(_, m)| m.popup.is_some())
            .map(|(id, _)| *id)
            .collect();
        open.sort();
        open
    }

    pub fn options(&self) -> Option<&SurfaceOptions> {
        self.options.as_ref()
    }

    /// Centre last requested through `apply_options` or `set_center`
    pub fn center(&self) -> Option<LatLng> {
        self.center
    }

    pub fn fitted_bounds(&self) -> Option<&LatLngBounds> {
        self.fitted.as_ref()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn with_marker(&mut self, id: MarkerId, f: impl FnOnce(&mut RenderedMarker)) {
        match self.markers.get_mut(&id) {
            Some(marker) => f(marker),
            None => log::warn!("surface has no {}", id),
        }
    }
}

impl MarkerMapSurface for RecordingSurface {
    fn apply_options(&mut self, options: &SurfaceOptions) {
        self.center = Some(options.center);
        self.options = Some(options.clone());
        self.calls.push(SurfaceCall::ApplyOptions(options.clone()));
    }

    fn add_marker(&mut self, options: &MarkerOptions) -> Result<MarkerId> {
        if let Some(icon) = &options.icon {
            if icon.url.trim().is_empty() || icon.size.0 == 0 || icon.size.1 == 0 {
                return Err(MapError::Render(format!(
                    "cannot draw icon {:?} for '{}'",
                    icon.url, options.title
                )));
            }
        }

        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            RenderedMarker {
                options: options.clone(),
                visible: options.visible,
                animation: options.animation,
                popup: None,
            },
        );
        self.calls.push(SurfaceCall::AddMarker(id));
        Ok(id)
    }

    fn set_marker_visible(&mut self, marker: MarkerId, visible: bool) {
        self.with_marker(marker, |m| m.visible = visible);
        self.calls.push(SurfaceCall::SetVisible(marker, visible));
    }

    fn set_marker_animation(&mut self, marker: MarkerId, animation: Option<MarkerAnimation>) {
        self.with_marker(marker, |m| m.animation = animation);
        self.calls.push(SurfaceCall::SetAnimation(marker, animation));
    }

    fn open_popup(&mut self, marker: MarkerId, content: &str) {
        self.with_marker(marker, |m| m.popup = Some(content.to_string()));
        self.calls.push(SurfaceCall::OpenPopup(marker));
    }

    fn close_popup(&mut self, marker: MarkerId) {
        self.with_marker(marker, |m| m.popup = None);
        self.calls.push(SurfaceCall::ClosePopup(marker));
    }

    fn set_center(&mut self, center: LatLng) {
        self.center = Some(center);
        self.calls.push(SurfaceCall::SetCenter(center));
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.fitted = Some(bounds.clone());
        self.calls.push(SurfaceCall::FitBounds(bounds.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::category::Icon;

    fn options(icon: Option<Icon>) -> MarkerOptions {
        MarkerOptions {
            position: LatLng::new(-37.8, 144.9),
            title: "Cafe".to_string(),
            icon,
            visible: true,
            animation: None,
        }
    }

    #[test]
    fn test_add_marker_assigns_ids() {
        let mut surface = RecordingSurface::new();
        let first = surface.add_marker(&options(None)).unwrap();
        let second = surface.add_marker(&options(None)).unwrap();

        assert_ne!(first, second);
        assert_eq!(surface.marker_count(), 2);
        assert_eq!(surface.visible_count(), 2);
    }

    #[test]
    fn test_malformed_icon_is_rejected() {
        let mut surface = RecordingSurface::new();
        let result = surface.add_marker(&options(Some(Icon::new("", (50, 33)))));

        assert!(matches!(result, Err(MapError::Render(_))));
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_popup_tracking() {
        let mut surface = RecordingSurface::new();
        let id = surface.add_marker(&options(None)).unwrap();

        surface.open_popup(id, "<h4>Cafe</h4>");
        assert_eq!(surface.open_popups(), vec![id]);
        surface.close_popup(id);
        assert!(surface.open_popups().is_empty());
    }
}
