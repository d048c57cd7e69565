use crate::{
    core::{
        config::MapOptions,
        geo::{LatLng, LatLngBounds},
    },
    input::{
        args::MarkerRequest,
        events::{SurfaceEvent, TouchEventType},
        touch::TouchScrollPassthrough,
    },
    layers::{
        animation::AnimationManager,
        category::{CategoryStore, Icon, Placement},
        marker::{Location, Marker, MarkerAnimation, MarkerId, MarkerOptions},
    },
    traits::{GeolocationError, GeolocationProvider, MarkerMapSurface, PageDom},
    MapError, Result,
};
use std::time::Duration;

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// The surface has not finished its first render
    Uninitialized,
    /// First render done, no markers yet
    MapReady,
    /// First render done and at least one marker exists
    Populated,
}

/// What is known about where the map should be centred.
#[derive(Debug, Clone, PartialEq)]
pub enum CenterState {
    /// Still on the configured centre; no lookup attempted
    Configured,
    /// Re-centred on the device location
    Located(LatLng),
    /// A lookup was made and failed; the configured centre stays
    Unknown(GeolocationError),
}

/// Result of handling a [`SurfaceEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// First render: the initial filter was applied. `geolocate` says whether
    /// the host should follow up with [`MapMarkerController::discover_center`].
    Ready { geolocate: bool },
    PopupOpened(MarkerId),
    PopupClosed(MarkerId),
    CategoryToggled(String),
    Ignored,
}

/// Drives categorized markers on a map surface.
///
/// Owns the category registrations and markers, keeps the surface and the
/// page legend in sync with them, and enforces that at most one popup is
/// open at a time.
pub struct MapMarkerController<S, D> {
    surface: S,
    page: D,
    options: MapOptions,
    categories: CategoryStore,
    animations: AnimationManager,
    initialized: bool,
    center: CenterState,
    last_created: Option<MarkerId>,
    touch: Option<TouchScrollPassthrough>,
}

impl<S: MarkerMapSurface, D: PageDom> MapMarkerController<S, D> {
    /// Creates a controller for a pointer-driven device and applies the
    /// options to the surface.
    pub fn new(surface: S, page: D, options: MapOptions) -> Self {
        Self::with_touch_device(surface, page, options, false)
    }

    /// Creates a controller, disabling map dragging on touch devices when
    /// scrollwheel zoom is off.
    ///
    /// With dragging disabled, vertical swipes over the map are routed
    /// through a [`TouchScrollPassthrough`]; feed touches to
    /// [`MapMarkerController::handle_touch`] and scroll the page by the
    /// amount it returns.
    pub fn with_touch_device(mut surface: S, page: D, options: MapOptions, touch_device: bool) -> Self {
        let surface_options = options.surface_options(touch_device);
        surface.apply_options(&surface_options);
        let touch = (touch_device && !surface_options.draggable).then(TouchScrollPassthrough::new);

        Self {
            surface,
            page,
            options,
            categories: CategoryStore::new(),
            animations: AnimationManager::new(),
            initialized: false,
            center: CenterState::Configured,
            last_created: None,
            touch,
        }
    }

    /// Routes a touch over the map to the scroll passthrough. Returns the
    /// page scroll to apply, or `None` when the map handles its own drags.
    pub fn handle_touch(&mut self, event: TouchEventType, page_y: f64) -> Option<f64> {
        self.touch.as_mut()?.handle(event, page_y)
    }

    pub fn touch_passthrough(&self) -> Option<&TouchScrollPassthrough> {
        self.touch.as_ref()
    }

    /// Adds or overwrites a category. See [`CategoryStore::register_category`].
    pub fn register_category(&mut self, label: impl Into<String>, icon: Icon) -> &mut Self {
        let label = label.into();
        if self.categories.is_categorized() {
            self.release_markers(|m| m.category() == Some(label.as_str()));
        } else {
            self.release_markers(|_| true);
        }
        self.categories.register_category(label, icon);
        self
    }

    /// Replaces every category and marker. See [`CategoryStore::register_categories`].
    pub fn register_categories<I, L>(&mut self, categories: I) -> &mut Self
    where
        I: IntoIterator<Item = (L, Icon)>,
        L: Into<String>,
    {
        self.release_markers(|_| true);
        self.categories.register_categories(categories);
        self.animations.cancel_all();
        self
    }

    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.list_categories()
    }

    /// Forgets every category and marker and returns to flat mode.
    pub fn clear_all(&mut self) -> &mut Self {
        self.release_markers(|_| true);
        self.categories.clear_all();
        self.animations.cancel_all();
        self
    }

    /// Adds a marker to a registered category.
    ///
    /// With no categories registered at all the marker is kept in flat mode.
    /// A label that is not registered still draws the marker, without an
    /// icon, in the uncategorized bucket.
    /// The marker is only shown when `visible` is set, and the entrance
    /// animation only plays on a visible marker.
    pub fn create_marker(
        &mut self,
        category: &str,
        position: LatLng,
        location: &Location,
        visible: bool,
        animation: Option<MarkerAnimation>,
    ) -> Result<&mut Self> {
        self.place_marker(Some(category), position, location, visible, animation)?;
        Ok(self)
    }

    /// Adds a marker outside any category, drawn without an icon.
    pub fn create_uncategorized_marker(
        &mut self,
        position: LatLng,
        location: &Location,
        visible: bool,
        animation: Option<MarkerAnimation>,
    ) -> Result<&mut Self> {
        self.place_marker(None, position, location, visible, animation)?;
        Ok(self)
    }

    /// Executes a request built from positional arguments.
    pub fn create_from_request(&mut self, request: &MarkerRequest) -> Result<&mut Self> {
        self.place_marker(
            request.category.as_deref(),
            request.position,
            &request.location,
            request.visible,
            request.animation,
        )?;
        Ok(self)
    }

    fn place_marker(
        &mut self,
        category: Option<&str>,
        position: LatLng,
        location: &Location,
        visible: bool,
        animation: Option<MarkerAnimation>,
    ) -> Result<MarkerId> {
        location.validate()?;
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                position.lat, position.lng
            )));
        }

        if self.categories.resolve_clears() {
            self.release_markers(|_| true);
        }
        let placement = self.categories.resolve(category);
        let icon = match &placement {
            Placement::Category(label) => self.categories.icon(label).cloned(),
            Placement::Uncategorized | Placement::Flat => None,
        };

        let options = MarkerOptions {
            position,
            title: location.name.clone(),
            icon,
            visible,
            animation: if visible { animation } else { None },
        };
        let id = self.surface.add_marker(&options)?;

        let mut marker = Marker::new(id, position, location).with_visible(visible);
        if let Placement::Category(label) = &placement {
            marker = marker.with_category(label.clone());
        }
        self.categories.insert(&placement, marker)?;
        self.last_created = Some(id);

        log::debug!(
            "created {} '{}' in {:?} (visible: {})",
            id,
            location.name,
            placement,
            visible
        );
        Ok(id)
    }

    /// Toggles the popup of a clicked marker.
    ///
    /// Opening closes whichever other popup is open first. Returns whether
    /// the popup is now open, or `None` for an untracked marker.
    pub fn handle_marker_click(&mut self, id: MarkerId) -> Option<bool> {
        let was_open = self
            .categories
            .markers()
            .iter()
            .find(|m| m.id() == id)?
            .popup()
            .is_open();

        if was_open {
            if let Some(marker) = self.categories.markers_mut().iter_mut().find(|m| m.id() == id) {
                marker.popup_mut().close();
            }
            self.surface.close_popup(id);
            return Some(false);
        }

        self.close_popups_except(id);

        let marker = self
            .categories
            .markers_mut()
            .iter_mut()
            .find(|m| m.id() == id)?;
        marker.popup_mut().open();
        self.surface.open_popup(id, marker.popup().content());
        Some(true)
    }

    fn close_popups_except(&mut self, except: MarkerId) {
        for marker in self
            .categories
            .markers_mut()
            .iter_mut()
            .filter(|m| m.id() != except && m.popup().is_open())
        {
            marker.popup_mut().close();
            self.surface.close_popup(marker.id());
        }
    }

    /// Closes the popups and settles the animations of markers that are
    /// about to be forgotten, so the surface keeps no state the controller
    /// can no longer reach.
    fn release_markers<F>(&mut self, dropped: F)
    where
        F: Fn(&Marker) -> bool,
    {
        for marker in self.categories.markers_mut().iter_mut().filter(|m| dropped(m)) {
            if marker.popup().is_open() {
                marker.popup_mut().close();
                self.surface.close_popup(marker.id());
            }
            if self.animations.cancel(marker.id()) {
                self.surface.set_marker_animation(marker.id(), None);
            }
        }
    }

    /// Flips the visibility of every marker in `label` and toggles the
    /// matching legend elements.
    ///
    /// Markers being revealed play `animation` for a fixed duration; their
    /// visibility changes immediately either way. Legend elements are
    /// toggled even when `label` is not a category.
    pub fn toggle_category(&mut self, label: &str, animation: Option<MarkerAnimation>) {
        if let Some(markers) = self.categories.markers_mut().group_mut(label) {
            for marker in markers.iter_mut() {
                let visible = !marker.is_visible();
                if visible {
                    if let Some(animation) = animation {
                        self.surface.set_marker_animation(marker.id(), Some(animation));
                        self.animations.schedule_clear(marker.id());
                    }
                }
                marker.set_visible(visible);
                self.surface.set_marker_visible(marker.id(), visible);
            }
            log::debug!("toggled {} markers in '{}'", markers.len(), label);
        }

        self.page.toggle_active(label);
    }

    /// Toggles every category that appears in the page legend, once per
    /// distinct label in first-seen order. Categories without a legend
    /// element are left alone.
    pub fn toggle_all_categories(&mut self) -> Vec<String> {
        let mut toggled: Vec<String> = Vec::new();
        for label in self.page.category_tags() {
            if !toggled.contains(&label) {
                self.toggle_category(&label, None);
                toggled.push(label);
            }
        }
        toggled
    }

    /// Applies the location fragment as a one-category filter.
    ///
    /// Markers start hidden, so toggling means revealing. A fragment naming a
    /// category reveals only that category, provided the legend is displayed;
    /// anything else reveals every legend category. Meant to run once per
    /// page load: a second call toggles everything back.
    pub fn apply_initial_filter(&mut self) {
        let hash = self.page.location_hash();
        let requested = hash.strip_prefix('#').unwrap_or(&hash);

        if !requested.is_empty()
            && self.page.any_category_tag_visible()
            && self.categories.contains(requested)
        {
            log::info!("initial filter: only '{}'", requested);
            let label = requested.to_string();
            self.toggle_category(&label, None);
        } else {
            log::info!("initial filter: all categories");
            self.toggle_all_categories();
        }
    }

    /// Fits the viewport around every marker, whatever the mode.
    pub fn fit_bounds_to_markers(&mut self) -> Result<LatLngBounds> {
        let positions: Vec<LatLng> = self.categories.markers().iter().map(Marker::position).collect();
        let bounds = LatLngBounds::from_points(&positions).ok_or(MapError::NoMarkers)?;
        self.surface.fit_bounds(&bounds);
        Ok(bounds)
    }

    /// A hidden legend means a narrow, mobile layout
    pub fn is_mobile(&self) -> bool {
        !self.page.any_category_tag_visible()
    }

    /// Fits every marker on screen, except on mobile layouts.
    pub fn finalize(&mut self) -> Result<Option<LatLngBounds>> {
        if self.is_mobile() {
            return Ok(None);
        }
        self.fit_bounds_to_markers().map(Some)
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) -> EventOutcome {
        match event {
            SurfaceEvent::TilesLoaded => {
                if self.initialized {
                    return EventOutcome::Ignored;
                }
                self.apply_initial_filter();
                self.initialized = true;
                EventOutcome::Ready {
                    geolocate: self.options.use_geolocation,
                }
            }
            SurfaceEvent::MarkerClicked(id) => match self.handle_marker_click(id) {
                Some(true) => EventOutcome::PopupOpened(id),
                Some(false) => EventOutcome::PopupClosed(id),
                None => EventOutcome::Ignored,
            },
            SurfaceEvent::LegendClicked(label) => {
                self.toggle_category(&label, None);
                EventOutcome::CategoryToggled(label)
            }
        }
    }

    /// Asks the provider for the device location and re-centres on it.
    ///
    /// A failed lookup is recorded as [`CenterState::Unknown`] and the map
    /// keeps its configured centre. Dropping the returned future abandons
    /// the lookup without touching the controller.
    pub async fn discover_center(&mut self, provider: &dyn GeolocationProvider) -> &CenterState {
        match provider.current_position().await {
            Ok(position) => {
                self.set_center(position);
                self.center = CenterState::Located(position);
            }
            Err(e) => {
                log::info!("device location unavailable: {}", e);
                self.center = CenterState::Unknown(e);
            }
        }
        &self.center
    }

    /// Re-centres the map once it is ready. Returns whether it moved.
    pub fn set_center(&mut self, center: LatLng) -> bool {
        if !self.initialized {
            log::debug!("map not ready, ignoring centre {:?}", center);
            return false;
        }
        self.surface.set_center(center);
        true
    }

    /// Advances pending entrance animations, clearing those that ran their
    /// course. Returns how many were cleared.
    pub fn update(&mut self, elapsed: Duration) -> usize {
        let due = self.animations.update(elapsed);
        for marker in &due {
            self.surface.set_marker_animation(*marker, None);
        }
        due.len()
    }

    /// Discards pending animation clears; the animations keep playing.
    pub fn cancel_animations(&mut self) -> usize {
        self.animations.cancel_all()
    }

    pub fn state(&self) -> MapState {
        if !self.initialized {
            MapState::Uninitialized
        } else if self.categories.markers().is_empty() {
            MapState::MapReady
        } else {
            MapState::Populated
        }
    }

    pub fn center_state(&self) -> &CenterState {
        &self.center
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn animations(&self) -> &AnimationManager {
        &self.animations
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.categories.markers().iter()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers().find(|m| m.id() == id)
    }

    /// Handle of the most recently created marker
    pub fn last_marker(&self) -> Option<MarkerId> {
        self.last_created
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn page(&self) -> &D {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut D {
        &mut self.page
    }
}
