use catmap::{
    prelude::*,
    restaurant_categories,
    ui::surface::SurfaceCall,
    EventOutcome,
};

/// Integration tests driving the controller the way a page does:
/// register categories, create markers, then react to surface and legend
/// events.

type TestMap = MapMarkerController<RecordingSurface, StaticPage>;

fn icon(label: &str) -> Icon {
    Icon::new(format!("/img/{label}.png"), (32, 32))
}

fn new_map(page: StaticPage) -> TestMap {
    MapMarkerController::new(RecordingSurface::new(), page, MapOptions::default())
}

fn legend() -> StaticPage {
    StaticPage::new().with_item("yellow").with_item("blue")
}

fn populated(page: StaticPage) -> TestMap {
    let mut map = new_map(page);
    map.register_categories(vec![("yellow", icon("yellow")), ("blue", icon("blue"))]);
    map.create_marker("yellow", LatLng::new(-37.81, 144.96), &Location::named("Y1"), false, None)
        .unwrap()
        .create_marker("yellow", LatLng::new(-33.87, 151.21), &Location::named("Y2"), false, None)
        .unwrap()
        .create_marker("blue", LatLng::new(-27.47, 153.03), &Location::named("B1"), false, None)
        .unwrap();
    map
}

fn visible_titles(map: &TestMap) -> Vec<String> {
    map.markers()
        .filter(|m| m.is_visible())
        .map(|m| m.title().to_string())
        .collect()
}

#[test]
fn test_register_categories_replaces_set_and_markers() {
    let mut map = populated(legend());
    assert_eq!(map.markers().count(), 3);

    map.register_categories(vec![("red", icon("red")), ("green", icon("green"))]);

    assert_eq!(map.list_categories(), vec!["red", "green"]);
    assert_eq!(map.markers().count(), 0);
}

#[test]
fn test_positional_shift_matches_explicit_null_category() {
    let shifted = PositionalMarkerArgs::new()
        .arg("-31.5")
        .arg("133.4")
        .arg(Location::named("X"))
        .resolve()
        .unwrap();
    let explicit = PositionalMarkerArgs::new()
        .arg(None::<&str>)
        .arg("-31.5")
        .arg("133.4")
        .arg(Location::named("X"))
        .resolve()
        .unwrap();
    assert_eq!(shifted, explicit);

    let mut first = new_map(StaticPage::new());
    let mut second = new_map(StaticPage::new());
    first.create_from_request(&shifted).unwrap();
    second.create_from_request(&explicit).unwrap();

    let a = first.markers().next().unwrap();
    let b = second.markers().next().unwrap();
    assert_eq!(a.position(), LatLng::new(-31.5, 133.4));
    assert_eq!(a.position(), b.position());
    assert_eq!(a.title(), "X");
    assert_eq!(a.category(), b.category());
    assert_eq!(a.is_visible(), b.is_visible());
}

#[test]
fn test_toggle_twice_restores_visibility() {
    let mut map = populated(legend());
    map.toggle_category("blue", None);
    let before = visible_titles(&map);

    map.toggle_category("yellow", Some(MarkerAnimation::Bounce));
    map.toggle_category("yellow", Some(MarkerAnimation::Bounce));

    assert_eq!(visible_titles(&map), before);
    assert_eq!(map.surface().visible_count(), 1);
}

#[test]
fn test_opening_second_popup_closes_first_before_opening() {
    let mut map = populated(legend());
    let ids: Vec<MarkerId> = map.markers().map(|m| m.id()).collect();
    let (a, b) = (ids[0], ids[2]);

    assert_eq!(map.handle_event(SurfaceEvent::MarkerClicked(a)), EventOutcome::PopupOpened(a));
    map.surface_mut().clear_calls();

    assert_eq!(map.handle_event(SurfaceEvent::MarkerClicked(b)), EventOutcome::PopupOpened(b));
    assert_eq!(
        map.surface().calls(),
        &[SurfaceCall::ClosePopup(a), SurfaceCall::OpenPopup(b)]
    );
    assert_eq!(map.surface().open_popups(), vec![b]);
    assert!(!map.marker(a).unwrap().popup().is_open());
}

#[test]
fn test_popup_omits_placeholder_url() {
    let html = render_popup_content(&Location::named("Cafe").with_url("http://"));
    assert_eq!(html, "<h4>Cafe</h4>");
}

#[test]
fn test_popup_directions_from_full_address() {
    let location = Location::named("Cafe").with_address("1 St", "Town", "ST", "1234");
    let html = render_popup_content(&location);

    assert!(html.contains(r#"href="https://maps.google.com?daddr=1%20St%20Town%20ST%201234""#));
    assert!(html.contains("1 St<br>Town ST 1234<br>"));
}

#[test]
fn test_toggle_all_categories_once_per_distinct_label() {
    let page = StaticPage::new()
        .with_item("yellow")
        .with_item("blue")
        .with_item("yellow");
    let mut map = populated(page);

    let toggled = map.toggle_all_categories();

    assert_eq!(toggled, vec!["yellow", "blue"]);
    assert_eq!(map.page().toggles(), ["yellow", "blue"]);
    assert_eq!(map.surface().visible_count(), 3);
}

#[test]
fn test_toggle_all_ignores_categories_without_legend() {
    let mut map = populated(StaticPage::new().with_item("blue"));
    map.toggle_all_categories();
    assert_eq!(visible_titles(&map), vec!["B1"]);
}

#[test]
fn test_initial_filter_unknown_fragment_reveals_all() {
    let mut map = populated(legend().with_hash("#purple"));
    map.apply_initial_filter();
    assert_eq!(visible_titles(&map), vec!["Y1", "Y2", "B1"]);
}

#[test]
fn test_initial_filter_reveals_requested_category() {
    let mut map = populated(legend().with_hash("#blue"));

    assert_eq!(map.handle_event(SurfaceEvent::TilesLoaded), EventOutcome::Ready { geolocate: false });
    assert_eq!(visible_titles(&map), vec!["B1"]);
    assert!(map.page().is_active("blue"));
    assert!(!map.page().is_active("yellow"));

    // ready signal is honoured once
    assert_eq!(map.handle_event(SurfaceEvent::TilesLoaded), EventOutcome::Ignored);
    assert_eq!(visible_titles(&map), vec!["B1"]);
}

#[test]
fn test_initial_filter_ignores_fragment_on_mobile() {
    let mut map = populated(legend().with_hash("#blue").with_legend_visible(false));
    map.apply_initial_filter();
    assert_eq!(visible_titles(&map), vec!["Y1", "Y2", "B1"]);
}

#[test]
fn test_legend_click_toggles_category() {
    let mut map = populated(legend());
    assert_eq!(
        map.handle_event(SurfaceEvent::LegendClicked("yellow".to_string())),
        EventOutcome::CategoryToggled("yellow".to_string())
    );
    assert_eq!(visible_titles(&map), vec!["Y1", "Y2"]);
}

#[test]
fn test_fit_bounds_covers_every_category() {
    let mut map = populated(legend());
    let bounds = map.fit_bounds_to_markers().unwrap();

    assert_eq!(bounds.south_west, LatLng::new(-37.81, 144.96));
    assert_eq!(bounds.north_east, LatLng::new(-27.47, 153.03));
    assert_eq!(map.surface().fitted_bounds(), Some(&bounds));
}

#[test]
fn test_switching_to_flat_mode_clears_markers() {
    let mut map = populated(legend());
    map.register_categories(Vec::<(String, Icon)>::new());

    map.create_uncategorized_marker(LatLng::new(-31.95, 115.86), &Location::named("Flat"), true, None)
        .unwrap();
    assert_eq!(map.markers().count(), 1);
    assert!(!map.categories().is_categorized());
}

#[test]
fn test_uncategorized_marker_drawn_in_categorized_mode() {
    let mut map = populated(legend());
    map.create_uncategorized_marker(LatLng::new(-12.46, 130.84), &Location::named("Z"), true, None)
        .unwrap()
        .create_marker("purple", LatLng::new(-42.88, 147.33), &Location::named("P"), true, None)
        .unwrap();

    assert_eq!(map.surface().marker_count(), 5);
    assert_eq!(map.categories().markers().uncategorized().len(), 2);
    let id = map.last_marker().unwrap();
    assert!(map.surface().marker(id).unwrap().options.icon.is_none());

    let bounds = map.fit_bounds_to_markers().unwrap();
    assert_eq!(bounds.south_west, LatLng::new(-42.88, 130.84));
    assert_eq!(bounds.north_east, LatLng::new(-12.46, 153.03));
}

#[test]
fn test_popup_left_open_by_reregistration_is_closed() {
    let mut map = populated(legend());
    let a = map.markers().next().unwrap().id();
    map.handle_event(SurfaceEvent::MarkerClicked(a));

    map.register_category("yellow", icon("yellow"));
    map.create_marker("yellow", LatLng::new(-34.93, 138.60), &Location::named("Y3"), true, None)
        .unwrap();
    let b = map.last_marker().unwrap();
    map.handle_event(SurfaceEvent::MarkerClicked(b));

    assert_eq!(map.surface().open_popups(), vec![b]);
}

#[test]
fn test_malformed_icon_surfaces_at_marker_creation() {
    let mut map = new_map(StaticPage::new());
    map.register_category("broken", Icon::new("", (0, 0)));

    let result = map.create_marker("broken", LatLng::new(0.0, 0.0), &Location::named("Z"), true, None);
    assert!(matches!(result, Err(MapError::Render(_))));
    assert_eq!(map.markers().count(), 0);
}

#[test]
fn test_restaurant_profile_flow() {
    let options = MapProfile::Restaurant { mobile: false }.resolve();
    let page = StaticPage::new().with_item("thai").with_item("mexican");
    let mut map = MapMarkerController::new(RecordingSurface::new(), page, options);
    map.register_categories(restaurant_categories("/img/"));

    map.create_marker("thai", LatLng::new(29.76, -95.42), &Location::named("Thai Gourmet"), false, None)
        .unwrap()
        .create_marker("mexican", LatLng::new(29.70, -95.40), &Location::named("El Tiempo"), false, None)
        .unwrap();
    map.handle_event(SurfaceEvent::TilesLoaded);

    assert_eq!(map.surface().visible_count(), 2);
    assert!(map.finalize().unwrap().is_some());

    let id = map.last_marker().unwrap();
    let icon = &map.surface().marker(id).unwrap().options.icon;
    assert_eq!(icon.as_ref().map(|i| i.url.as_str()), Some("/img/google-icon-mexican.png"));
}

#[test]
fn test_touch_device_without_scrollwheel_is_not_draggable() {
    let options = MapOptions {
        scrollwheel: false,
        ..MapOptions::default()
    };
    let mut map = MapMarkerController::with_touch_device(RecordingSurface::new(), StaticPage::new(), options, true);
    assert!(!map.surface().options().unwrap().draggable);

    map.handle_touch(TouchEventType::Start, 300.0);
    assert_eq!(map.handle_touch(TouchEventType::Move, 340.0), Some(-40.0));
    map.handle_touch(TouchEventType::End, 340.0);
    assert_eq!(map.handle_touch(TouchEventType::Move, 300.0), None);
}
