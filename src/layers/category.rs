//! Category registrations and the marker collections they own
//!
//! A widget is either in flat mode (no categories, one ordered sequence of
//! markers) or categorized mode (one ordered sequence per category label).
//! Moving between the two modes drops every tracked marker.
//! Categorized mode also keeps markers whose label is not registered.

use crate::{layers::marker::Marker, MapError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker image definition shared by every marker of a category.
///
/// Shapes are not checked here; a surface that cannot draw the icon reports
/// it when the first marker of the category is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub url: String,
    pub size: (u32, u32),
    pub origin: (u32, u32),
    pub anchor: (u32, u32),
}

impl Icon {
    pub fn new(url: impl Into<String>, size: (u32, u32)) -> Self {
        Self {
            url: url.into(),
            size,
            origin: (0, 0),
            anchor: (size.0 / 2, size.1),
        }
    }

    pub fn with_origin(mut self, origin: (u32, u32)) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_anchor(mut self, anchor: (u32, u32)) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Markers grouped according to the widget mode.
///
/// In categorized mode, markers whose label is not registered are kept in a
/// separate bucket: they are drawn, bounded and popup-managed like the rest
/// but no legend toggle reaches them.
#[derive(Debug, Clone)]
pub enum MarkerStorage {
    Flat(Vec<Marker>),
    Categorized {
        groups: IndexMap<String, Vec<Marker>>,
        uncategorized: Vec<Marker>,
    },
}

impl Default for MarkerStorage {
    fn default() -> Self {
        MarkerStorage::Flat(Vec::new())
    }
}

impl MarkerStorage {
    fn categorized(groups: IndexMap<String, Vec<Marker>>) -> Self {
        MarkerStorage::Categorized {
            groups,
            uncategorized: Vec::new(),
        }
    }

    pub fn is_categorized(&self) -> bool {
        matches!(self, MarkerStorage::Categorized { .. })
    }

    /// Every marker regardless of mode; category order, then insertion
    /// order, with uncategorized markers last.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> + '_ {
        let (flat, groups) = match self {
            MarkerStorage::Flat(markers) => (markers.iter(), None),
            MarkerStorage::Categorized {
                groups,
                uncategorized,
            } => (uncategorized.iter(), Some(groups.values().flatten())),
        };
        groups.into_iter().flatten().chain(flat)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Marker> + '_ {
        let (flat, groups) = match self {
            MarkerStorage::Flat(markers) => (markers.iter_mut(), None),
            MarkerStorage::Categorized {
                groups,
                uncategorized,
            } => (uncategorized.iter_mut(), Some(groups.values_mut().flatten())),
        };
        groups.into_iter().flatten().chain(flat)
    }

    /// Markers of one category. Always `None` in flat mode.
    pub fn group(&self, label: &str) -> Option<&[Marker]> {
        match self {
            MarkerStorage::Flat(_) => None,
            MarkerStorage::Categorized { groups, .. } => groups.get(label).map(Vec::as_slice),
        }
    }

    pub fn group_mut(&mut self, label: &str) -> Option<&mut Vec<Marker>> {
        match self {
            MarkerStorage::Flat(_) => None,
            MarkerStorage::Categorized { groups, .. } => groups.get_mut(label),
        }
    }

    /// Markers filed under a label that was not registered. Always empty in
    /// flat mode.
    pub fn uncategorized(&self) -> &[Marker] {
        match self {
            MarkerStorage::Flat(_) => &[],
            MarkerStorage::Categorized { uncategorized, .. } => uncategorized,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MarkerStorage::Flat(markers) => markers.len(),
            MarkerStorage::Categorized {
                groups,
                uncategorized,
            } => groups.values().map(Vec::len).sum::<usize>() + uncategorized.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a new marker goes, decided before anything is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Category(String),
    /// Categorized mode, but the label is missing or not registered
    Uncategorized,
    Flat,
}

/// Category label → icon registrations plus the markers filed under them.
#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    icons: IndexMap<String, Icon>,
    markers: MarkerStorage,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overwrites one category.
    ///
    /// The first registration moves the store into categorized mode and
    /// drops any flat markers. Re-registering a label keeps its position in
    /// the listing but starts it with an empty marker sequence.
    pub fn register_category(&mut self, label: impl Into<String>, icon: Icon) {
        let label = label.into();

        if let MarkerStorage::Flat(markers) = &self.markers {
            if !markers.is_empty() {
                log::debug!(
                    "switching to categorized mode, forgetting {} flat markers",
                    markers.len()
                );
            }
            self.markers = MarkerStorage::categorized(IndexMap::new());
        }

        if let MarkerStorage::Categorized { groups, .. } = &mut self.markers {
            groups.insert(label.clone(), Vec::new());
        }
        self.icons.insert(label, icon);
    }

    /// Replaces the whole category set and every marker with it.
    ///
    /// An empty set reverts the store to flat mode.
    pub fn register_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = (S, Icon)>,
        S: Into<String>,
    {
        self.icons = categories
            .into_iter()
            .map(|(label, icon)| (label.into(), icon))
            .collect();

        if self.icons.is_empty() {
            self.markers = MarkerStorage::Flat(Vec::new());
        } else {
            self.markers = MarkerStorage::categorized(
                self.icons.keys().map(|label| (label.clone(), Vec::new())).collect(),
            );
        }
    }

    /// Registered labels in insertion order, with or without markers.
    pub fn list_categories(&self) -> Vec<&str> {
        self.icons.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.icons.contains_key(label)
    }

    pub fn icon(&self, label: &str) -> Option<&Icon> {
        self.icons.get(label)
    }

    pub fn is_categorized(&self) -> bool {
        self.markers.is_categorized()
    }

    /// Empties categories and markers, reverting to flat mode.
    pub fn clear_all(&mut self) {
        self.icons.clear();
        self.markers = MarkerStorage::Flat(Vec::new());
    }

    /// Whether [`CategoryStore::resolve`] would drop the tracked markers.
    pub fn resolve_clears(&self) -> bool {
        self.icons.is_empty() && self.markers.is_categorized()
    }

    /// Decides where a marker for `category` would be filed.
    ///
    /// With no categories registered the marker is flat, and a store left in
    /// categorized mode is cleared to confirm flat mode. With categories
    /// registered, a missing or unregistered label lands in the
    /// uncategorized bucket.
    pub fn resolve(&mut self, category: Option<&str>) -> Placement {
        if let Some(label) = category.filter(|label| self.icons.contains_key(*label)) {
            return Placement::Category(label.to_string());
        }

        if self.icons.is_empty() {
            if self.markers.is_categorized() {
                self.clear_all();
            }
            return Placement::Flat;
        }

        if let Some(label) = category {
            log::debug!("'{}' is not a registered category", label);
        }
        Placement::Uncategorized
    }

    /// Files a marker at a placement obtained from [`CategoryStore::resolve`].
    pub fn insert(&mut self, placement: &Placement, marker: Marker) -> Result<()> {
        match (placement, &mut self.markers) {
            (Placement::Flat, MarkerStorage::Flat(markers)) => {
                markers.push(marker);
                Ok(())
            }
            (Placement::Category(label), MarkerStorage::Categorized { groups, .. }) => {
                groups.entry(label.clone()).or_default().push(marker);
                Ok(())
            }
            (Placement::Uncategorized, MarkerStorage::Categorized { uncategorized, .. }) => {
                uncategorized.push(marker);
                Ok(())
            }
            (Placement::Flat, MarkerStorage::Categorized { .. }) => Err(MapError::UnknownCategory(
                "<flat>".to_string(),
            )),
            (Placement::Uncategorized, MarkerStorage::Flat(_)) => Err(MapError::UnknownCategory(
                "<uncategorized>".to_string(),
            )),
            (Placement::Category(label), MarkerStorage::Flat(_)) => {
                Err(MapError::UnknownCategory(label.clone()))
            }
        }
    }

    pub fn markers(&self) -> &MarkerStorage {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerStorage {
        &mut self.markers
    }
}
