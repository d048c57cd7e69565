use crate::traits::PageDom;

/// One element of a category legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    pub label: String,
    pub visible: bool,
    pub active: bool,
}

/// In-memory page: a legend and a location fragment.
///
/// Stands in for the browser page when the widget runs headless.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    items: Vec<LegendItem>,
    hash: String,
    toggles: Vec<String>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a displayed legend element tagged with `label`
    pub fn with_item(mut self, label: impl Into<String>) -> Self {
        self.items.push(LegendItem {
            label: label.into(),
            visible: true,
            active: false,
        });
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Marks every legend element as displayed or not (mobile layouts hide
    /// the legend).
    pub fn with_legend_visible(mut self, visible: bool) -> Self {
        for item in &mut self.items {
            item.visible = visible;
        }
        self
    }

    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    pub fn is_active(&self, label: &str) -> bool {
        self.items.iter().any(|item| item.label == label && item.active)
    }

    /// Labels passed to `toggle_active`, in call order
    pub fn toggles(&self) -> &[String] {
        &self.toggles
    }
}

impl PageDom for StaticPage {
    fn category_tags(&self) -> Vec<String> {
        self.items.iter().map(|item| item.label.clone()).collect()
    }

    fn any_category_tag_visible(&self) -> bool {
        self.items.iter().any(|item| item.visible)
    }

    fn toggle_active(&mut self, label: &str) {
        for item in self.items.iter_mut().filter(|item| item.label == label) {
            item.active = !item.active;
        }
        self.toggles.push(label.to_string());
    }

    fn location_hash(&self) -> String {
        self.hash.clone()
    }
}
