//! Browser page bindings
//!
//! [`WebPage`] implements [`PageDom`] over the live document: the legend is
//! every element carrying the category attribute, and the requested category
//! comes from `window.location.hash`.

use crate::{
    core::constants::{ACTIVE_CLASS, CATEGORY_ATTRIBUTE},
    traits::PageDom,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    /// Binds to the current window, if running in a browser with a document.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn tagged_elements(&self) -> Vec<Element> {
        let selector = format!("[{}]", CATEGORY_ATTRIBUTE);
        match self.document.query_selector_all(&selector) {
            Ok(nodes) => (0..nodes.length())
                .filter_map(|index| nodes.item(index))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(e) => {
                log::warn!("legend lookup failed: {:?}", e);
                Vec::new()
            }
        }
    }
}

impl PageDom for WebPage {
    fn category_tags(&self) -> Vec<String> {
        self.tagged_elements()
            .iter()
            .filter_map(|element| element.get_attribute(CATEGORY_ATTRIBUTE))
            .collect()
    }

    fn any_category_tag_visible(&self) -> bool {
        // offsetParent is null for elements that are not rendered
        self.tagged_elements().iter().any(|element| {
            element
                .dyn_ref::<HtmlElement>()
                .map_or(false, |html| html.offset_parent().is_some())
        })
    }

    fn toggle_active(&mut self, label: &str) {
        for element in self.tagged_elements() {
            if element.get_attribute(CATEGORY_ATTRIBUTE).as_deref() != Some(label) {
                continue;
            }
            if let Err(e) = element.class_list().toggle(ACTIVE_CLASS) {
                log::warn!("could not toggle legend class for '{}': {:?}", label, e);
            }
        }
    }

    fn location_hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }
}
