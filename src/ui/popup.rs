use crate::core::constants::{DIRECTIONS_URL, PLACEHOLDER_URL, POPUP_ACTIONS_CLASS};
use crate::layers::marker::Location;

/// Detail panel attached to one marker.
///
/// The content is built once when the marker is created. Whether it is open
/// is tracked here; the controller keeps at most one popup open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    content: String,
    open: bool,
}

impl Popup {
    pub fn new(content: String) -> Self {
        Self {
            content,
            open: false,
        }
    }

    pub fn for_location(location: &Location) -> Self {
        Self::new(render_popup_content(location))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Where the "get directions" link points, if anywhere.
///
/// The full structured address wins when all four parts are present;
/// otherwise the free-form `map` field is used.
pub fn directions_destination(location: &Location) -> Option<String> {
    let parts = [
        non_empty(&location.address),
        non_empty(&location.suburb),
        non_empty(&location.state),
        non_empty(&location.postcode),
    ];

    if parts.iter().all(Option::is_some) {
        let joined = parts.iter().flatten().copied().collect::<Vec<_>>().join(" ");
        let trimmed = joined.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    location
        .map
        .as_deref()
        .map(str::trim)
        .filter(|map| !map.is_empty())
        .map(str::to_string)
}

/// Builds the popup HTML for a location.
///
/// Lines, in order: the name as a heading, the address, the combined
/// suburb/state/postcode line, the URL as a link (skipped when it is only
/// the `http://` placeholder), and a "Get directions" link.
pub fn render_popup_content(location: &Location) -> String {
    let mut html = format!("<h4>{}</h4>", escape_html(&location.name));

    if let Some(address) = non_empty(&location.address) {
        html.push_str(&escape_html(address));
        html.push_str("<br>");
    }

    let locality = [&location.suburb, &location.state, &location.postcode]
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(" ");
    let locality = locality.trim();
    if !locality.is_empty() {
        html.push_str(&escape_html(locality));
        html.push_str("<br>");
    }

    if let Some(url) = non_empty(&location.url).filter(|url| *url != PLACEHOLDER_URL) {
        let url = escape_html(url);
        html.push_str(&format!(r#"<a href="{url}" target="_blank">{url}</a><br>"#));
    }

    if let Some(destination) = directions_destination(location) {
        html.push_str(&format!(
            r#"<br><div class="{POPUP_ACTIONS_CLASS}"><a href="{DIRECTIONS_URL}{}">Get directions</a></div>"#,
            encode_uri_component(&destination)
        ));
    }

    html
}

/// Percent-encodes a query value, leaving `! ' ( ) *` intact the way
/// browsers' `encodeURIComponent` does.
fn encode_uri_component(value: &str) -> String {
    const KEPT: [(&str, &str); 5] = [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

    KEPT.into_iter()
        .fold(urlencoding::encode(value).into_owned(), |encoded, (escaped, raw)| {
            encoded.replace(escaped, raw)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let html = render_popup_content(&Location::named("Cafe"));
        assert_eq!(html, "<h4>Cafe</h4>");
    }

    #[test]
    fn test_placeholder_url_is_omitted() {
        let html = render_popup_content(&Location::named("Cafe").with_url("http://"));
        assert!(!html.contains("<a href"));
        assert_eq!(html, "<h4>Cafe</h4>");
    }

    #[test]
    fn test_real_url_is_linked() {
        let html = render_popup_content(&Location::named("Cafe").with_url("http://cafe.example"));
        assert!(html.contains(
            r#"<a href="http://cafe.example" target="_blank">http://cafe.example</a><br>"#
        ));
    }

    #[test]
    fn test_full_address_directions() {
        let location = Location::named("Cafe").with_address("1 St", "Town", "ST", "1234");
        let html = render_popup_content(&location);

        assert_eq!(
            directions_destination(&location).as_deref(),
            Some("1 St Town ST 1234")
        );
        assert!(html.starts_with("<h4>Cafe</h4>1 St<br>Town ST 1234<br>"));
        assert!(html.contains("https://maps.google.com?daddr=1%20St%20Town%20ST%201234"));
        assert!(html.contains(">Get directions</a></div>"));
    }

    #[test]
    fn test_partial_address_falls_back_to_map() {
        let mut location = Location::named("Cafe").with_map("  Corner of Main and High  ");
        location.suburb = Some("Town".to_string());
        location.postcode = Some("1234".to_string());

        let html = render_popup_content(&location);
        assert!(html.contains("<h4>Cafe</h4>Town 1234<br>"));
        assert_eq!(
            directions_destination(&location).as_deref(),
            Some("Corner of Main and High")
        );
        assert!(html.contains("daddr=Corner%20of%20Main%20and%20High"));
    }

    #[test]
    fn test_no_destination_no_directions() {
        let mut location = Location::named("Cafe");
        location.address = Some("1 St".to_string());
        location.map = Some("   ".to_string());

        assert!(directions_destination(&location).is_none());
        assert!(!render_popup_content(&location).contains("Get directions"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_popup_content(&Location::named("Fish & <Chips>"));
        assert_eq!(html, "<h4>Fish &amp; &lt;Chips&gt;</h4>");
    }

    #[test]
    fn test_popup_state() {
        let mut popup = Popup::for_location(&Location::named("Cafe"));
        assert!(!popup.is_open());
        popup.open();
        assert!(popup.is_open());
        popup.close();
        assert!(!popup.is_open());
        assert_eq!(popup.content(), "<h4>Cafe</h4>");
    }

    #[test]
    fn test_directions_keep_uri_component_marks() {
        let location = Location::named("Pub").with_address("O'Brien St (rear)", "Town", "ST", "1234");
        let html = render_popup_content(&location);
        assert!(html.contains("daddr=O'Brien%20St%20(rear)%20Town%20ST%201234\""));
        assert_eq!(encode_uri_component("a*b!c&d=e"), "a*b!c%26d%3De");
    }
}
