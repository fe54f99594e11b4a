use egui::Rect;

/// CSS-style class carried by every generated content container.
pub const CONTENT_CLASS: &str = "content-div";

/// Whether a content element intercepts pointer input.
///
/// Embedded pages swallow mouse events, which breaks drag and splitter-resize gestures that pass
/// over them. The gate flips every element to [`PointerEvents::None`] while such a gesture runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PointerEvents {
    #[default]
    Auto,
    None,
}

/// An embedded external page (the `iframe` of a pane body).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EmbeddedPage {
    pub src: String,
}

/// The live body of a pane: a container tagged with a slot, hosting one embedded page.
///
/// A `ContentElement` is owned by exactly one window document at a time. Moving it between
/// windows moves the value, never a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentElement {
    pub slot: String,
    pub class: &'static str,
    pub page: EmbeddedPage,
    pub pointer_events: PointerEvents,

    /// Last on-screen rect reported by the host, used to size torn-out windows.
    pub rect: Option<Rect>,
}

impl ContentElement {
    pub fn url(&self) -> &str {
        &self.page.src
    }
}

/// Build a placeholder pane body for `slot` pointing at `url`.
pub fn generate_content(slot: impl Into<String>, url: impl Into<String>) -> ContentElement {
    ContentElement {
        slot: slot.into(),
        class: CONTENT_CLASS,
        page: EmbeddedPage { src: url.into() },
        pointer_events: PointerEvents::Auto,
        rect: None,
    }
}
