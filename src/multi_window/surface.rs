use std::collections::BTreeSet;

use crate::layout::{ContentPane, DockLayout, DropPosition};

/// Which header kind a drag handler is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderKind {
    Pane,
    Tab,
}

/// The per-window dock widget state the transfer protocol talks to.
#[derive(Clone, Debug, Default)]
pub struct DockSurface {
    layout: DockLayout,
    dragged_pane: Option<ContentPane>,
    drop_position: Option<DropPosition>,
    connected_headers: BTreeSet<(HeaderKind, String)>,
}

impl DockSurface {
    pub fn new(layout: DockLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn layout(&self) -> &DockLayout {
        &self.layout
    }

    pub(super) fn layout_mut(&mut self) -> &mut DockLayout {
        &mut self.layout
    }

    pub fn set_layout(&mut self, layout: DockLayout) {
        self.layout = layout;
    }

    pub fn pane_count(&self) -> usize {
        self.layout.pane_count()
    }

    pub fn dragged_pane(&self) -> Option<&ContentPane> {
        self.dragged_pane.as_ref()
    }

    pub fn set_dragged_pane(&mut self, pane: Option<ContentPane>) {
        self.dragged_pane = pane;
    }

    /// Keep an existing candidate, otherwise take `pane`.
    pub(super) fn offer_dragged_pane(&mut self, pane: &ContentPane) {
        if self.dragged_pane.is_none() {
            self.dragged_pane = Some(pane.clone());
        }
    }

    pub fn drop_position(&self) -> Option<&DropPosition> {
        self.drop_position.as_ref()
    }

    pub fn set_drop_position(&mut self, position: Option<DropPosition>) {
        self.drop_position = position;
    }

    pub(super) fn clear_drag(&mut self) {
        self.dragged_pane = None;
        self.drop_position = None;
    }

    pub fn remove_pane(&mut self, content_id: &str) -> Option<ContentPane> {
        self.layout.remove_pane(content_id)
    }

    /// Dock the candidate pane at the current drop position.
    ///
    /// Returns `false` (and leaves the layout alone) without a candidate, without a drop
    /// position, or when the pane is dropped onto itself.
    pub fn drop_pane(&mut self) -> bool {
        let (Some(pane), Some(position)) = (self.dragged_pane.as_ref(), self.drop_position.take())
        else {
            return false;
        };

        if matches!(&position, DropPosition::Beside { content_id, .. } if *content_id == pane.content_id)
        {
            return false;
        }

        let pane = self
            .layout
            .remove_pane(&pane.content_id)
            .unwrap_or_else(|| pane.clone());
        self.layout.insert_pane(pane, &position);
        true
    }

    pub fn header_connected(&mut self, kind: HeaderKind, content_id: impl Into<String>) {
        self.connected_headers.insert((kind, content_id.into()));
    }

    pub fn header_disconnected(&mut self, kind: HeaderKind, content_id: &str) {
        self.connected_headers
            .retain(|(k, id)| !(*k == kind && id == content_id));
    }

    /// Any header (pane or tab) of `content_id` carries the custom drag handlers.
    pub fn has_drag_header(&self, content_id: &str) -> bool {
        self.connected_headers.iter().any(|(_, id)| id == content_id)
    }
}
