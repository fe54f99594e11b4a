use itertools::Itertools as _;

/// Orientation of a split container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SplitOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A leaf pane: one unit of dockable content, bound to a content element through `content_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ContentPane {
    pub content_id: String,
    pub header: String,

    /// A pinned pane is not offered for re-docking into a split right after it was torn out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_pinned: bool,
}

impl ContentPane {
    pub fn new(content_id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            header: header.into(),
            is_pinned: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LayoutNode {
    Content(ContentPane),
    Split(SplitPane),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SplitPane {
    pub orientation: SplitOrientation,
    pub panes: Vec<LayoutNode>,
}

/// Which side of a target pane a dragged pane is docked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl DockEdge {
    pub fn orientation(self) -> SplitOrientation {
        match self {
            Self::Left | Self::Right => SplitOrientation::Horizontal,
            Self::Top | Self::Bottom => SplitOrientation::Vertical,
        }
    }

    fn is_before(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

/// Where a drop lands inside a dock surface.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DropPosition {
    /// Append to the root split.
    Root,

    /// Dock next to an existing pane.
    Beside { content_id: String, edge: DockEdge },
}

impl SplitPane {
    pub fn new(orientation: SplitOrientation, panes: Vec<LayoutNode>) -> Self {
        Self { orientation, panes }
    }

    fn collect_content<'a>(&'a self, out: &mut Vec<&'a ContentPane>) {
        for node in &self.panes {
            match node {
                LayoutNode::Content(pane) => out.push(pane),
                LayoutNode::Split(split) => split.collect_content(out),
            }
        }
    }

    fn position_of_content(&self, content_id: &str) -> Option<usize> {
        self.panes.iter().position(
            |node| matches!(node, LayoutNode::Content(pane) if pane.content_id == content_id),
        )
    }

    /// Removes the pane and prunes splits left empty. Splits left with a single child collapse
    /// into that child. `self` is never pruned.
    fn remove_content(&mut self, content_id: &str) -> Option<ContentPane> {
        if let Some(index) = self.position_of_content(content_id) {
            return match self.panes.remove(index) {
                LayoutNode::Content(pane) => Some(pane),
                LayoutNode::Split(_) => None,
            };
        }

        for index in 0..self.panes.len() {
            let LayoutNode::Split(child) = &mut self.panes[index] else {
                continue;
            };
            let Some(pane) = child.remove_content(content_id) else {
                continue;
            };

            let collapsed = match &mut self.panes[index] {
                LayoutNode::Split(child) if child.panes.len() <= 1 => Some(child.panes.pop()),
                _ => None,
            };
            match collapsed {
                Some(Some(only)) => self.panes[index] = only,
                Some(None) => {
                    self.panes.remove(index);
                }
                None => {}
            }
            return Some(pane);
        }

        None
    }

    fn insert_beside(
        &mut self,
        target: &str,
        edge: DockEdge,
        pane: ContentPane,
    ) -> Result<(), ContentPane> {
        if let Some(index) = self.position_of_content(target) {
            let orientation = edge.orientation();
            if self.orientation == orientation || self.panes.len() == 1 {
                self.orientation = orientation;
                let at = if edge.is_before() { index } else { index + 1 };
                self.panes.insert(at, LayoutNode::Content(pane));
            } else {
                let existing = self.panes.remove(index);
                let incoming = LayoutNode::Content(pane);
                let children = if edge.is_before() {
                    vec![incoming, existing]
                } else {
                    vec![existing, incoming]
                };
                self.panes
                    .insert(index, LayoutNode::Split(Self::new(orientation, children)));
            }
            return Ok(());
        }

        let mut pane = pane;
        for node in &mut self.panes {
            if let LayoutNode::Split(child) = node {
                match child.insert_beside(target, edge, pane) {
                    Ok(()) => return Ok(()),
                    Err(returned) => pane = returned,
                }
            }
        }
        Err(pane)
    }
}

/// The layout tree of one dock surface.
///
/// The root is always a split pane, even when it holds a single content pane, so "the window
/// contains exactly one pane" is a question about `root_pane.panes`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockLayout {
    pub root_pane: SplitPane,
}

impl DockLayout {
    pub fn new(root_pane: SplitPane) -> Self {
        Self { root_pane }
    }

    /// A horizontal root split holding only `pane`.
    pub fn single_pane(pane: ContentPane) -> Self {
        Self::new(SplitPane::new(
            SplitOrientation::Horizontal,
            vec![LayoutNode::Content(pane)],
        ))
    }

    /// All content panes, depth-first in layout order.
    pub fn content_panes(&self) -> Vec<&ContentPane> {
        let mut out = Vec::new();
        self.root_pane.collect_content(&mut out);
        out
    }

    pub fn pane_count(&self) -> usize {
        self.content_panes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pane_count() == 0
    }

    pub fn find(&self, content_id: &str) -> Option<&ContentPane> {
        self.content_panes()
            .into_iter()
            .find(|pane| pane.content_id == content_id)
    }

    pub fn contains(&self, content_id: &str) -> bool {
        self.find(content_id).is_some()
    }

    /// `content_id` is the only pane, however deeply it is nested.
    pub fn is_sole_pane(&self, content_id: &str) -> bool {
        self.pane_count() == 1 && self.contains(content_id)
    }

    pub fn remove_pane(&mut self, content_id: &str) -> Option<ContentPane> {
        self.root_pane.remove_content(content_id)
    }

    /// Insert `pane` at `position`. An unknown target falls back to appending at the root.
    pub fn insert_pane(&mut self, pane: ContentPane, position: &DropPosition) {
        match position {
            DropPosition::Root => self.root_pane.panes.push(LayoutNode::Content(pane)),
            DropPosition::Beside { content_id, edge } => {
                if let Err(pane) = self.root_pane.insert_beside(content_id, *edge, pane) {
                    self.root_pane.panes.push(LayoutNode::Content(pane));
                }
            }
        }
    }

    /// Headers of all panes, joined for a window title.
    pub fn title(&self) -> String {
        self.content_panes()
            .iter()
            .map(|pane| pane.header.as_str())
            .join(" | ")
    }
}
