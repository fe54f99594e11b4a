//! The demo workspace: three panes embedding remote demo pages.

use crate::content::{ContentElement, generate_content};
use crate::layout::{ContentPane, DockLayout, LayoutNode, SplitOrientation, SplitPane};

pub const GRID_URL: &str = "https://www.infragistics.com/angular-demos-lob/grid/grid";
pub const CHART_URL: &str =
    "https://www.infragistics.com/angular-demos-dv/charts/category-chart-overview";
pub const PIE_CHART_URL: &str =
    "https://www.infragistics.com/angular-demos-dv/charts/pie-chart-overview";

/// Initial layout plus the content elements its panes refer to.
#[derive(Clone, Debug)]
pub struct DemoWorkspace {
    pub layout: DockLayout,
    pub contents: Vec<ContentElement>,
}

/// "Grid" on the left, "Chart" above "Pie Chart" on the right.
pub fn demo_workspace() -> DemoWorkspace {
    let contents = vec![
        generate_content("content1", GRID_URL),
        generate_content("content2", CHART_URL),
        generate_content("content3", PIE_CHART_URL),
    ];

    let layout = DockLayout::new(SplitPane::new(
        SplitOrientation::Horizontal,
        vec![
            LayoutNode::Content(ContentPane::new("content1", "Grid")),
            LayoutNode::Split(SplitPane::new(
                SplitOrientation::Vertical,
                vec![
                    LayoutNode::Content(ContentPane::new("content2", "Chart")),
                    LayoutNode::Content(ContentPane::new("content3", "Pie Chart")),
                ],
            )),
        ],
    ));

    DemoWorkspace { layout, contents }
}
