use egui::Vec2;

/// Options for [`super::DockingWindows`].
#[derive(Clone, Debug)]
pub struct DockingWindowsOptions {
    /// Document loaded by every window. Child windows load the same document as the main window
    /// and are populated once it reports loaded.
    pub document_url: String,

    /// Inner size (in points) of the main window.
    pub main_inner_size: Vec2,

    /// Fallback inner size (in points) when the host never reported a rect for torn-out content.
    pub default_child_inner_size: Vec2,

    /// If true, a torn-out pane is pinned in its new window, so the dock surface there does not
    /// immediately offer to re-dock it into a split.
    pub pin_torn_out_panes: bool,

    /// If true, a child window whose dock surface becomes empty asks the host to close it.
    ///
    /// The main window never closes itself.
    pub close_empty_child_windows: bool,

    /// If true, record protocol events in a small ring buffer (see
    /// [`super::DockingWindows::debug_log`]).
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,

    /// If true, check content ownership and registry consistency after every operation.
    pub debug_integrity: bool,

    /// If true, panic on integrity issues (debug-only).
    pub debug_integrity_panic: bool,
}

impl Default for DockingWindowsOptions {
    fn default() -> Self {
        Self {
            document_url: "app://index.html".to_owned(),
            main_inner_size: Vec2::new(1000.0, 800.0),
            default_child_inner_size: Vec2::new(480.0, 360.0),
            pin_torn_out_panes: true,
            close_empty_child_windows: true,
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}

impl DockingWindowsOptions {
    /// Clamp the measured content size to something a window can be opened with.
    pub(crate) fn child_inner_size(&self, measured: Option<Vec2>) -> Vec2 {
        match measured {
            Some(size) if size.x >= 1.0 && size.y >= 1.0 => size,
            _ => self.default_child_inner_size,
        }
    }
}
