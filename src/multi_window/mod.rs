use std::collections::VecDeque;

use egui::{Rect, ViewportId, ViewportIdMap};

use crate::content::ContentElement;
use crate::layout::{ContentPane, DockLayout, DropPosition};

mod debug;
mod document;
mod drag;
mod error;
mod integrity;
mod lifecycle;
mod options;
mod registry;
mod session;
mod shell;
mod surface;

#[cfg(feature = "persistence")]
mod persistence;

#[cfg(test)]
mod transfer_tests;

pub use document::Document;
pub use drag::{DragEnd, DropEffect};
pub use error::{DragError, TransferError};
pub use options::DockingWindowsOptions;
pub use registry::{WindowRegistry, WindowRole};
pub use session::{DragOutcome, FinishedSession};
pub use shell::{CommandQueue, OpenWindowRequest, ShellCommand, ShellError, WindowShell};
pub use surface::{DockSurface, HeaderKind};

#[cfg(feature = "persistence")]
pub use persistence::{
    ContentSnapshot, WORKSPACE_SNAPSHOT_VERSION, WindowSnapshot, WorkspaceError,
    WorkspaceSnapshot,
};

use session::DragSession;

/// One top-level window: its dock surface and the content elements its document owns.
#[derive(Debug)]
pub(super) struct DockWindow {
    pub(super) surface: DockSurface,
    pub(super) document: Document,
    pub(super) outer_rect: Option<Rect>,
    pub(super) loaded: bool,
    pub(super) closing: bool,
}

impl DockWindow {
    fn main(layout: DockLayout) -> Self {
        Self {
            surface: DockSurface::new(layout),
            document: Document::default(),
            outer_rect: None,
            loaded: true,
            closing: false,
        }
    }

    fn child(outer_rect: Rect) -> Self {
        Self {
            surface: DockSurface::default(),
            document: Document::default(),
            outer_rect: Some(outer_rect),
            loaded: false,
            closing: false,
        }
    }
}

/// What to do once a child window's document has loaded.
#[derive(Debug)]
pub(super) enum ReadyAction {
    /// Install a single-pane layout for `pane` and move its content over from `source`.
    TearOut {
        source: ViewportId,
        pane: ContentPane,
    },

    /// Install a saved layout with freshly generated content.
    #[cfg_attr(not(feature = "persistence"), allow(dead_code))]
    Restore {
        layout: DockLayout,
        contents: Vec<ContentElement>,
    },
}

/// Moves dock panes between top-level windows.
///
/// The first window ([`ViewportId::ROOT`]) is the main window and owns the registry of child
/// windows. Supported gestures:
/// - Drop a pane into another open window: the pane and its content move there.
/// - Drop a pane outside every window: it is torn out into a new child window.
/// - Drop the only pane of a window outside every window: the window itself moves.
///
/// Child windows left without panes close themselves. The host drives everything by forwarding
/// native events (`pane_header_drag_start`, `document_drop`, `pane_header_drag_end`,
/// `window_loaded`, `window_unloaded`) and executes window commands through a [`WindowShell`].
#[derive(Debug)]
pub struct DockingWindows<S> {
    pub options: DockingWindowsOptions,

    shell: S,
    registry: WindowRegistry,
    windows: ViewportIdMap<DockWindow>,
    pending_ready: ViewportIdMap<ReadyAction>,
    next_window_serial: u64,

    session: DragSession,

    debug_log: VecDeque<String>,
    debug_event: u64,
}

impl<S: WindowShell> DockingWindows<S> {
    pub fn new(shell: S, layout: DockLayout) -> Self {
        Self::new_with_options(shell, layout, DockingWindowsOptions::default())
    }

    pub fn new_with_options(shell: S, layout: DockLayout, options: DockingWindowsOptions) -> Self {
        let main = ViewportId::ROOT;
        let mut windows = ViewportIdMap::default();
        windows.insert(main, DockWindow::main(layout));

        Self {
            options,
            shell,
            registry: WindowRegistry::new(main),
            windows,
            pending_ready: ViewportIdMap::default(),
            next_window_serial: 1,
            session: DragSession::default(),
            debug_log: VecDeque::new(),
            debug_event: 0,
        }
    }

    /// Builder for the main window, titled after its panes.
    pub fn main_viewport_builder(&self) -> egui::ViewportBuilder {
        let title = self
            .layout(self.main_window())
            .map(DockLayout::title)
            .unwrap_or_default();
        egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(self.options.main_inner_size)
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn main_window(&self) -> ViewportId {
        self.registry.main_window()
    }

    pub fn child_windows(&self) -> Vec<ViewportId> {
        self.registry.child_windows().collect()
    }

    pub fn role(&self, window: ViewportId) -> Option<WindowRole> {
        self.registry.role(window)
    }

    pub fn surface(&self, window: ViewportId) -> Option<&DockSurface> {
        self.windows.get(&window).map(|dock| &dock.surface)
    }

    pub fn document(&self, window: ViewportId) -> Option<&Document> {
        self.windows.get(&window).map(|dock| &dock.document)
    }

    pub fn layout(&self, window: ViewportId) -> Option<&DockLayout> {
        self.surface(window).map(DockSurface::layout)
    }

    pub fn window_outer_rect(&self, window: ViewportId) -> Option<Rect> {
        self.windows.get(&window).and_then(|dock| dock.outer_rect)
    }

    pub fn is_loaded(&self, window: ViewportId) -> bool {
        self.windows.get(&window).is_some_and(|dock| dock.loaded)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_active()
    }

    pub fn dragged_pane(&self) -> Option<&ContentPane> {
        self.session.pane()
    }

    /// The window whose document currently owns `slot`.
    pub fn owner_of_slot(&self, slot: &str) -> Option<ViewportId> {
        self.windows
            .iter()
            .find(|(_, dock)| dock.document.contains_slot(slot))
            .map(|(id, _)| *id)
    }

    /// Attach a content element to a window's document.
    ///
    /// # Errors
    /// Fails if the window is unknown or any window already owns the slot.
    pub fn append_content(
        &mut self,
        window: ViewportId,
        element: ContentElement,
    ) -> Result<(), TransferError> {
        if let Some(owner) = self.owner_of_slot(&element.slot) {
            return Err(TransferError::ContentAlreadyOwned {
                window: owner,
                slot: element.slot,
            });
        }
        let dock = self
            .windows
            .get_mut(&window)
            .ok_or(TransferError::UnknownWindow(window))?;
        dock.document
            .attach(element)
            .map_err(|element| TransferError::ContentAlreadyOwned {
                window,
                slot: element.slot,
            })
    }

    /// Replace the layout of a window's dock surface.
    pub fn set_layout(&mut self, window: ViewportId, layout: DockLayout) -> bool {
        let Some(dock) = self.windows.get_mut(&window) else {
            return false;
        };
        dock.surface.set_layout(layout);
        self.close_empty_child_windows();
        true
    }

    /// Host feedback: where a content element was last laid out, in screen points.
    pub fn set_content_rect(&mut self, window: ViewportId, slot: &str, rect: Rect) -> bool {
        self.windows
            .get_mut(&window)
            .is_some_and(|dock| dock.document.set_content_rect(slot, rect))
    }

    /// Host feedback: the window's current outer rect, in screen points.
    pub fn set_window_outer_rect(&mut self, window: ViewportId, rect: Rect) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.outer_rect = Some(rect);
        }
    }

    /// A pane or tab header was created; it now carries the custom drag handlers.
    pub fn header_connected(&mut self, window: ViewportId, kind: HeaderKind, content_id: &str) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.surface.header_connected(kind, content_id);
        }
    }

    pub fn header_disconnected(&mut self, window: ViewportId, kind: HeaderKind, content_id: &str) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.surface.header_disconnected(kind, content_id);
        }
    }

    /// Drag-over feedback from a window's dock surface.
    pub fn set_drop_position(&mut self, window: ViewportId, position: Option<DropPosition>) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.surface.set_drop_position(position);
        }
    }

    pub fn splitter_resize_start(&mut self, window: ViewportId) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.document.disable_content_pointer_events();
        }
    }

    pub fn splitter_resize_end(&mut self, window: ViewportId) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.document.enable_content_pointer_events();
        }
    }

    /// Move a content element between documents as one step: either it ends up owned by `to`, or
    /// it stays owned by `from`.
    pub(super) fn transfer_content(
        &mut self,
        from: ViewportId,
        to: ViewportId,
        slot: &str,
    ) -> Result<(), TransferError> {
        let Some(destination) = self.windows.get(&to) else {
            return Err(TransferError::UnknownWindow(to));
        };
        if destination.document.contains_slot(slot) {
            return Err(TransferError::ContentAlreadyOwned {
                window: to,
                slot: slot.to_owned(),
            });
        }

        let source = self
            .windows
            .get_mut(&from)
            .ok_or(TransferError::UnknownWindow(from))?;
        let element = source
            .document
            .detach(slot)
            .ok_or_else(|| TransferError::ContentMissing {
                window: from,
                slot: slot.to_owned(),
            })?;

        let attached = match self.windows.get_mut(&to) {
            Some(destination) => destination.document.attach(element),
            None => Err(element),
        };
        if let Err(element) = attached {
            if let Some(source) = self.windows.get_mut(&from) {
                if source.document.attach(element).is_err() {
                    log::warn!("content {slot:?} could not be returned to {from:?}");
                }
            }
            return Err(TransferError::ContentAlreadyOwned {
                window: to,
                slot: slot.to_owned(),
            });
        }

        self.debug_log_event(format!("transfer content={slot:?} from={from:?} to={to:?}"));
        Ok(())
    }
}
