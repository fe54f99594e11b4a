use egui::ViewportId;

use super::shell::ShellError;

/// Why a pane-header drag could not start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragError {
    UnknownWindow(ViewportId),
    PaneNotFound {
        window: ViewportId,
        content_id: String,
    },

    /// The header never connected, so it carries no custom drag handlers.
    HeaderNotDraggable {
        window: ViewportId,
        content_id: String,
    },

    /// Another drag is still in flight.
    SessionActive { session: u64 },
}

impl std::fmt::Display for DragError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWindow(window) => write!(f, "unknown window {window:?}"),
            Self::PaneNotFound { window, content_id } => {
                write!(f, "pane {content_id:?} not found in window {window:?}")
            }
            Self::HeaderNotDraggable { window, content_id } => {
                write!(
                    f,
                    "header of pane {content_id:?} in window {window:?} is not connected"
                )
            }
            Self::SessionActive { session } => {
                write!(f, "drag session {session} is still active")
            }
        }
    }
}

impl std::error::Error for DragError {}

/// A pane transfer that did not happen. Layouts and documents are left as they were.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    /// No window is recorded as the drag origin, or it has since closed.
    StaleDragSource,

    /// A drag end arrived from a window other than the one the active drag started in.
    NotDragOrigin {
        window: ViewportId,
        origin: ViewportId,
    },
    UnknownWindow(ViewportId),
    PaneNotFound {
        window: ViewportId,
        content_id: String,
    },
    ContentMissing {
        window: ViewportId,
        slot: String,
    },
    ContentAlreadyOwned {
        window: ViewportId,
        slot: String,
    },
    WindowOpenFailed(ShellError),

    /// The window closed while still owning content; those elements are gone.
    ContentLost {
        window: ViewportId,
        slots: Vec<String>,
    },
    MainWindowUnloaded,
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleDragSource => write!(f, "drag source window is missing or closed"),
            Self::NotDragOrigin { window, origin } => {
                write!(f, "drag end from {window:?}, but the drag started in {origin:?}")
            }
            Self::UnknownWindow(window) => write!(f, "unknown window {window:?}"),
            Self::PaneNotFound { window, content_id } => {
                write!(f, "pane {content_id:?} not found in window {window:?}")
            }
            Self::ContentMissing { window, slot } => {
                write!(f, "content {slot:?} is not owned by window {window:?}")
            }
            Self::ContentAlreadyOwned { window, slot } => {
                write!(f, "content {slot:?} is already owned by window {window:?}")
            }
            Self::WindowOpenFailed(err) => write!(f, "failed to open window: {err}"),
            Self::ContentLost { window, slots } => {
                write!(f, "window {window:?} closed owning content {slots:?}")
            }
            Self::MainWindowUnloaded => write!(f, "main window unloaded"),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::WindowOpenFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShellError> for TransferError {
    fn from(err: ShellError) -> Self {
        Self::WindowOpenFailed(err)
    }
}
