#![forbid(unsafe_code)]

//! Dock panes that move between top-level egui windows.
//!
//! [`DockingWindows`] owns one [`DockLayout`] per window and the content elements each window's
//! document holds. The host forwards native drag and window-lifecycle events; window creation,
//! moves and closes go back out through a [`WindowShell`].

pub mod content;
pub mod demo;
pub mod layout;
pub mod multi_window;

pub use content::{ContentElement, PointerEvents, generate_content};
pub use layout::{ContentPane, DockEdge, DockLayout, DropPosition, SplitOrientation, SplitPane};
pub use multi_window::{
    CommandQueue, DockingWindows, DockingWindowsOptions, DragEnd, DragError, DragOutcome,
    DropEffect, HeaderKind, TransferError, WindowRegistry, WindowRole, WindowShell,
};

#[cfg(feature = "persistence")]
pub use multi_window::{WORKSPACE_SNAPSHOT_VERSION, WorkspaceError, WorkspaceSnapshot};
