use std::path::Path;

use egui::{Pos2, Rect};

use crate::content::generate_content;
use crate::layout::DockLayout;

use super::error::TransferError;
use super::{DockingWindows, DockingWindowsOptions, ReadyAction, WindowShell};

pub const WORKSPACE_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum WorkspaceError {
    UnsupportedVersion { found: u32, expected: u32 },

    /// Snapshots are only taken or restored between drags.
    DragInProgress,
    RonSerialize(ron::Error),
    RonDeserialize(ron::error::SpannedError),
    Io(std::io::Error),
    Transfer(TransferError),
}

impl std::fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported workspace snapshot version: {found} (expected {expected})"
                )
            }
            Self::DragInProgress => write!(f, "a drag is in progress"),
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Transfer(err) => write!(f, "restore error: {err}"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedVersion { .. } | Self::DragInProgress => None,
            Self::RonSerialize(err) => Some(err),
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Transfer(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for WorkspaceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ron::Error> for WorkspaceError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

impl From<ron::error::SpannedError> for WorkspaceError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

impl From<TransferError> for WorkspaceError {
    fn from(err: TransferError) -> Self {
        Self::Transfer(err)
    }
}

/// Content is stored by slot and URL; live state (pointer mode, measured rect) is not kept.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ContentSnapshot {
    pub slot: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WindowSnapshot {
    pub outer_rect: Option<Rect>,
    pub layout: DockLayout,
    pub contents: Vec<ContentSnapshot>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WorkspaceSnapshot {
    pub version: u32,
    pub main: WindowSnapshot,

    /// In registration order.
    pub children: Vec<WindowSnapshot>,
}

impl WorkspaceSnapshot {
    /// # Errors
    /// Fails on malformed RON or a version other than [`WORKSPACE_SNAPSHOT_VERSION`].
    pub fn from_ron_str(ron_str: &str) -> Result<Self, WorkspaceError> {
        let snapshot: Self = ron::from_str(ron_str)?;
        if snapshot.version != WORKSPACE_SNAPSHOT_VERSION {
            return Err(WorkspaceError::UnsupportedVersion {
                found: snapshot.version,
                expected: WORKSPACE_SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// # Errors
    /// See [`Self::from_ron_str`]; also fails if the file cannot be read.
    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// # Errors
    /// Fails if RON serialization fails.
    pub fn to_ron_string(&self) -> Result<String, WorkspaceError> {
        Ok(ron::ser::to_string_pretty(self, pretty_ron_config())?)
    }
}

fn pretty_ron_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(64)
        .separate_tuple_members(true)
        .enumerate_arrays(false)
}

impl<S: WindowShell> DockingWindows<S> {
    fn window_snapshot(&self, window: egui::ViewportId) -> Option<WindowSnapshot> {
        let dock = self.windows.get(&window)?;
        let contents = dock
            .document
            .slots()
            .into_iter()
            .filter_map(|slot| dock.document.query_slot(slot))
            .map(|element| ContentSnapshot {
                slot: element.slot.clone(),
                url: element.url().to_owned(),
            })
            .collect();
        Some(WindowSnapshot {
            outer_rect: dock.outer_rect,
            layout: dock.surface.layout().clone(),
            contents,
        })
    }

    /// Capture every loaded window's layout and content.
    ///
    /// Children that have not finished loading are skipped.
    ///
    /// # Errors
    /// [`WorkspaceError::DragInProgress`] while a drag is in flight.
    pub fn snapshot_workspace(&self) -> Result<WorkspaceSnapshot, WorkspaceError> {
        if self.session.is_active() {
            return Err(WorkspaceError::DragInProgress);
        }
        let main = self
            .window_snapshot(self.registry.main_window())
            .ok_or(TransferError::UnknownWindow(self.registry.main_window()))?;
        let children = self
            .registry
            .child_windows()
            .filter(|id| self.is_loaded(*id))
            .filter_map(|id| self.window_snapshot(id))
            .collect();
        Ok(WorkspaceSnapshot {
            version: WORKSPACE_SNAPSHOT_VERSION,
            main,
            children,
        })
    }

    /// # Errors
    /// See [`Self::snapshot_workspace`] and [`WorkspaceSnapshot::to_ron_string`].
    pub fn snapshot_workspace_to_ron_string(&self) -> Result<String, WorkspaceError> {
        self.snapshot_workspace()?.to_ron_string()
    }

    /// # Errors
    /// See [`Self::snapshot_workspace_to_ron_string`]; also fails if the file cannot be written.
    pub fn save_workspace_to_ron_file(&self, path: impl AsRef<Path>) -> Result<(), WorkspaceError> {
        let text = self.snapshot_workspace_to_ron_string()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Rebuild a workspace: the main window directly, each child through the host (populated
    /// when it reports loaded).
    ///
    /// # Errors
    /// Fails if content slots collide or the host refuses to open a child window.
    pub fn from_workspace_snapshot(
        shell: S,
        snapshot: WorkspaceSnapshot,
        options: DockingWindowsOptions,
    ) -> Result<Self, WorkspaceError> {
        if snapshot.version != WORKSPACE_SNAPSHOT_VERSION {
            return Err(WorkspaceError::UnsupportedVersion {
                found: snapshot.version,
                expected: WORKSPACE_SNAPSHOT_VERSION,
            });
        }

        let WorkspaceSnapshot { main, children, .. } = snapshot;
        let mut docking = Self::new_with_options(shell, main.layout, options);
        let main_window = docking.main_window();
        if let Some(rect) = main.outer_rect {
            docking.set_window_outer_rect(main_window, rect);
        }
        for content in main.contents {
            docking.append_content(main_window, generate_content(content.slot, content.url))?;
        }

        for child in children {
            let rect = child.outer_rect.unwrap_or_else(|| {
                Rect::from_min_size(Pos2::ZERO, docking.options.default_child_inner_size)
            });
            let title = child.layout.title();
            let contents = child
                .contents
                .into_iter()
                .map(|content| generate_content(content.slot, content.url))
                .collect();
            docking.open_child_window(
                rect,
                title,
                ReadyAction::Restore {
                    layout: child.layout,
                    contents,
                },
            )?;
        }

        Ok(docking)
    }
}
