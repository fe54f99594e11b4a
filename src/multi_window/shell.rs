use egui::{Pos2, Rect, ViewportBuilder, ViewportCommand, ViewportId};

/// Everything the host needs to create a child window.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenWindowRequest {
    pub id: ViewportId,
    pub serial: u64,

    /// Requested outer position and inner size, in screen points.
    pub rect: Rect,

    /// Document to load; child windows load the same document as the main window.
    pub url: String,
    pub title: String,
}

impl OpenWindowRequest {
    pub fn viewport_builder(&self) -> ViewportBuilder {
        ViewportBuilder::default()
            .with_title(self.title.clone())
            .with_position(self.rect.min)
            .with_inner_size(self.rect.size())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellError {
    /// The host refused to create a window (popup blocked, window limit, shutting down, ...).
    WindowCreationDenied { reason: String },
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowCreationDenied { reason } => {
                write!(f, "window creation denied: {reason}")
            }
        }
    }
}

impl std::error::Error for ShellError {}

/// Window primitives provided by the desktop host.
///
/// Opening is asynchronous from the protocol's point of view: the host reports back through
/// [`super::DockingWindows::window_loaded`] once the new window's document is ready, and through
/// [`super::DockingWindows::window_unloaded`] once a window is gone.
pub trait WindowShell {
    fn open_window(&mut self, request: &OpenWindowRequest) -> Result<(), ShellError>;

    fn move_window(&mut self, window: ViewportId, outer_pos: Pos2);

    fn close_window(&mut self, window: ViewportId);
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShellCommand {
    Open(OpenWindowRequest),
    Move { window: ViewportId, outer_pos: Pos2 },
    Close { window: ViewportId },
}

impl ShellCommand {
    pub fn window(&self) -> ViewportId {
        match self {
            Self::Open(request) => request.id,
            Self::Move { window, .. } | Self::Close { window } => *window,
        }
    }

    /// The `egui` viewport command for moves and closes.
    ///
    /// Opening has no command form: show the viewport with
    /// [`OpenWindowRequest::viewport_builder`] instead.
    pub fn viewport_command(&self) -> Option<(ViewportId, ViewportCommand)> {
        match self {
            Self::Open(_) => None,
            Self::Move { window, outer_pos } => {
                Some((*window, ViewportCommand::OuterPosition(*outer_pos)))
            }
            Self::Close { window } => Some((*window, ViewportCommand::Close)),
        }
    }
}

/// A [`WindowShell`] that queues commands for an `egui` app to apply each frame.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    commands: Vec<ShellCommand>,
}

impl CommandQueue {
    pub fn pending(&self) -> &[ShellCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<ShellCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forward queued moves and closes to `ctx`, returning the open requests still to be shown.
    pub fn apply_viewport_commands(&mut self, ctx: &egui::Context) -> Vec<OpenWindowRequest> {
        let mut opens = Vec::new();
        for command in self.drain() {
            match command {
                ShellCommand::Open(request) => opens.push(request),
                other => {
                    if let Some((window, cmd)) = other.viewport_command() {
                        ctx.send_viewport_cmd_to(window, cmd);
                    }
                }
            }
        }
        opens
    }
}

impl WindowShell for CommandQueue {
    fn open_window(&mut self, request: &OpenWindowRequest) -> Result<(), ShellError> {
        self.commands.push(ShellCommand::Open(request.clone()));
        Ok(())
    }

    fn move_window(&mut self, window: ViewportId, outer_pos: Pos2) {
        self.commands.push(ShellCommand::Move { window, outer_pos });
    }

    fn close_window(&mut self, window: ViewportId) {
        self.commands.push(ShellCommand::Close { window });
    }
}
