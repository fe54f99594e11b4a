use egui::ViewportId;

/// The role a top-level window plays. Fixed when the window is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowRole {
    Main,
    Child { main: ViewportId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct ChildWindowRecord {
    pub(super) id: ViewportId,
    pub(super) main: ViewportId,
}

/// Process-wide record of which window is main, which children are open, and which window
/// started the drag in progress.
#[derive(Clone, Debug)]
pub struct WindowRegistry {
    main: ViewportId,
    children: Vec<ChildWindowRecord>,
    drag_start_window: Option<ViewportId>,
}

impl WindowRegistry {
    pub fn new(main: ViewportId) -> Self {
        Self {
            main,
            children: Vec::new(),
            drag_start_window: None,
        }
    }

    pub fn main_window(&self) -> ViewportId {
        self.main
    }

    /// Open children in registration order.
    pub fn child_windows(&self) -> impl Iterator<Item = ViewportId> + '_ {
        self.children.iter().map(|record| record.id)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn role(&self, window: ViewportId) -> Option<WindowRole> {
        if window == self.main {
            return Some(WindowRole::Main);
        }
        self.children
            .iter()
            .find(|record| record.id == window)
            .map(|record| WindowRole::Child { main: record.main })
    }

    pub fn is_registered(&self, window: ViewportId) -> bool {
        self.role(window).is_some()
    }

    /// Appends a child record pointing back at main. Registering twice is a no-op.
    pub fn register_child(&mut self, window: ViewportId) {
        if self.is_registered(window) {
            return;
        }
        self.children.push(ChildWindowRecord {
            id: window,
            main: self.main,
        });
    }

    /// Returns `false` if `window` was not a registered child.
    pub fn deregister_child(&mut self, window: ViewportId) -> bool {
        let before = self.children.len();
        self.children.retain(|record| record.id != window);
        if self.drag_start_window == Some(window) {
            self.drag_start_window = None;
        }
        self.children.len() != before
    }

    /// `window` itself for main, the back-reference for a child, `None` for unknown windows.
    pub fn main_of(&self, window: ViewportId) -> Option<ViewportId> {
        match self.role(window)? {
            WindowRole::Main => Some(window),
            WindowRole::Child { main } => Some(main),
        }
    }

    /// Main first, then children in registration order.
    pub fn windows(&self) -> Vec<ViewportId> {
        std::iter::once(self.main)
            .chain(self.child_windows())
            .collect()
    }

    pub fn for_each_window(&self, mut f: impl FnMut(ViewportId)) {
        for window in self.windows() {
            f(window);
        }
    }

    pub fn drag_start_window(&self) -> Option<ViewportId> {
        self.drag_start_window
    }

    pub fn set_drag_start_window(&mut self, window: ViewportId) {
        self.drag_start_window = Some(window);
    }

    pub fn take_drag_start_window(&mut self) -> Option<ViewportId> {
        self.drag_start_window.take()
    }

    pub(super) fn child_records(&self) -> &[ChildWindowRecord] {
        &self.children
    }
}
