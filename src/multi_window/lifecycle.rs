use ahash::HashSet;
use egui::{Rect, ViewportId};

use crate::layout::{ContentPane, DockLayout, DropPosition};

use super::error::TransferError;
use super::shell::OpenWindowRequest;
use super::{DockWindow, DockingWindows, ReadyAction, WindowShell};

impl<S: WindowShell> DockingWindows<S> {
    pub(super) fn allocate_child_window_id(&mut self) -> (ViewportId, u64) {
        let serial = self.next_window_serial;
        self.next_window_serial = self.next_window_serial.saturating_add(1);
        (
            ViewportId::from_hash_of(("egui_dock_windows_child", serial)),
            serial,
        )
    }

    /// Ask the host for a new child window at `rect`. The child is registered right away;
    /// `on_ready` runs once the host reports its document loaded.
    pub(super) fn open_child_window(
        &mut self,
        rect: Rect,
        title: String,
        on_ready: ReadyAction,
    ) -> Result<ViewportId, TransferError> {
        let (id, serial) = self.allocate_child_window_id();
        let request = OpenWindowRequest {
            id,
            serial,
            rect,
            url: self.options.document_url.clone(),
            title,
        };

        if let Err(err) = self.shell.open_window(&request) {
            log::warn!("host refused child window {id:?}: {err}");
            return Err(err.into());
        }

        self.windows.insert(id, DockWindow::child(rect));
        self.registry.register_child(id);
        self.pending_ready.insert(id, on_ready);
        self.debug_log_event(format!(
            "child_open window={id:?} serial={serial} rect={rect:?}"
        ));
        Ok(id)
    }

    /// The host finished loading `window`'s document.
    ///
    /// For a child window this runs its ready action exactly once; later calls are no-ops.
    ///
    /// # Errors
    /// Fails for unknown windows, or if the torn-out content could not be moved in (the pane
    /// then goes back to the window it came from).
    pub fn window_loaded(&mut self, window: ViewportId) -> Result<(), TransferError> {
        let dock = self
            .windows
            .get_mut(&window)
            .ok_or(TransferError::UnknownWindow(window))?;
        if dock.loaded {
            return Ok(());
        }
        dock.loaded = true;

        let Some(action) = self.pending_ready.remove(&window) else {
            return Ok(());
        };
        let result = self.run_ready_action(window, action);
        self.debug_log_event(format!("child_ready window={window:?} ok={}", result.is_ok()));
        self.close_empty_child_windows();
        self.check_integrity("window_loaded");
        result
    }

    fn run_ready_action(
        &mut self,
        window: ViewportId,
        action: ReadyAction,
    ) -> Result<(), TransferError> {
        match action {
            ReadyAction::TearOut { source, pane } => {
                let content_id = pane.content_id.clone();
                if let Some(dock) = self.windows.get_mut(&window) {
                    dock.surface
                        .set_layout(DockLayout::single_pane(pane.clone()));
                }
                if let Err(err) = self.transfer_content(source, window, &content_id) {
                    if let Some(dock) = self.windows.get_mut(&window) {
                        dock.surface.set_layout(DockLayout::default());
                    }
                    self.return_torn_out_pane(source, pane);
                    return Err(err);
                }
                Ok(())
            }
            ReadyAction::Restore { layout, contents } => {
                if !self.windows.contains_key(&window) {
                    return Err(TransferError::UnknownWindow(window));
                }
                // Nothing is installed unless every slot is free.
                let mut slots = HashSet::default();
                for element in &contents {
                    if let Some(owner) = self.owner_of_slot(&element.slot) {
                        return Err(TransferError::ContentAlreadyOwned {
                            window: owner,
                            slot: element.slot.clone(),
                        });
                    }
                    if !slots.insert(element.slot.as_str()) {
                        return Err(TransferError::ContentAlreadyOwned {
                            window,
                            slot: element.slot.clone(),
                        });
                    }
                }

                let dock = self
                    .windows
                    .get_mut(&window)
                    .ok_or(TransferError::UnknownWindow(window))?;
                dock.surface.set_layout(layout);
                for element in contents {
                    if let Err(element) = dock.document.attach(element) {
                        log::warn!("restored content {:?} dropped", element.slot);
                    }
                }
                Ok(())
            }
        }
    }

    /// Put a pane whose tear-out never completed back into `source`, if `source` still owns
    /// its content.
    fn return_torn_out_pane(&mut self, source: ViewportId, mut pane: ContentPane) {
        let Some(dock) = self.windows.get_mut(&source) else {
            log::warn!(
                "pane {:?} lost: source window {source:?} is gone",
                pane.content_id
            );
            return;
        };
        if !dock.document.contains_slot(&pane.content_id) {
            log::warn!(
                "pane {:?} lost: content no longer in {source:?}",
                pane.content_id
            );
            return;
        }
        pane.is_pinned = false;
        let content_id = pane.content_id.clone();
        dock.surface.layout_mut().insert_pane(pane, &DropPosition::Root);
        self.debug_log_event(format!(
            "tear_out rolled back pane={content_id:?} into={source:?}"
        ));
    }

    /// The host closed `window`. Deregisters a child exactly once.
    ///
    /// A child that closes before it loaded gives its torn-out pane back to the source window.
    ///
    /// # Errors
    /// [`TransferError::ContentLost`] if the window still owned content elements (they are
    /// gone), [`TransferError::MainWindowUnloaded`] for the main window, and
    /// [`TransferError::UnknownWindow`] for windows that are not open.
    pub fn window_unloaded(&mut self, window: ViewportId) -> Result<(), TransferError> {
        if window == self.registry.main_window() {
            log::warn!("main window unloaded");
            return Err(TransferError::MainWindowUnloaded);
        }

        let deregistered = self.registry.deregister_child(window);
        let Some(mut dock) = self.windows.remove(&window) else {
            return if deregistered {
                Ok(())
            } else {
                Err(TransferError::UnknownWindow(window))
            };
        };

        if let Some(ReadyAction::TearOut { source, pane }) = self.pending_ready.remove(&window) {
            self.return_torn_out_pane(source, pane);
        }

        let mut lost: Vec<String> = dock
            .document
            .drain()
            .into_iter()
            .map(|element| element.slot)
            .collect();
        lost.sort_unstable();

        self.debug_log_event(format!(
            "child_closed window={window:?} lost={}",
            lost.len()
        ));
        self.check_integrity("window_unloaded");

        if lost.is_empty() {
            Ok(())
        } else {
            log::warn!("window {window:?} closed while owning content {lost:?}");
            Err(TransferError::ContentLost {
                window,
                slots: lost,
            })
        }
    }

    /// Children with nothing left to show ask the host to close them. Main never does.
    ///
    /// A child still holding content for a pending tear-out stays open until that content moves.
    pub(super) fn close_empty_child_windows(&mut self) {
        if !self.options.close_empty_child_windows {
            return;
        }

        let empty: Vec<ViewportId> = self
            .registry
            .child_windows()
            .filter(|id| !self.pending_ready.contains_key(id))
            .filter(|id| {
                self.windows.get(id).is_some_and(|dock| {
                    dock.loaded
                        && !dock.closing
                        && dock.surface.pane_count() == 0
                        && dock.document.is_empty()
                })
            })
            .collect();

        for window in empty {
            if let Some(dock) = self.windows.get_mut(&window) {
                dock.closing = true;
            }
            self.shell.close_window(window);
            self.debug_log_event(format!("child_empty -> close window={window:?}"));
        }
    }
}
