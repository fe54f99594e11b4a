use egui::{Pos2, Rect, ViewportId};

use crate::layout::{ContentPane, DockLayout, DropPosition};

use super::error::{DragError, TransferError};
use super::session::DragOutcome;
use super::{DockingWindows, ReadyAction, WindowShell};

/// The drop effect the host reports when a native drag ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropEffect {
    /// Nothing accepted the drop: it landed outside every window.
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// A native drag-end event on the window that started the drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEnd {
    pub drop_effect: DropEffect,

    /// Pointer position in screen points.
    pub screen_pos: Pos2,
}

impl DragEnd {
    pub fn new(drop_effect: DropEffect, screen_pos: Pos2) -> Self {
        Self {
            drop_effect,
            screen_pos,
        }
    }

    /// Released outside every window.
    pub fn outside(screen_pos: Pos2) -> Self {
        Self::new(DropEffect::None, screen_pos)
    }

    /// Released over some window's document.
    pub fn inside(screen_pos: Pos2) -> Self {
        Self::new(DropEffect::Move, screen_pos)
    }
}

impl<S: WindowShell> DockingWindows<S> {
    /// A pane header in `window` started dragging.
    ///
    /// Marks the pane as dragged in `window`, records `window` as the drag origin, and tells every
    /// window (main first, then children in registration order) that the pane is in flight, so
    /// each can accept the drop and stops embedded content from eating pointer events.
    ///
    /// # Errors
    /// Fails if the window or pane is unknown, the header was never connected, or another drag
    /// is still in flight.
    pub fn pane_header_drag_start(
        &mut self,
        window: ViewportId,
        content_id: &str,
    ) -> Result<u64, DragError> {
        if !self.registry.is_registered(window) {
            return Err(DragError::UnknownWindow(window));
        }
        let dock = self
            .windows
            .get(&window)
            .ok_or(DragError::UnknownWindow(window))?;
        let Some(pane) = dock.surface.layout().find(content_id).cloned() else {
            return Err(DragError::PaneNotFound {
                window,
                content_id: content_id.to_owned(),
            });
        };
        if !dock.surface.has_drag_header(content_id) {
            return Err(DragError::HeaderNotDraggable {
                window,
                content_id: content_id.to_owned(),
            });
        }

        let id = self.session.start(pane.clone(), window).map_err(|session| {
            log::warn!("drag of {content_id:?} rejected: session {session} still active");
            DragError::SessionActive { session }
        })?;

        if let Some(dock) = self.windows.get_mut(&window) {
            dock.surface.set_dragged_pane(Some(pane.clone()));
        }
        self.registry.set_drag_start_window(window);

        let mut notified = Vec::new();
        self.registry.for_each_window(|target| {
            let Some(dock) = self.windows.get_mut(&target) else {
                return;
            };
            dock.surface.offer_dragged_pane(&pane);
            dock.document.disable_content_pointer_events();
            notified.push(target);
        });

        self.debug_log_event(format!(
            "drag_start session={id} pane={content_id:?} window={window:?} notified={notified:?}"
        ));
        self.check_integrity("drag_start");
        Ok(id)
    }

    /// The dragged pane was dropped on `window`'s document.
    ///
    /// Returns `None` when nothing was docked (no drag in flight, no drop target, or dropped
    /// onto itself).
    ///
    /// # Errors
    /// Fails if the pane had to be adopted from another window and that could not be done. The
    /// layouts of both windows are then restored.
    pub fn document_drop(
        &mut self,
        window: ViewportId,
        position: Option<DropPosition>,
    ) -> Result<Option<DragOutcome>, TransferError> {
        if !self.session.is_active() {
            self.debug_log_event(format!("drop ignored window={window:?} (no drag)"));
            return Ok(None);
        }

        let dock = self
            .windows
            .get_mut(&window)
            .ok_or(TransferError::UnknownWindow(window))?;
        if position.is_some() {
            dock.surface.set_drop_position(position);
        }
        let Some(content_id) = dock.surface.dragged_pane().map(|p| p.content_id.clone()) else {
            return Ok(None);
        };

        let layout_before = dock.surface.layout().clone();
        if !dock.surface.drop_pane() {
            self.debug_log_event(format!(
                "drop not docked window={window:?} pane={content_id:?}"
            ));
            return Ok(None);
        }

        let outcome = if dock.document.contains_slot(&content_id) {
            DragOutcome::Local
        } else {
            if let Err(err) = self.adopt_from_drag_start_window(window, &content_id) {
                if let Some(dock) = self.windows.get_mut(&window) {
                    dock.surface.set_layout(layout_before);
                }
                log::warn!("cross-window drop of {content_id:?} into {window:?} failed: {err}");
                self.check_integrity("document_drop");
                return Err(err);
            }
            DragOutcome::CrossWindow
        };

        self.session.record(outcome);
        self.debug_log_event(format!(
            "drop window={window:?} pane={content_id:?} outcome={outcome:?}"
        ));
        self.close_empty_child_windows();
        self.check_integrity("document_drop");
        Ok(Some(outcome))
    }

    /// The native drag that started in `window` ended.
    ///
    /// A drop effect of [`DropEffect::None`] means the pane was released outside every window:
    /// it is torn out into a new window, or its window moves if it was the only pane. Whatever
    /// happens, the drag origin is cleared, every window forgets the dragged pane and pointer
    /// events are re-enabled everywhere.
    ///
    /// A drag end from any window other than the one the active drag started in is ignored.
    ///
    /// # Errors
    /// [`TransferError::NotDragOrigin`] for a drag end from the wrong window (the active drag is
    /// left untouched), or a failed tear-out; the pane is then back in `window`.
    pub fn pane_header_drag_end(
        &mut self,
        window: ViewportId,
        end: DragEnd,
    ) -> Result<DragOutcome, TransferError> {
        if let Some(origin) = self.session.origin().filter(|origin| *origin != window) {
            log::warn!("drag end from {window:?} ignored: the drag started in {origin:?}");
            self.debug_log_event(format!(
                "drag_end ignored window={window:?} origin={origin:?}"
            ));
            return Err(TransferError::NotDragOrigin { window, origin });
        }

        self.registry.take_drag_start_window();

        let external = match (end.drop_effect, self.session.pane().cloned()) {
            (DropEffect::None, Some(pane)) if self.session.outcome().is_none() => self
                .move_pane_outside_windows(window, pane, end.screen_pos)
                .map(Some),
            _ => Ok(None),
        };
        if let Ok(Some(outcome)) = &external {
            self.session.record(*outcome);
        }

        self.registry.for_each_window(|target| {
            if let Some(dock) = self.windows.get_mut(&target) {
                dock.surface.clear_drag();
                dock.document.enable_content_pointer_events();
            }
        });

        let finished = self.session.finish();
        if let Some(finished) = &finished {
            self.debug_log_event(format!(
                "drag_end session={} pane={:?} outcome={:?}",
                finished.id, finished.pane.content_id, finished.outcome
            ));
        }
        self.close_empty_child_windows();
        self.check_integrity("drag_end");

        external?;
        Ok(finished.map_or(DragOutcome::NoOp, |finished| finished.outcome))
    }

    /// Pull the pane and its content out of the drag origin into `target`.
    fn adopt_from_drag_start_window(
        &mut self,
        target: ViewportId,
        content_id: &str,
    ) -> Result<(), TransferError> {
        let source = self
            .registry
            .drag_start_window()
            .filter(|source| self.registry.is_registered(*source))
            .ok_or(TransferError::StaleDragSource)?;
        if source == target {
            return Err(TransferError::ContentMissing {
                window: target,
                slot: content_id.to_owned(),
            });
        }

        let source_dock = self
            .windows
            .get_mut(&source)
            .ok_or(TransferError::StaleDragSource)?;
        let source_layout_before = source_dock.surface.layout().clone();
        source_dock.surface.remove_pane(content_id);

        if let Err(err) = self.transfer_content(source, target, content_id) {
            if let Some(dock) = self.windows.get_mut(&source) {
                dock.surface.set_layout(source_layout_before);
            }
            return Err(err);
        }
        Ok(())
    }

    /// The drop landed outside every window.
    fn move_pane_outside_windows(
        &mut self,
        source: ViewportId,
        pane: ContentPane,
        screen_pos: Pos2,
    ) -> Result<DragOutcome, TransferError> {
        let default_size = self.options.default_child_inner_size;
        let dock = self
            .windows
            .get_mut(&source)
            .ok_or(TransferError::UnknownWindow(source))?;

        if dock.surface.layout().is_sole_pane(&pane.content_id) {
            let size = dock.outer_rect.map_or(default_size, |rect| rect.size());
            dock.outer_rect = Some(Rect::from_min_size(screen_pos, size));
            self.shell.move_window(source, screen_pos);
            self.debug_log_event(format!(
                "external_move window={source:?} to=({:.1},{:.1})",
                screen_pos.x, screen_pos.y
            ));
            return Ok(DragOutcome::ExternalMove);
        }

        let Some(element) = dock.document.query_slot(&pane.content_id) else {
            return Err(TransferError::ContentMissing {
                window: source,
                slot: pane.content_id,
            });
        };
        let measured = element.rect.map(|rect| rect.size());

        let layout_before = dock.surface.layout().clone();
        let Some(mut removed) = dock.surface.remove_pane(&pane.content_id) else {
            return Err(TransferError::PaneNotFound {
                window: source,
                content_id: pane.content_id,
            });
        };
        if self.options.pin_torn_out_panes {
            removed.is_pinned = true;
        }

        let rect = Rect::from_min_size(screen_pos, self.options.child_inner_size(measured));
        let title = removed.header.clone();
        let content_id = removed.content_id.clone();
        match self.open_child_window(
            rect,
            title,
            ReadyAction::TearOut {
                source,
                pane: removed,
            },
        ) {
            Ok(child) => {
                self.debug_log_event(format!(
                    "tear_out pane={content_id:?} from={source:?} into={child:?}"
                ));
                Ok(DragOutcome::NewWindow)
            }
            Err(err) => {
                self.restore_layout(source, layout_before);
                log::warn!("tear-out of {content_id:?} from {source:?} failed: {err}");
                Err(err)
            }
        }
    }

    fn restore_layout(&mut self, window: ViewportId, layout: DockLayout) {
        if let Some(dock) = self.windows.get_mut(&window) {
            dock.surface.set_layout(layout);
        }
    }
}
