use egui::ViewportId;

use crate::layout::ContentPane;

/// How a finished drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// Dropped back into the window it came from.
    Local,

    /// Adopted by another open window.
    CrossWindow,

    /// The sole pane was dragged outside every window; the window itself moved.
    ExternalMove,

    /// Torn out into a newly opened window.
    NewWindow,

    /// Nothing was docked.
    NoOp,
}

#[derive(Clone, Debug)]
struct ActiveSession {
    id: u64,
    pane: ContentPane,

    /// The window whose native drag this is; only its drag end finishes the session.
    origin: ViewportId,
    outcome: Option<DragOutcome>,
}

/// A drag that has returned to idle.
#[derive(Clone, Debug)]
pub struct FinishedSession {
    pub id: u64,
    pub pane: ContentPane,
    pub outcome: DragOutcome,
}

/// `Idle → Dragging → Completed → Idle`, with at most one drag in flight.
#[derive(Debug, Default)]
pub(super) struct DragSession {
    next_id: u64,
    active: Option<ActiveSession>,
}

impl DragSession {
    pub(super) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub(super) fn origin(&self) -> Option<ViewportId> {
        self.active.as_ref().map(|active| active.origin)
    }

    pub(super) fn pane(&self) -> Option<&ContentPane> {
        self.active.as_ref().map(|active| &active.pane)
    }

    /// Returns the id of the session already in flight as the error.
    pub(super) fn start(&mut self, pane: ContentPane, origin: ViewportId) -> Result<u64, u64> {
        if let Some(active) = &self.active {
            return Err(active.id);
        }

        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        self.active = Some(ActiveSession {
            id,
            pane,
            origin,
            outcome: None,
        });
        Ok(id)
    }

    /// The first recorded outcome wins; later ones are ignored.
    pub(super) fn record(&mut self, outcome: DragOutcome) -> bool {
        match &mut self.active {
            Some(active) if active.outcome.is_none() => {
                active.outcome = Some(outcome);
                true
            }
            _ => false,
        }
    }

    pub(super) fn outcome(&self) -> Option<DragOutcome> {
        self.active.as_ref().and_then(|active| active.outcome)
    }

    pub(super) fn finish(&mut self) -> Option<FinishedSession> {
        let active = self.active.take()?;
        Some(FinishedSession {
            id: active.id,
            pane: active.pane,
            outcome: active.outcome.unwrap_or(DragOutcome::NoOp),
        })
    }
}
