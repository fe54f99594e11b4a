use std::collections::BTreeMap;

use ahash::HashSet;
use egui::{ViewportId, ViewportIdSet};

use super::{DockingWindows, ReadyAction};

/// Content ownership and registry consistency across all windows.
pub(super) fn workspace_integrity_issues<S>(docking: &DockingWindows<S>) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    // Content torn out of a window but not yet moved into its new window.
    let in_flight: HashSet<(ViewportId, &str)> = docking
        .pending_ready
        .values()
        .filter_map(|action| match action {
            ReadyAction::TearOut { source, pane } => Some((*source, pane.content_id.as_str())),
            ReadyAction::Restore { .. } => None,
        })
        .collect();

    let mut owner_of: BTreeMap<&str, ViewportId> = BTreeMap::new();
    let mut pane_window: BTreeMap<&str, ViewportId> = BTreeMap::new();

    for (&window, dock) in &docking.windows {
        for slot in dock.document.slots() {
            if let Some(previous) = owner_of.insert(slot, window) {
                issues.push(format!(
                    "integrity: content {slot:?} owned by {previous:?} and {window:?}"
                ));
            }
            if !dock.surface.layout().contains(slot) && !in_flight.contains(&(window, slot)) {
                issues.push(format!(
                    "integrity: content {slot:?} in {window:?} has no pane"
                ));
            }
        }

        for pane in dock.surface.layout().content_panes() {
            let id = pane.content_id.as_str();
            if let Some(previous) = pane_window.insert(id, window) {
                issues.push(format!(
                    "integrity: pane {id:?} docked in {previous:?} and {window:?}"
                ));
            }
            if dock.loaded && !dock.document.contains_slot(id) {
                issues.push(format!(
                    "integrity: pane {id:?} in {window:?} has no content"
                ));
            }
        }

        if docking.registry.role(window).is_none() {
            issues.push(format!("integrity: window {window:?} is not registered"));
        }
    }

    let mut seen = ViewportIdSet::default();
    for record in docking.registry.child_records() {
        if !seen.insert(record.id) {
            issues.push(format!("integrity: child {:?} registered twice", record.id));
        }
        if record.main != docking.registry.main_window() {
            issues.push(format!(
                "integrity: child {:?} points at {:?}, not main",
                record.id, record.main
            ));
        }
        if !docking.windows.contains_key(&record.id) {
            issues.push(format!(
                "integrity: child {:?} registered but has no window",
                record.id
            ));
        }
    }

    if let Some(origin) = docking.registry.drag_start_window() {
        if !docking.windows.contains_key(&origin) {
            issues.push(format!("integrity: drag origin {origin:?} has no window"));
        }
    }

    issues
}
