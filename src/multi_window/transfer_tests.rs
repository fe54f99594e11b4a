use std::collections::BTreeSet;

use egui::{Rect, ViewportId, ViewportIdSet, pos2, vec2};

use super::integrity;
use super::{
    DockingWindows, DockingWindowsOptions, DragEnd, DragError, DragOutcome, HeaderKind,
    OpenWindowRequest, ShellCommand, ShellError, TransferError, WindowRole, WindowShell,
};
use crate::content::{PointerEvents, generate_content};
use crate::layout::{ContentPane, DockEdge, DockLayout, DropPosition, LayoutNode, SplitPane};

#[derive(Debug, Default)]
struct RecordingShell {
    commands: Vec<ShellCommand>,
    deny_open: bool,
}

impl RecordingShell {
    fn opened(&self) -> Vec<&OpenWindowRequest> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                ShellCommand::Open(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn closed(&self) -> Vec<ViewportId> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                ShellCommand::Close { window } => Some(*window),
                _ => None,
            })
            .collect()
    }

    fn moved(&self) -> Vec<(ViewportId, egui::Pos2)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                ShellCommand::Move { window, outer_pos } => Some((*window, *outer_pos)),
                _ => None,
            })
            .collect()
    }
}

impl WindowShell for RecordingShell {
    fn open_window(&mut self, request: &OpenWindowRequest) -> Result<(), ShellError> {
        if self.deny_open {
            return Err(ShellError::WindowCreationDenied {
                reason: "test".to_owned(),
            });
        }
        self.commands.push(ShellCommand::Open(request.clone()));
        Ok(())
    }

    fn move_window(&mut self, window: ViewportId, outer_pos: egui::Pos2) {
        self.commands.push(ShellCommand::Move { window, outer_pos });
    }

    fn close_window(&mut self, window: ViewportId) {
        self.commands.push(ShellCommand::Close { window });
    }
}

const MAIN: ViewportId = ViewportId::ROOT;

fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn test_options() -> DockingWindowsOptions {
    DockingWindowsOptions {
        debug_event_log: true,
        debug_integrity: true,
        debug_integrity_panic: true,
        ..Default::default()
    }
}

fn root_split(ids: &[&str]) -> DockLayout {
    DockLayout::new(SplitPane::new(
        Default::default(),
        ids.iter()
            .map(|id| LayoutNode::Content(ContentPane::new(*id, id.to_uppercase())))
            .collect(),
    ))
}

fn docking_with(ids: &[&str]) -> DockingWindows<RecordingShell> {
    init_logging();
    let mut docking =
        DockingWindows::new_with_options(RecordingShell::default(), root_split(ids), test_options());
    for (i, id) in ids.iter().enumerate() {
        docking
            .append_content(MAIN, generate_content(*id, format!("https://example.com/{id}")))
            .expect("unique slot");
        docking.header_connected(MAIN, HeaderKind::Pane, id);
        let rect = Rect::from_min_size(pos2(i as f32 * 400.0, 0.0), vec2(400.0, 300.0));
        assert!(docking.set_content_rect(MAIN, id, rect));
    }
    docking
}

fn connect_all_headers<S>(docking: &mut DockingWindows<S>) {
    for dock in docking.windows.values_mut() {
        let ids: Vec<String> = dock
            .surface
            .layout()
            .content_panes()
            .iter()
            .map(|pane| pane.content_id.clone())
            .collect();
        for id in ids {
            dock.surface.header_connected(HeaderKind::Pane, id);
        }
    }
}

fn pane_ids<S: WindowShell>(docking: &DockingWindows<S>, window: ViewportId) -> Vec<String> {
    docking
        .layout(window)
        .map(|layout| {
            layout
                .content_panes()
                .iter()
                .map(|pane| pane.content_id.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Drag `content_id` out of `from` to empty desktop space and let the new window load.
fn tear_out(
    docking: &mut DockingWindows<RecordingShell>,
    from: ViewportId,
    content_id: &str,
) -> ViewportId {
    docking
        .pane_header_drag_start(from, content_id)
        .expect("drag starts");
    assert_eq!(
        docking.pane_header_drag_end(from, DragEnd::outside(pos2(900.0, 500.0))),
        Ok(DragOutcome::NewWindow)
    );
    let child = *docking.child_windows().last().expect("child opened");
    docking.window_loaded(child).expect("child loads");
    connect_all_headers(docking);
    child
}

fn assert_integrity<S>(docking: &DockingWindows<S>) {
    let issues = integrity::workspace_integrity_issues(docking);
    assert!(issues.is_empty(), "integrity failed:\n{}", issues.join("\n"));
}

#[test]
fn tearing_out_one_of_two_panes_opens_sized_child_window() {
    let mut docking = docking_with(&["grid", "chart"]);

    docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    let outcome = docking.pane_header_drag_end(MAIN, DragEnd::outside(pos2(900.0, 500.0)));
    assert_eq!(outcome, Ok(DragOutcome::NewWindow));

    assert_eq!(pane_ids(&docking, MAIN), ["grid"]);
    assert_eq!(docking.child_windows().len(), 1);
    let child = docking.child_windows()[0];

    let opened = docking.shell().opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].id, child);
    assert_eq!(
        opened[0].rect,
        Rect::from_min_size(pos2(900.0, 500.0), vec2(400.0, 300.0))
    );
    assert_eq!(opened[0].url, docking.options.document_url);

    // The content stays where it is until the new window has loaded.
    assert_eq!(docking.owner_of_slot("chart"), Some(MAIN));
    assert!(pane_ids(&docking, child).is_empty());
    assert!(docking.shell().closed().is_empty());

    docking.window_loaded(child).expect("child loads");
    assert_eq!(pane_ids(&docking, child), ["chart"]);
    assert!(docking.layout(child).is_some_and(|l| l.is_sole_pane("chart")));
    assert!(
        docking
            .layout(child)
            .and_then(|l| l.find("chart"))
            .is_some_and(|pane| pane.is_pinned)
    );
    assert_eq!(docking.owner_of_slot("chart"), Some(child));
    assert_eq!(docking.role(child), Some(WindowRole::Child { main: MAIN }));
    assert!(docking.debug_log().any(|line| line.contains("tear_out")));
    assert_integrity(&docking);
}

#[test]
fn dropping_child_pane_into_main_closes_the_emptied_child() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");
    assert_eq!(docking.child_windows(), [child]);

    docking
        .pane_header_drag_start(child, "chart")
        .expect("drag starts");
    let dropped = docking.document_drop(
        MAIN,
        Some(DropPosition::Beside {
            content_id: "grid".to_owned(),
            edge: DockEdge::Right,
        }),
    );
    assert_eq!(dropped, Ok(Some(DragOutcome::CrossWindow)));

    assert_eq!(pane_ids(&docking, MAIN), ["grid", "chart"]);
    assert!(pane_ids(&docking, child).is_empty());
    assert_eq!(docking.owner_of_slot("chart"), Some(MAIN));
    assert_eq!(docking.shell().closed(), [child]);

    assert_eq!(
        docking.pane_header_drag_end(child, DragEnd::inside(pos2(100.0, 100.0))),
        Ok(DragOutcome::CrossWindow)
    );
    assert_eq!(docking.window_unloaded(child), Ok(()));
    assert!(docking.child_windows().is_empty());
    assert_integrity(&docking);
}

#[test]
fn dragging_sole_pane_outside_moves_the_window() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");
    let opened_before = docking.shell().opened().len();

    docking
        .pane_header_drag_start(child, "chart")
        .expect("drag starts");
    assert_eq!(
        docking.pane_header_drag_end(child, DragEnd::outside(pos2(50.0, 60.0))),
        Ok(DragOutcome::ExternalMove)
    );

    assert_eq!(docking.shell().moved(), [(child, pos2(50.0, 60.0))]);
    assert_eq!(docking.shell().opened().len(), opened_before);
    assert_eq!(docking.owner_of_slot("chart"), Some(child));
    assert_eq!(pane_ids(&docking, child), ["chart"]);
    assert_eq!(
        docking.window_outer_rect(child).map(|r| r.min),
        Some(pos2(50.0, 60.0))
    );
    assert_eq!(docking.child_windows(), [child]);
}

#[test]
fn nested_sole_pane_moves_the_window() {
    let mut docking = docking_with(&["grid"]);
    let nested = DockLayout::new(SplitPane::new(
        Default::default(),
        vec![LayoutNode::Split(SplitPane::new(
            crate::layout::SplitOrientation::Vertical,
            vec![LayoutNode::Content(ContentPane::new("grid", "GRID"))],
        ))],
    ));
    assert!(docking.set_layout(MAIN, nested.clone()));

    docking
        .pane_header_drag_start(MAIN, "grid")
        .expect("drag starts");
    assert_eq!(
        docking.pane_header_drag_end(MAIN, DragEnd::outside(pos2(30.0, 40.0))),
        Ok(DragOutcome::ExternalMove)
    );
    assert_eq!(docking.shell().moved(), [(MAIN, pos2(30.0, 40.0))]);
    assert!(docking.shell().opened().is_empty());
    assert_eq!(docking.layout(MAIN), Some(&nested));
}

#[test]
fn drag_end_from_another_window_leaves_the_drag_alone() {
    let mut docking = docking_with(&["grid", "chart", "pie"]);
    let child = tear_out(&mut docking, MAIN, "pie");

    let session = docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    assert_eq!(
        docking.pane_header_drag_start(child, "pie"),
        Err(DragError::SessionActive { session })
    );
    assert_eq!(
        docking.pane_header_drag_end(child, DragEnd::outside(pos2(900.0, 500.0))),
        Err(TransferError::NotDragOrigin {
            window: child,
            origin: MAIN,
        })
    );
    assert!(docking.is_dragging());
    assert_eq!(docking.registry().drag_start_window(), Some(MAIN));
    assert_eq!(docking.shell().opened().len(), 1);
    assert!(docking.shell().moved().is_empty());

    assert_eq!(
        docking.document_drop(child, Some(DropPosition::Root)),
        Ok(Some(DragOutcome::CrossWindow))
    );
    assert_eq!(
        docking.pane_header_drag_end(MAIN, DragEnd::inside(pos2(0.0, 0.0))),
        Ok(DragOutcome::CrossWindow)
    );
    assert_eq!(pane_ids(&docking, child), ["pie", "chart"]);
    assert_eq!(docking.owner_of_slot("chart"), Some(child));
    assert!(!docking.is_dragging());
}

#[test]
fn main_window_with_one_pane_moves_too() {
    let mut docking = docking_with(&["grid"]);
    docking
        .pane_header_drag_start(MAIN, "grid")
        .expect("drag starts");
    assert_eq!(
        docking.pane_header_drag_end(MAIN, DragEnd::outside(pos2(10.0, 20.0))),
        Ok(DragOutcome::ExternalMove)
    );
    assert_eq!(docking.shell().moved(), [(MAIN, pos2(10.0, 20.0))]);
    assert!(docking.child_windows().is_empty());
}

#[test]
fn drag_start_notifies_main_then_children_in_order() {
    let mut docking = docking_with(&["a", "b", "c"]);
    let first = tear_out(&mut docking, MAIN, "b");
    let second = tear_out(&mut docking, MAIN, "c");

    docking
        .pane_header_drag_start(second, "c")
        .expect("drag starts");
    let notified = format!("notified={:?}", [MAIN, first, second]);
    assert!(
        docking
            .debug_log()
            .any(|line| line.contains("drag_start") && line.contains(&notified))
    );

    for window in [MAIN, first, second] {
        assert_eq!(
            docking
                .surface(window)
                .and_then(|s| s.dragged_pane())
                .map(|p| p.content_id.as_str()),
            Some("c")
        );
        assert!(
            docking
                .document(window)
                .is_some_and(|d| d.pointer_events_disabled())
        );
    }
    assert_eq!(docking.registry().drag_start_window(), Some(second));

    docking
        .pane_header_drag_end(second, DragEnd::inside(pos2(0.0, 0.0)))
        .expect("drag ends");
    for window in [MAIN, first, second] {
        let surface = docking.surface(window).expect("open window");
        assert!(surface.dragged_pane().is_none());
        assert!(surface.drop_position().is_none());
        let document = docking.document(window).expect("open window");
        for slot in document.slots() {
            assert_eq!(
                document.query_slot(slot).map(|e| e.pointer_events),
                Some(PointerEvents::Auto)
            );
        }
    }
    assert_eq!(docking.registry().drag_start_window(), None);
    assert!(!docking.is_dragging());
}

#[test]
fn main_window_never_closes_itself() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");

    docking.header_connected(MAIN, HeaderKind::Tab, "grid");
    docking
        .pane_header_drag_start(MAIN, "grid")
        .expect("drag starts");
    assert_eq!(
        docking.document_drop(
            child,
            Some(DropPosition::Beside {
                content_id: "chart".to_owned(),
                edge: DockEdge::Left,
            })
        ),
        Ok(Some(DragOutcome::CrossWindow))
    );
    docking
        .pane_header_drag_end(MAIN, DragEnd::inside(pos2(0.0, 0.0)))
        .expect("drag ends");

    assert!(pane_ids(&docking, MAIN).is_empty());
    assert_eq!(pane_ids(&docking, child), ["grid", "chart"]);
    assert!(!docking.shell().closed().contains(&MAIN));
    assert!(docking.shell().closed().is_empty());
    assert_eq!(docking.role(MAIN), Some(WindowRole::Main));
}

#[test]
fn local_drop_rearranges_without_moving_content() {
    let mut docking = docking_with(&["grid", "chart"]);
    docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    docking.set_drop_position(
        MAIN,
        Some(DropPosition::Beside {
            content_id: "grid".to_owned(),
            edge: DockEdge::Left,
        }),
    );
    assert_eq!(
        docking.document_drop(MAIN, None),
        Ok(Some(DragOutcome::Local))
    );
    assert_eq!(
        docking.pane_header_drag_end(MAIN, DragEnd::inside(pos2(0.0, 0.0))),
        Ok(DragOutcome::Local)
    );
    assert_eq!(pane_ids(&docking, MAIN), ["chart", "grid"]);
    assert_eq!(docking.owner_of_slot("chart"), Some(MAIN));
}

#[test]
fn drop_without_target_is_a_no_op() {
    let mut docking = docking_with(&["grid", "chart"]);
    let before = docking.layout(MAIN).cloned();

    assert_eq!(docking.document_drop(MAIN, Some(DropPosition::Root)), Ok(None));

    docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    assert_eq!(docking.document_drop(MAIN, None), Ok(None));
    assert_eq!(
        docking.pane_header_drag_end(MAIN, DragEnd::inside(pos2(0.0, 0.0))),
        Ok(DragOutcome::NoOp)
    );
    assert_eq!(docking.layout(MAIN).cloned(), before);
}

#[test]
fn overlapping_drag_is_rejected() {
    let mut docking = docking_with(&["grid", "chart"]);
    let first = docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    assert_eq!(
        docking.pane_header_drag_start(MAIN, "grid"),
        Err(DragError::SessionActive { session: first })
    );
    assert_eq!(
        docking
            .surface(MAIN)
            .and_then(|s| s.dragged_pane())
            .map(|p| p.content_id.as_str()),
        Some("chart")
    );

    docking
        .pane_header_drag_end(MAIN, DragEnd::inside(pos2(0.0, 0.0)))
        .expect("drag ends");
    let second = docking
        .pane_header_drag_start(MAIN, "grid")
        .expect("drag starts after the first ended");
    assert!(second > first);
}

#[test]
fn drag_start_validates_window_pane_and_header() {
    let mut docking = docking_with(&["grid"]);
    let stranger = ViewportId::from_hash_of("stranger");
    assert_eq!(
        docking.pane_header_drag_start(stranger, "grid"),
        Err(DragError::UnknownWindow(stranger))
    );
    assert!(matches!(
        docking.pane_header_drag_start(MAIN, "missing"),
        Err(DragError::PaneNotFound { .. })
    ));

    docking.header_disconnected(MAIN, HeaderKind::Pane, "grid");
    assert!(matches!(
        docking.pane_header_drag_start(MAIN, "grid"),
        Err(DragError::HeaderNotDraggable { .. })
    ));
    assert!(!docking.is_dragging());
}

#[test]
fn adoption_from_closed_origin_fails_and_rolls_back() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");
    let main_before = docking.layout(MAIN).cloned();

    docking
        .pane_header_drag_start(child, "chart")
        .expect("drag starts");
    assert_eq!(
        docking.window_unloaded(child),
        Err(TransferError::ContentLost {
            window: child,
            slots: vec!["chart".to_owned()],
        })
    );

    assert_eq!(
        docking.document_drop(MAIN, Some(DropPosition::Root)),
        Err(TransferError::StaleDragSource)
    );
    assert_eq!(docking.layout(MAIN).cloned(), main_before);
    assert_eq!(docking.owner_of_slot("chart"), None);

    assert_eq!(
        docking.pane_header_drag_end(child, DragEnd::inside(pos2(0.0, 0.0))),
        Ok(DragOutcome::NoOp)
    );
    assert!(!docking.is_dragging());
}

#[test]
fn refused_window_keeps_pane_in_source() {
    let mut docking = docking_with(&["grid", "chart"]);
    docking.shell_mut().deny_open = true;
    let before = docking.layout(MAIN).cloned();

    docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    let result = docking.pane_header_drag_end(MAIN, DragEnd::outside(pos2(900.0, 500.0)));
    assert!(matches!(result, Err(TransferError::WindowOpenFailed(_))));

    assert_eq!(docking.layout(MAIN).cloned(), before);
    assert_eq!(docking.owner_of_slot("chart"), Some(MAIN));
    assert!(docking.child_windows().is_empty());
    assert!(!docking.is_dragging());
    assert_eq!(docking.registry().drag_start_window(), None);
}

#[test]
fn child_closed_before_load_returns_the_pane() {
    let mut docking = docking_with(&["grid", "chart"]);
    docking
        .pane_header_drag_start(MAIN, "chart")
        .expect("drag starts");
    docking
        .pane_header_drag_end(MAIN, DragEnd::outside(pos2(900.0, 500.0)))
        .expect("tear-out");
    let child = docking.child_windows()[0];
    assert!(!docking.is_loaded(child));

    assert_eq!(docking.window_unloaded(child), Ok(()));
    assert_eq!(pane_ids(&docking, MAIN), ["grid", "chart"]);
    assert!(
        docking
            .layout(MAIN)
            .and_then(|l| l.find("chart"))
            .is_some_and(|pane| !pane.is_pinned)
    );
    assert_eq!(docking.owner_of_slot("chart"), Some(MAIN));
    assert!(docking.child_windows().is_empty());

    assert_eq!(
        docking.window_loaded(child),
        Err(TransferError::UnknownWindow(child))
    );
}

#[test]
fn unload_is_reported_once_and_never_for_main() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");

    assert!(docking.window_unloaded(child).is_err());
    assert_eq!(
        docking.window_unloaded(child),
        Err(TransferError::UnknownWindow(child))
    );
    assert_eq!(
        docking.window_unloaded(MAIN),
        Err(TransferError::MainWindowUnloaded)
    );
    assert_eq!(docking.main_window(), MAIN);
}

#[test]
fn window_loaded_runs_ready_action_once() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");
    assert_eq!(docking.window_loaded(child), Ok(()));
    assert_eq!(pane_ids(&docking, child), ["chart"]);
    assert_eq!(docking.owner_of_slot("chart"), Some(child));
}

#[test]
fn splitter_resize_gates_only_its_window() {
    let mut docking = docking_with(&["grid", "chart", "pie"]);
    let child = tear_out(&mut docking, MAIN, "pie");

    docking.splitter_resize_start(MAIN);
    assert!(docking.document(MAIN).is_some_and(|d| d.pointer_events_disabled()));
    assert!(!docking.document(child).is_some_and(|d| d.pointer_events_disabled()));

    docking.splitter_resize_end(MAIN);
    assert!(!docking.document(MAIN).is_some_and(|d| d.pointer_events_disabled()));
}

#[test]
fn duplicate_content_is_refused() {
    let mut docking = docking_with(&["grid"]);
    assert_eq!(
        docking.append_content(MAIN, generate_content("grid", "https://example.com/other")),
        Err(TransferError::ContentAlreadyOwned {
            window: MAIN,
            slot: "grid".to_owned(),
        })
    );
}

#[test]
fn debug_summary_lists_every_window() {
    let mut docking = docking_with(&["grid", "chart"]);
    let child = tear_out(&mut docking, MAIN, "chart");
    let summary = docking.debug_summary();
    assert_eq!(summary.lines().count(), 2);
    assert!(summary.contains(&format!("{child:?}")));
    assert!(summary.contains("panes=[grid]"));
}

#[test]
fn main_viewport_uses_configured_size_and_pane_titles() {
    let docking = docking_with(&["grid", "chart"]);
    let builder = docking.main_viewport_builder();
    assert_eq!(builder.inner_size, Some(vec2(1000.0, 800.0)));
    assert_eq!(builder.title.as_deref(), Some("GRID | CHART"));
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C4_3E1D_0000_0001)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0 >> 16
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        Some(items[self.next_usize(items.len())])
    }
}

/// Deliver close requests the way a host would: each requested close becomes an unload.
fn deliver_closes(docking: &mut DockingWindows<RecordingShell>, delivered: &mut ViewportIdSet) {
    for window in docking.shell().closed() {
        if delivered.insert(window) {
            assert_eq!(docking.window_unloaded(window), Ok(()));
        }
    }
}

fn loaded_windows(docking: &DockingWindows<RecordingShell>) -> Vec<ViewportId> {
    docking
        .registry()
        .windows()
        .into_iter()
        .filter(|w| docking.is_loaded(*w))
        .collect()
}

#[test]
fn random_transfers_keep_ownership_and_registry_consistent() {
    let all_slots: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
    let ids: Vec<&str> = all_slots.iter().map(String::as_str).collect();

    for seed in 0..16 {
        let mut rng = Rng::new(seed);
        let mut docking = docking_with(&ids);
        let mut lost: BTreeSet<String> = BTreeSet::new();
        let mut delivered = ViewportIdSet::default();
        let mut pending: Vec<ViewportId> = Vec::new();

        for step in 0..60 {
            connect_all_headers(&mut docking);
            match rng.next_usize(4) {
                0 => {
                    let sources: Vec<ViewportId> = loaded_windows(&docking)
                        .into_iter()
                        .filter(|w| docking.layout(*w).is_some_and(|l| l.pane_count() >= 2))
                        .collect();
                    if let Some(source) = rng.pick(&sources) {
                        let panes = pane_ids(&docking, source);
                        let pane = panes[rng.next_usize(panes.len())].clone();
                        docking
                            .pane_header_drag_start(source, &pane)
                            .expect("drag starts");
                        let outcome = docking
                            .pane_header_drag_end(source, DragEnd::outside(pos2(10.0, 10.0)));
                        assert_eq!(outcome, Ok(DragOutcome::NewWindow), "seed={seed} step={step}");
                        if let Some(&child) = docking.child_windows().last() {
                            pending.push(child);
                        }
                    }
                }
                1 => {
                    if !pending.is_empty() {
                        let child = pending.remove(rng.next_usize(pending.len()));
                        if docking.registry().is_registered(child) {
                            // Fails only when the source closed and took the content with it.
                            docking.window_loaded(child).ok();
                        }
                    }
                }
                2 => {
                    if let Some(child) = rng.pick(&docking.child_windows()) {
                        match docking.window_unloaded(child) {
                            Ok(()) => {}
                            Err(TransferError::ContentLost { slots, .. }) => lost.extend(slots),
                            Err(err) => panic!("seed={seed} step={step}: {err}"),
                        }
                        delivered.insert(child);
                        pending.retain(|w| *w != child);
                    }
                }
                _ => {
                    let loaded = loaded_windows(&docking);
                    let sources: Vec<ViewportId> = loaded
                        .iter()
                        .copied()
                        .filter(|w| docking.layout(*w).is_some_and(|l| !l.is_empty()))
                        .collect();
                    if let Some(source) = rng.pick(&sources) {
                        let targets: Vec<ViewportId> =
                            loaded.iter().copied().filter(|w| *w != source).collect();
                        if let Some(target) = rng.pick(&targets) {
                            let panes = pane_ids(&docking, source);
                            let pane = panes[rng.next_usize(panes.len())].clone();
                            docking
                                .pane_header_drag_start(source, &pane)
                                .expect("drag starts");
                            assert_eq!(
                                docking.document_drop(target, Some(DropPosition::Root)),
                                Ok(Some(DragOutcome::CrossWindow)),
                                "seed={seed} step={step}"
                            );
                            docking
                                .pane_header_drag_end(source, DragEnd::inside(pos2(0.0, 0.0)))
                                .expect("drag ends");
                            assert_eq!(docking.owner_of_slot(&pane), Some(target));
                        }
                    }
                }
            }
            deliver_closes(&mut docking, &mut delivered);

            assert_integrity(&docking);

            let registered: ViewportIdSet = docking.child_windows().into_iter().collect();
            let open: ViewportIdSet = docking
                .windows
                .keys()
                .copied()
                .filter(|w| *w != MAIN)
                .collect();
            assert_eq!(registered, open, "seed={seed} step={step}");
            for child in &registered {
                assert_eq!(docking.registry().main_of(*child), Some(MAIN));
            }

            for slot in &all_slots {
                let owners = docking
                    .windows
                    .values()
                    .filter(|dock| dock.document.contains_slot(slot))
                    .count();
                let expected = usize::from(!lost.contains(slot));
                assert_eq!(owners, expected, "seed={seed} step={step} slot={slot}");
            }
        }
    }
}
