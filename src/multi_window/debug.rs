use itertools::Itertools as _;

use super::integrity;
use super::{DockingWindows, WindowShell};

impl<S: WindowShell> DockingWindows<S> {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        if !self.options.debug_event_log {
            return;
        }
        self.push_debug_log_line(message);
    }

    fn push_debug_log_line(&mut self, message: String) {
        self.debug_event = self.debug_event.wrapping_add(1);
        let cap = self.options.debug_event_log_capacity.clamp(1, 10_000);
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[event {}] {}", self.debug_event, message));
    }

    /// Recorded protocol events, oldest first. Empty unless `options.debug_event_log` is set.
    pub fn debug_log(&self) -> impl Iterator<Item = &str> + '_ {
        self.debug_log.iter().map(String::as_str)
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// One line per window: role, panes, owned content.
    pub fn debug_summary(&self) -> String {
        self.registry
            .windows()
            .into_iter()
            .filter_map(|window| {
                let dock = self.windows.get(&window)?;
                Some(format!(
                    "{window:?} role={:?} loaded={} panes=[{}] content=[{}]",
                    self.registry.role(window),
                    dock.loaded,
                    dock.surface
                        .layout()
                        .content_panes()
                        .iter()
                        .map(|pane| pane.content_id.as_str())
                        .join(", "),
                    dock.document.slots().join(", "),
                ))
            })
            .join("\n")
    }

    pub(super) fn check_integrity(&mut self, context: &str) {
        if !self.options.debug_integrity {
            return;
        }
        let issues = integrity::workspace_integrity_issues(self);
        if issues.is_empty() {
            return;
        }
        for issue in &issues {
            log::warn!("{context}: {issue}");
            self.push_debug_log_line(format!("{context}: {issue}"));
        }
        if self.options.debug_integrity_panic {
            panic!(
                "integrity check failed after {context}:\n{}\n{}",
                issues.join("\n"),
                self.debug_summary()
            );
        }
    }
}
