use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Saturating counters for navigation activity.
#[derive(Debug, Default, Clone)]
pub struct NavMetrics {
    key_events: u64,
    focus_moves: u64,
    exits_taken: u64,
    blocked: u64,
    no_target: u64,
    panels_built: u64,
    cells_dropped: u64,
}

impl NavMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_key_event(&mut self) {
        self.key_events = self.key_events.saturating_add(1);
    }

    pub fn record_move(&mut self) {
        self.focus_moves = self.focus_moves.saturating_add(1);
    }

    pub fn record_exit(&mut self) {
        self.exits_taken = self.exits_taken.saturating_add(1);
    }

    pub fn record_blocked(&mut self) {
        self.blocked = self.blocked.saturating_add(1);
    }

    pub fn record_no_target(&mut self) {
        self.no_target = self.no_target.saturating_add(1);
    }

    pub fn record_panel_built(&mut self, dropped: usize) {
        self.panels_built = self.panels_built.saturating_add(1);
        self.cells_dropped = self.cells_dropped.saturating_add(dropped as u64);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            key_events: self.key_events,
            focus_moves: self.focus_moves,
            exits_taken: self.exits_taken,
            blocked: self.blocked,
            no_target: self.no_target,
            panels_built: self.panels_built,
            cells_dropped: self.cells_dropped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub key_events: u64,
    pub focus_moves: u64,
    pub exits_taken: u64,
    pub blocked: u64,
    pub no_target: u64,
    pub panels_built: u64,
    pub cells_dropped: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "nav_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("key_events".to_string(), json!(self.key_events));
        map.insert("focus_moves".to_string(), json!(self.focus_moves));
        map.insert("exits_taken".to_string(), json!(self.exits_taken));
        map.insert("blocked".to_string(), json!(self.blocked));
        map.insert("no_target".to_string(), json!(self.no_target));
        map.insert("panels_built".to_string(), json!(self.panels_built));
        map.insert("cells_dropped".to_string(), json!(self.cells_dropped));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut metrics = NavMetrics::new();
        metrics.record_key_event();
        metrics.record_key_event();
        metrics.record_move();
        metrics.record_panel_built(3);

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.key_events, 2);
        assert_eq!(snapshot.focus_moves, 1);
        assert_eq!(snapshot.panels_built, 1);
        assert_eq!(snapshot.cells_dropped, 3);
        assert_eq!(snapshot.uptime_ms, 1500);
    }

    #[test]
    fn snapshot_event_carries_all_fields() {
        let metrics = NavMetrics::new();
        let event = metrics
            .snapshot(Duration::from_secs(1))
            .to_log_event("nav::session.metrics");
        assert_eq!(event.message, "nav_metrics");
        assert_eq!(event.fields.len(), 8);
    }
}
