use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossterm::event::KeyEvent;
use serde_json::json;

use crate::adapter::{FocusTarget, Geometry, NavHints, NavKey, classify, parse_nav_hints};
use crate::error::Result;
use crate::geometry::{Direction, Directional, ReferenceMode};
use crate::grid::{ExitRule, NeighborSlot, NeighborTable};
use crate::ids::IdAllocator;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::NavMetrics;
use crate::resolver::{NavigableElement, Resolution, resolve};

/// Configuration knobs for a navigation session.
#[derive(Clone, Default)]
pub struct SessionConfig {
    /// Reference-point style used by free-form resolution.
    pub reference_mode: ReferenceMode,
    /// Optional structured logger for session activity.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the host's diagnostics.
    pub metrics: Option<Arc<Mutex<NavMetrics>>>,
}

impl SessionConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(NavMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<NavMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Outcome of one input event.
///
/// Everything except `Ignored` consumes the input; the host must suppress
/// its default key handling so directional keys never scroll the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved to a registered element or chase-map cell.
    Moved(String),
    /// Focus left the panel/registry through an exit or external target.
    Exited(String),
    /// Enter pressed on the focused element.
    Activated(String),
    /// Input consumed, focus held in place.
    Held,
    /// No candidate and no exit; input still consumed.
    NoTarget,
    /// Not a navigation key, or nothing focused.
    Ignored,
}

impl NavOutcome {
    pub fn suppress_default(&self) -> bool {
        !matches!(self, NavOutcome::Ignored)
    }
}

enum DispatchMode {
    FreeForm,
    Grid(NeighborTable),
}

/// Composition root: owns the live registry and exit map, classifies key
/// events, and dispatches to the chase map (grid mode) or the dynamic
/// resolver (free-form mode), then drives the host's focus primitive.
///
/// Single-threaded by contract: `register`/`unregister` must not be called
/// from within a dispatch.
pub struct NavigationSession {
    geometry: Box<dyn Geometry>,
    focus: Box<dyn FocusTarget>,
    elements: Vec<NavigableElement>,
    index: HashMap<String, usize>,
    exits: Directional<ExitRule>,
    mode: DispatchMode,
    focused: Option<String>,
    config: SessionConfig,
    ids: IdAllocator,
    started: Instant,
}

impl NavigationSession {
    pub fn new<G, F>(geometry: G, focus: F) -> Self
    where
        G: Geometry + 'static,
        F: FocusTarget + 'static,
    {
        Self {
            geometry: Box::new(geometry),
            focus: Box::new(focus),
            elements: Vec::new(),
            index: HashMap::new(),
            exits: Directional::default(),
            mode: DispatchMode::FreeForm,
            focused: None,
            config: SessionConfig::default(),
            ids: IdAllocator::default(),
            started: Instant::now(),
        }
    }

    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// Add or replace a registry entry, returning its id.
    ///
    /// Re-registering an existing id replaces the entry in place and keeps
    /// its registry position, so tie-breaks stay stable; an absent id is
    /// generated from the session's allocator.
    pub fn register(&mut self, id: Option<&str>, hints: NavHints) -> String {
        let id = match id {
            Some(id) => id.to_string(),
            None => self.ids.allocate(),
        };
        let element = NavigableElement::with_hints(id.clone(), hints);
        match self.index.get(&id) {
            Some(&position) => {
                self.elements[position] = element;
            }
            None => {
                self.index.insert(id.clone(), self.elements.len());
                self.elements.push(element);
            }
        }
        self.log(
            LogLevel::Debug,
            "element_registered",
            [json_kv("element", json!(id.clone()))],
        );
        id
    }

    /// Register from a declarative `nav-*` attribute string, parsed once.
    pub fn register_attr(&mut self, id: Option<&str>, attribute: &str) -> Result<String> {
        let hints = parse_nav_hints(attribute)?;
        Ok(self.register(id, hints))
    }

    /// Remove an entry and its subscription. Returns whether it existed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(position) = self.index.remove(id) else {
            return false;
        };
        self.elements.remove(position);
        for (_, slot) in self.index.iter_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.log(
            LogLevel::Debug,
            "element_unregistered",
            [json_kv("element", json!(id))],
        );
        true
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn set_exits(&mut self, exits: Directional<ExitRule>) {
        self.exits = exits;
    }

    pub fn exits(&self) -> &Directional<ExitRule> {
        &self.exits
    }

    /// Switch dispatch to a precompiled chase map.
    pub fn use_chase_map(&mut self, table: NeighborTable) {
        self.mode = DispatchMode::Grid(table);
    }

    /// Switch dispatch back to live geometry search.
    pub fn free_form(&mut self) {
        self.mode = DispatchMode::FreeForm;
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Seed or force focus onto an element, invoking the host primitive.
    pub fn focus_on(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.focus.focus(&id);
        self.log(
            LogLevel::Debug,
            "focus_set",
            [json_kv("element", json!(id.clone()))],
        );
        self.focused = Some(id);
    }

    /// Classify a host key event and dispatch it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> NavOutcome {
        match classify(event) {
            NavKey::Direction(direction) => {
                self.record_metric(NavMetrics::record_key_event);
                self.on_direction(direction)
            }
            NavKey::Enter => {
                self.record_metric(NavMetrics::record_key_event);
                match self.focused.clone() {
                    Some(id) => NavOutcome::Activated(id),
                    None => NavOutcome::Ignored,
                }
            }
            NavKey::None => NavOutcome::Ignored,
        }
    }

    /// Navigate from the currently focused element.
    pub fn on_direction(&mut self, direction: Direction) -> NavOutcome {
        match self.focused.clone() {
            Some(source) => self.on_direction_from(&source, direction),
            None => NavOutcome::Ignored,
        }
    }

    /// Navigate from an explicit source element.
    pub fn on_direction_from(&mut self, source: &str, direction: Direction) -> NavOutcome {
        let resolution = match &self.mode {
            DispatchMode::Grid(table) => match table.neighbor(source, direction) {
                Some(NeighborSlot::Cell(id)) => Resolution::Target(id.clone()),
                Some(NeighborSlot::External(id)) => Resolution::Exit(id.clone()),
                Some(NeighborSlot::Hold) => Resolution::Hold,
                None => Resolution::NoTarget,
            },
            DispatchMode::FreeForm => resolve(
                &self.elements,
                self.geometry.as_ref(),
                source,
                direction,
                self.config.reference_mode,
                &self.exits,
            ),
        };
        self.apply(source, direction, resolution)
    }

    /// Manual escape hatch, independent of any key event.
    pub fn exit(&mut self, direction: Direction) -> NavOutcome {
        let resolution = match self.exits.get(direction) {
            ExitRule::Target(target) => Resolution::Exit(target.clone()),
            ExitRule::Locked => Resolution::Hold,
            ExitRule::Unset => Resolution::NoTarget,
        };
        let source = self.focused.clone().unwrap_or_default();
        self.apply(&source, direction, resolution)
    }

    /// Emit a metrics snapshot through the configured logger.
    pub fn log_metrics(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let snapshot = guard.snapshot(self.started.elapsed());
                let _ = logger.log_event(snapshot.to_log_event("nav::session.metrics"));
            }
        }
    }

    fn apply(&mut self, source: &str, direction: Direction, resolution: Resolution) -> NavOutcome {
        match resolution {
            Resolution::Target(target) => {
                self.focus.focus(&target);
                self.focused = Some(target.clone());
                self.record_metric(NavMetrics::record_move);
                self.log(
                    LogLevel::Debug,
                    "focus_moved",
                    [
                        json_kv("from", json!(source)),
                        json_kv("to", json!(target.clone())),
                        json_kv("direction", json!(direction.as_str())),
                    ],
                );
                NavOutcome::Moved(target)
            }
            Resolution::Exit(target) => {
                self.focus.focus(&target);
                self.focused = Some(target.clone());
                self.record_metric(NavMetrics::record_exit);
                self.log(
                    LogLevel::Info,
                    "exit_taken",
                    [
                        json_kv("from", json!(source)),
                        json_kv("to", json!(target.clone())),
                        json_kv("direction", json!(direction.as_str())),
                    ],
                );
                NavOutcome::Exited(target)
            }
            Resolution::Hold => {
                self.record_metric(NavMetrics::record_blocked);
                self.log(
                    LogLevel::Debug,
                    "navigation_held",
                    [
                        json_kv("from", json!(source)),
                        json_kv("direction", json!(direction.as_str())),
                    ],
                );
                NavOutcome::Held
            }
            Resolution::NoTarget => {
                self.record_metric(NavMetrics::record_no_target);
                self.log(
                    LogLevel::Debug,
                    "no_target",
                    [
                        json_kv("from", json!(source)),
                        json_kv("direction", json!(direction.as_str())),
                    ],
                );
                NavOutcome::NoTarget
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, "nav::session", message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_metric(&self, record: impl Fn(&mut NavMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}
