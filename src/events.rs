use std::time::Duration;

use tokio::sync::mpsc;

use crate::animation::CounterSet;
use crate::config::CatalogOptions;
use crate::controller::CatalogController;
use crate::core::ResultsCounter;
use crate::document::{DocumentHost, ElementId};
use crate::export::{ExportFile, ExportFormat};
use crate::sort::SortKey;

/// A key press with its modifier state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Global keyboard actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    FocusSearch,
    ExportJson,
}

/// Map a key press to a shortcut; only Ctrl/Cmd combinations qualify
pub fn shortcut_for(press: &KeyPress, options: &CatalogOptions) -> Option<Shortcut> {
    if !press.is_command() || press.alt {
        return None;
    }

    let mut chars = press.key.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_lowercase(),
        _ => return None,
    };

    if key == options.focus_search_key.to_ascii_lowercase() {
        Some(Shortcut::FocusSearch)
    } else if key == options.export_key.to_ascii_lowercase() {
        Some(Shortcut::ExportJson)
    } else {
        None
    }
}

/// Everything the page can tell the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// Search box contents changed
    SearchInput(String),
    /// Category selector changed
    CategorySelected(String),
    /// Sort selector changed (raw selector value)
    SortSelected(String),
    /// Export button clicked
    ExportRequested(ExportFormat),
    KeyDown(KeyPress),
    /// An element scrolled into view
    ElementRevealed(ElementId),
    /// Display refresh, with the time since the previous frame
    Frame(Duration),
}

/// What handling one event did
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Filtered(ResultsCounter),
    Sorted(SortKey),
    Exported(Option<ExportFile>),
    SearchFocused(bool),
    /// Counters still animating
    Animated(usize),
    Ignored,
}

/// Binds page events to an explicitly owned controller
pub struct EventBinder<D: DocumentHost> {
    controller: CatalogController<D>,
    counters: CounterSet,
}

impl<D: DocumentHost> EventBinder<D> {
    pub fn new(controller: CatalogController<D>) -> Self {
        let counters = CounterSet::new(controller.options().counter_duration);
        Self {
            controller,
            counters,
        }
    }

    /// Handle one event to completion
    pub fn handle(&mut self, event: CatalogEvent) -> EventOutcome {
        match event {
            CatalogEvent::SearchInput(text) => {
                self.controller.set_query(&text);
                EventOutcome::Filtered(self.controller.results_counter())
            }
            CatalogEvent::CategorySelected(value) => {
                self.controller.set_category(&value);
                EventOutcome::Filtered(self.controller.results_counter())
            }
            CatalogEvent::SortSelected(value) => match value.parse::<SortKey>() {
                Ok(key) => {
                    self.controller.sort(key);
                    EventOutcome::Sorted(key)
                }
                Err(e) => {
                    tracing::warn!("⚠️ Ignoring sort selection: {}", e);
                    EventOutcome::Ignored
                }
            },
            CatalogEvent::ExportRequested(format) => EventOutcome::Exported(self.controller.export(format)),
            CatalogEvent::KeyDown(press) => match shortcut_for(&press, self.controller.options()) {
                Some(Shortcut::FocusSearch) => EventOutcome::SearchFocused(self.controller.focus_search()),
                Some(Shortcut::ExportJson) => {
                    EventOutcome::Exported(self.controller.export(ExportFormat::Json))
                }
                None => EventOutcome::Ignored,
            },
            CatalogEvent::ElementRevealed(id) => {
                self.counters.reveal(self.controller.document_mut(), id);
                EventOutcome::Animated(self.counters.active())
            }
            CatalogEvent::Frame(elapsed) => {
                EventOutcome::Animated(self.counters.tick(self.controller.document_mut(), elapsed))
            }
        }
    }

    pub fn controller(&self) -> &CatalogController<D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CatalogController<D> {
        &mut self.controller
    }

    pub fn counters(&self) -> &CounterSet {
        &self.counters
    }

    pub fn into_controller(self) -> CatalogController<D> {
        self.controller
    }
}

/// Handle events in arrival order until every sender is dropped.
///
/// `observe` sees the binder and outcome after each event.
pub async fn run_event_loop<D, F>(
    mut binder: EventBinder<D>,
    mut events: mpsc::Receiver<CatalogEvent>,
    mut observe: F,
) -> EventBinder<D>
where
    D: DocumentHost,
    F: FnMut(&EventBinder<D>, EventOutcome),
{
    while let Some(event) = events.recv().await {
        tracing::trace!("Event: {:?}", event);
        let outcome = binder.handle(event);
        observe(&binder, outcome);
    }

    tracing::debug!("Event channel closed");
    binder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts_need_modifier() {
        let options = CatalogOptions::default();
        assert_eq!(shortcut_for(&KeyPress::new("k"), &options), None);
        assert_eq!(
            shortcut_for(&KeyPress::new("k").with_ctrl(), &options),
            Some(Shortcut::FocusSearch)
        );
        assert_eq!(
            shortcut_for(&KeyPress::new("E").with_meta(), &options),
            Some(Shortcut::ExportJson)
        );
        assert_eq!(shortcut_for(&KeyPress::new("x").with_ctrl(), &options), None);
        assert_eq!(shortcut_for(&KeyPress::new("Enter").with_ctrl(), &options), None);

        let mut alt = KeyPress::new("k").with_ctrl();
        alt.alt = true;
        assert_eq!(shortcut_for(&alt, &options), None);
    }
}
