//! Application model - the complete state of the table-of-contents host
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod notebook;
pub mod toc;
pub mod widget;

pub use notebook::{Cell, CellKind, Notebook};
pub use toc::{ExtractTicket, ExtractionStats, Subscription, TocPanelState, Tracking};
pub use widget::{
    content_for_path, mime_for_path, EditorDocument, RenderedDocument, Widget, WidgetContent,
    WidgetId, MIME_LATEX, MIME_MARKDOWN, MIME_PLAIN, MIME_STEX,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::TocConfig;
use crate::error::{Result, TocError};
use crate::generators::Generator;
use crate::panel::{self, Dock};
use crate::registry::GeneratorRegistry;

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// Open widgets by id
    pub widgets: BTreeMap<WidgetId, Widget>,
    /// Widget the shell currently reports as active
    pub active_widget: Option<WidgetId>,
    /// Generators consulted for every newly active widget
    pub registry: GeneratorRegistry,
    pub toc: TocPanelState,
    /// Left-area dock; the table of contents registers itself on creation
    pub dock: Dock,
    /// Persisted panel configuration
    pub config: TocConfig,
    next_widget_id: u64,
}

impl AppModel {
    /// Create a model with the built-in generators registered
    pub fn new(config: TocConfig) -> Self {
        let registry = GeneratorRegistry::with_defaults(&config);
        Self::with_registry(config, registry)
    }

    /// Create a model around an explicit registry
    pub fn with_registry(config: TocConfig, registry: GeneratorRegistry) -> Self {
        let mut dock = Dock::default();
        dock.register_panel(panel::toc_panel());
        Self {
            widgets: BTreeMap::new(),
            active_widget: None,
            registry,
            toc: TocPanelState::new(),
            dock,
            config,
            next_widget_id: 1,
        }
    }

    /// Allocate the next widget id
    pub fn next_widget_id(&mut self) -> WidgetId {
        let id = WidgetId(self.next_widget_id);
        self.next_widget_id += 1;
        id
    }

    /// Add a widget with a freshly allocated id and return that id
    pub fn open_widget(&mut self, title: &str, content: WidgetContent) -> WidgetId {
        let id = self.next_widget_id();
        self.insert_widget(Widget::new(id, title, content));
        id
    }

    /// Add a widget that already carries its id
    pub fn insert_widget(&mut self, widget: Widget) {
        let id = widget.id;
        if id.0 >= self.next_widget_id {
            self.next_widget_id = id.0 + 1;
        }
        tracing::debug!("Opened widget {} ({})", id, widget.content.kind_name());
        self.widgets.insert(id, widget);
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(&id)
    }

    /// Whether a widget exists and has not been disposed
    pub fn is_open(&self, id: WidgetId) -> bool {
        self.widgets.get(&id).is_some_and(|w| !w.disposed)
    }

    /// The widget the panel is currently tracking
    pub fn tracked_widget(&self) -> Option<&Widget> {
        self.toc.tracked_widget().and_then(|id| self.widgets.get(&id))
    }

    /// Generator that would serve a widget if it became active
    pub fn generator_for(&self, id: WidgetId) -> Result<Arc<dyn Generator>> {
        let widget = self
            .widgets
            .get(&id)
            .filter(|w| !w.disposed)
            .ok_or(TocError::DisposedWidget(id))?;
        self.registry
            .find_generator_for_widget(widget)
            .ok_or(TocError::UnsupportedWidget(id))
    }
}
