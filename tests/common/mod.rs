//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::VecDeque;

use tocpanel::commands::{Cmd, ExtractJob};
use tocpanel::config::TocConfig;
use tocpanel::messages::{Msg, TocMsg};
use tocpanel::model::{
    AppModel, Cell, EditorDocument, ExtractTicket, Notebook, RenderedDocument, WidgetContent,
    WidgetId, MIME_LATEX, MIME_MARKDOWN,
};
use tocpanel::update::update;

/// Deterministic stand-in for the threaded runtime
///
/// Timers and extraction jobs are queued instead of spawned, so tests
/// decide when debounce windows elapse and in which order jobs finish.
pub struct Driver {
    pub model: AppModel,
    pub timers: VecDeque<Msg>,
    pub jobs: VecDeque<(ExtractTicket, ExtractJob)>,
    pub redraws: usize,
}

impl Driver {
    pub fn new(config: TocConfig) -> Self {
        Self::with_model(AppModel::new(config))
    }

    pub fn with_model(model: AppModel) -> Self {
        Self {
            model,
            timers: VecDeque::new(),
            jobs: VecDeque::new(),
            redraws: 0,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.queue(cmd);
        }
    }

    /// Queue a command as the runtime would process it
    pub fn queue(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => self.redraws += 1,
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.queue(cmd);
                }
            }
            Cmd::DebouncedExtract {
                widget_id,
                revision,
                sequence,
                ..
            } => self.timers.push_back(Msg::Toc(TocMsg::ExtractReady {
                widget_id,
                revision,
                sequence,
            })),
            Cmd::RunExtraction { ticket, job } => self.jobs.push_back((ticket, job)),
        }
    }

    /// Let every pending debounce window elapse
    pub fn fire_timers(&mut self) {
        while let Some(msg) = self.timers.pop_front() {
            self.dispatch(msg);
        }
    }

    /// Finish queued jobs in start order
    pub fn run_jobs(&mut self) {
        while let Some((ticket, job)) = self.jobs.pop_front() {
            self.complete(ticket, job);
        }
    }

    /// Finish queued jobs newest first
    pub fn run_jobs_reversed(&mut self) {
        while let Some((ticket, job)) = self.jobs.pop_back() {
            self.complete(ticket, job);
        }
    }

    fn complete(&mut self, ticket: ExtractTicket, job: ExtractJob) {
        let (headings, error) = job.run();
        self.dispatch(Msg::Toc(TocMsg::ExtractCompleted {
            ticket,
            headings,
            error,
        }));
    }

    /// Fire timers and run jobs until nothing is pending
    pub fn settle(&mut self) {
        while !self.timers.is_empty() || !self.jobs.is_empty() {
            self.fire_timers();
            self.run_jobs();
        }
    }

    pub fn activate(&mut self, id: WidgetId) {
        self.dispatch(Msg::current_changed(Some(id)));
        self.settle();
    }

    /// Edit an editor widget and emit its change signal
    pub fn edit(&mut self, id: WidgetId, text: &str) {
        if let Some(widget) = self.model.widget_mut(id) {
            widget.set_text(text);
        }
        self.dispatch(Msg::content_changed(id));
    }

    /// Heading texts currently shown, in order
    pub fn texts(&self) -> Vec<String> {
        self.model.toc.headings.iter().map(|h| h.text.clone()).collect()
    }

    pub fn open_markdown(&mut self, title: &str, text: &str) -> WidgetId {
        self.model.open_widget(title, markdown_editor(text))
    }

    pub fn open_latex(&mut self, title: &str, text: &str) -> WidgetId {
        self.model.open_widget(
            title,
            WidgetContent::Editor(EditorDocument::with_text(text, MIME_LATEX)),
        )
    }
}

pub fn markdown_editor(text: &str) -> WidgetContent {
    WidgetContent::Editor(EditorDocument::with_text(text, MIME_MARKDOWN))
}

pub fn rendered_markdown(text: &str) -> WidgetContent {
    WidgetContent::Rendered(RenderedDocument::from_markdown(text))
}

pub fn notebook(cells: Vec<Cell>) -> WidgetContent {
    WidgetContent::Notebook(Notebook::new(cells))
}

/// (level, text) pairs of a heading list
pub fn outline(headings: &[tocpanel::Heading]) -> Vec<(u8, String)> {
    headings.iter().map(|h| (h.level, h.text.clone())).collect()
}
