use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::messages::{Msg, TocMsg};
use crate::model::AppModel;
use crate::update::update;

/// Owns the model and runs side effects off the update thread
///
/// `update` only ever runs on the thread that owns the runtime. Timers and
/// extraction workers run on their own threads and report back through the
/// message channel.
pub struct Runtime {
    model: AppModel,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Spawned timers/workers that have not reported back yet
    in_flight: Arc<AtomicUsize>,
    needs_redraw: bool,
}

impl Runtime {
    pub fn new(model: AppModel) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            msg_tx,
            msg_rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            needs_redraw: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn into_model(self) -> AppModel {
        self.model
    }

    /// Sender for messages produced outside the runtime (file watcher, host)
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    /// Run one message through update and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    pub fn process_cmd(&mut self, cmd: Cmd) {
        if cmd.needs_redraw() {
            self.needs_redraw = true;
        }
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::DebouncedExtract {
                widget_id,
                revision,
                sequence,
                delay_ms,
            } => {
                self.spawn(move || {
                    if delay_ms > 0 {
                        std::thread::sleep(Duration::from_millis(delay_ms));
                    }
                    Msg::Toc(TocMsg::ExtractReady {
                        widget_id,
                        revision,
                        sequence,
                    })
                });
            }
            Cmd::RunExtraction { ticket, job } => {
                self.spawn(move || {
                    let (headings, error) = job.run();
                    Msg::Toc(TocMsg::ExtractCompleted {
                        ticket,
                        headings,
                        error,
                    })
                });
            }
        }
    }

    /// Process every queued message without blocking
    ///
    /// Returns true if any of them asked for a redraw.
    pub fn pump(&mut self) -> bool {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
        self.take_redraw()
    }

    /// Block until one message arrives (or `timeout` passes) and process it
    pub fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            // We hold a sender ourselves, so this cannot happen
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Process messages until no timer or worker is outstanding
    ///
    /// Returns false if `timeout` elapsed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            // Workers send before decrementing, so a zero count means any
            // result is already queued
            let outstanding = self.in_flight.load(Ordering::Acquire);
            match self.msg_rx.try_recv() {
                Ok(msg) => {
                    self.dispatch(msg);
                    continue;
                }
                Err(_) if outstanding == 0 => return true,
                Err(_) => {}
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!("Runtime still busy after {:?}", timeout);
                return false;
            }
            self.wait_for_message(deadline - now);
        }
    }

    /// Whether anything asked for a redraw since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Number of timers and workers still running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn spawn<F>(&self, task: F)
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        let tx = self.msg_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::AcqRel);
        std::thread::spawn(move || {
            let msg = task();
            let _ = tx.send(msg);
            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }
}
