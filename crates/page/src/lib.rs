//! # Page Crate
//!
//! Hosts user scripts against a live [`Dom`]: decides which scripts apply to
//! the page URL, runs them once the document is idle, and delivers mutation
//! batches to them from a micro-task, the way a browser's change detection
//! does.

#![forbid(unsafe_code)]

pub mod matching;

use dom::{Dom, MutationRecord, ObserverId};
use log::{debug, info, warn};
use scheduler::EventLoop;

pub use matching::{MatchPattern, MatchPatternError};

/// Upper bound on tasks run by one [`Page::run_until_idle`] call. Hitting it
/// means some script keeps feeding its own observer.
pub const MAX_TASKS_PER_RUN: usize = 10_000;

// ─────────────────────────────────────────────────────────────────────────────
// ScriptMetadata / UserScript
// ─────────────────────────────────────────────────────────────────────────────

/// The `==UserScript==` header of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub matches: Vec<MatchPattern>,
}

impl ScriptMetadata {
    /// `true` if any `@match` pattern covers `url`.
    pub fn applies_to(&self, url: &str) -> bool {
        self.matches.iter().any(|p| p.matches(url))
    }
}

/// A script running inside a page.
pub trait UserScript {
    fn metadata(&self) -> &ScriptMetadata;

    /// Runs once, at document-idle.
    fn on_load(&mut self, dom: &mut Dom);

    /// One delivered batch for one of the script's registrations. Batches
    /// for registrations the script does not own are delivered too and must
    /// be ignored.
    fn on_mutations(&mut self, dom: &mut Dom, observer: ObserverId, records: Vec<MutationRecord>);

    /// Runs after every notify pass, once all batches of the pass have been
    /// delivered.
    fn after_notify(&mut self, _dom: &mut Dom) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of work on the page event loop.
pub enum PageTask {
    /// Host-side change, e.g. the application re-rendering a section.
    Host(Box<dyn FnOnce(&mut Dom)>),
    /// Deliver all pending mutation records.
    NotifyObservers,
}

/// Result of draining the event loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub tasks_run: usize,
    /// `false` when [`MAX_TASKS_PER_RUN`] was hit with work still pending.
    pub settled: bool,
}

pub struct Page<S: UserScript> {
    pub url: String,
    dom: Dom,
    event_loop: EventLoop<PageTask>,
    scripts: Vec<S>,
}

impl<S: UserScript> Page<S> {
    pub fn new(url: &str, dom: Dom) -> Self {
        Self {
            url: url.to_string(),
            dom,
            event_loop: EventLoop::new(),
            scripts: Vec::new(),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Direct host access. Changes made here are delivered on the next
    /// [`run_until_idle`](Self::run_until_idle).
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn scripts(&self) -> &[S] {
        &self.scripts
    }

    /// Run `script` if its `@match` patterns cover the page URL. Returns
    /// whether it was installed.
    pub fn install(&mut self, mut script: S) -> bool {
        let meta = script.metadata();
        if !meta.applies_to(&self.url) {
            debug!("script `{}` does not match {}", meta.name, self.url);
            return false;
        }
        info!("installing `{}` v{} on {}", meta.name, meta.version, self.url);
        script.on_load(&mut self.dom);
        self.scripts.push(script);
        self.pump();
        true
    }

    /// Queue a host-side change as a macro-task.
    pub fn post_host_task<F>(&mut self, task: F)
    where
        F: FnOnce(&mut Dom) + 'static,
    {
        self.event_loop.post_task(PageTask::Host(Box::new(task)));
    }

    /// Run tasks until nothing is pending or [`MAX_TASKS_PER_RUN`] is hit.
    /// Micro-tasks always run before the next macro-task.
    pub fn run_until_idle(&mut self) -> RunOutcome {
        let mut tasks_run = 0;
        loop {
            self.pump();
            if tasks_run >= MAX_TASKS_PER_RUN {
                let settled = !self.event_loop.has_pending_work();
                if !settled {
                    warn!("page {} did not settle after {tasks_run} tasks", self.url);
                }
                return RunOutcome { tasks_run, settled };
            }
            let task = match self.event_loop.next_microtask() {
                Some(task) => task,
                None => match self.event_loop.next_task() {
                    Some(task) => task,
                    None => return RunOutcome { tasks_run, settled: true },
                },
            };
            self.run_task(task);
            tasks_run += 1;
        }
    }

    fn run_task(&mut self, task: PageTask) {
        match task {
            PageTask::Host(f) => f(&mut self.dom),
            PageTask::NotifyObservers => {
                for (observer, records) in self.dom.take_batches() {
                    // A script may disconnect a later registration while
                    // handling an earlier batch.
                    if !self.dom.is_observing(observer) {
                        continue;
                    }
                    for script in &mut self.scripts {
                        script.on_mutations(&mut self.dom, observer, records.clone());
                    }
                }
                for script in &mut self.scripts {
                    script.after_notify(&mut self.dom);
                }
            }
        }
    }

    /// Turn a raised notify flag into one pending micro-task.
    fn pump(&mut self) {
        if self.dom.take_notify_request() {
            self.event_loop.post_microtask(PageTask::NotifyObservers);
        }
    }
}
