//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::RefCell;
use std::rc::Rc;

use slint_workflow_canvas::{ConnectOutcome, DropResult, PressOutcome};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Set `RUST_LOG=slint_workflow_canvas=trace` to see gesture logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records what each simulated event did.
#[derive(Default, Clone)]
pub struct EventLog {
    pub presses: Rc<RefCell<Vec<PressOutcome>>>,
    pub releases: Rc<RefCell<Vec<ConnectOutcome>>>,
    pub drops: Rc<RefCell<Vec<DropResult>>>,
    /// Count of renderer refreshes
    pub refreshes: Rc<RefCell<usize>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.presses.borrow_mut().clear();
        self.releases.borrow_mut().clear();
        self.drops.borrow_mut().clear();
        *self.refreshes.borrow_mut() = 0;
    }

    pub fn last_press(&self) -> Option<PressOutcome> {
        self.presses.borrow().last().cloned()
    }

    pub fn last_release(&self) -> Option<ConnectOutcome> {
        self.releases.borrow().last().cloned()
    }

    pub fn last_drop(&self) -> Option<DropResult> {
        self.drops.borrow().last().cloned()
    }
}
