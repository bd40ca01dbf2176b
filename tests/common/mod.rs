// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use conformance_runner::core::execution::ScriptRunner;
use conformance_runner::models::{RunOutcome, RunResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::{TempDir, tempdir};

/// Creates an empty harness root with a `test/` corpus directory.
pub fn setup_corpus() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    fs::create_dir_all(temp_dir.path().join("test")).expect("Failed to create corpus directory");
    temp_dir
}

/// Writes a script at `relative` (forward-slash path) under `root`, creating
/// parent directories as needed.
pub fn write_script(root: &Path, relative: &str, source: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create script directory");
    }
    fs::write(&path, source).expect("Failed to write script");
}

/// A `ScriptRunner` returning canned outcomes keyed by script path, and
/// recording the order scripts were run in.
#[derive(Default)]
pub struct StubRunner {
    outcomes: HashMap<String, RunOutcome>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, path: &str, result: RunResult) -> Self {
        self.outcomes
            .insert(path.to_string(), RunOutcome::Completed(result));
        self
    }

    /// Shared view of the scripts run so far, usable after the runner has
    /// been moved into a suite.
    pub fn calls(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.calls)
    }

    pub fn with_outcome(mut self, path: &str, outcome: RunOutcome) -> Self {
        self.outcomes.insert(path.to_string(), outcome);
        self
    }
}

impl ScriptRunner for StubRunner {
    async fn run(&self, script: &str) -> Result<RunOutcome> {
        self.calls.borrow_mut().push(script.to_string());
        self.outcomes
            .get(script)
            .cloned()
            .ok_or_else(|| anyhow!("no canned result for {script}"))
    }
}

/// Strips ANSI escape sequences so console output can be compared as text.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until the final byte of the CSI sequence.
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}
