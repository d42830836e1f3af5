//! Build observer protocol.
//!
//! Observers receive lifecycle notifications from the builder and the
//! backend: phase transitions, per-step output, and the final result. The
//! guaranteed call order is prepare, then build, then done; `done` always
//! receives the final [`BuildResult`].

use parking_lot::Mutex;
use std::io::Write;

use crate::result::BuildResult;
use crate::step::BuildStep;

/// Listener for build lifecycle notifications.
pub trait BuildObserver: Send + Sync {
    /// The build entered the prepare phase.
    fn enter_prepare(&self) {}

    /// The build entered the execution phase.
    fn enter_build(&self) {}

    /// A step is about to run.
    fn enter_step(&self, _step: &BuildStep) {}

    /// One line of output from a running step.
    fn step_output(&self, _step: &BuildStep, _line: &str) {}

    /// The build finished with the given result.
    fn done(&self, _result: &BuildResult) {}
}

/// Line-oriented observer writing progress to an output stream.
pub struct StreamObserver {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl StreamObserver {
    /// Create an observer writing to the given sink.
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Create an observer writing to standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn write_line(&self, line: &str) {
        let mut sink = self.sink.lock();
        let _ = writeln!(sink, "{}", line);
        let _ = sink.flush();
    }
}

impl Default for StreamObserver {
    fn default() -> Self {
        Self::stdout()
    }
}

impl BuildObserver for StreamObserver {
    fn enter_prepare(&self) {
        self.write_line("Preparing build...");
    }

    fn enter_build(&self) {
        self.write_line("Executing build...");
    }

    fn enter_step(&self, step: &BuildStep) {
        self.write_line(&format!("Step {} ({}):", step, step.img));
    }

    fn step_output(&self, _step: &BuildStep, line: &str) {
        self.write_line(line);
    }

    fn done(&self, result: &BuildResult) {
        self.write_line(&result.to_string());
    }
}

/// Observer that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BuildObserver for NullObserver {}
