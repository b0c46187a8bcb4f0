//! Deadline checks for long-running walks.
//!
//! The walker itself imposes no cap on chain length. Callers that want an
//! upper bound on wall-clock time wrap a walk with a `Deadline`, which is
//! polled once per step.

use std::time::{Duration, Instant};
use tracing::{error, warn};

use crate::error::{InspectError, Result};

/// Synchronous deadline check for loop iterations
#[derive(Debug)]
pub struct Deadline {
    start: Instant,
    max_duration: Duration,
    check_interval: usize,
    iteration_count: usize,
    operation_name: String,
}

impl Deadline {
    /// Create a new deadline checker
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self::from_duration(Duration::from_secs(seconds), operation)
    }

    pub fn from_duration(max_duration: Duration, operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            max_duration,
            check_interval: 1,
            iteration_count: 0,
            operation_name: operation.into(),
        }
    }

    /// Set the check interval (how often the clock is consulted)
    pub fn with_check_interval(mut self, interval: usize) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Check if the deadline has passed.
    /// Should be called once per loop iteration.
    pub fn check(&mut self) -> Result<()> {
        self.iteration_count += 1;

        if self.iteration_count.is_multiple_of(self.check_interval) {
            let elapsed = self.start.elapsed();

            if elapsed > self.max_duration {
                error!(
                    "Operation '{}' timed out after {} iterations and {:?}",
                    self.operation_name, self.iteration_count, elapsed
                );

                return Err(InspectError::Timeout {
                    budget: self.max_duration,
                });
            }

            if elapsed > self.max_duration / 2 && self.iteration_count.is_multiple_of(1000) {
                warn!(
                    "Operation '{}' still running after {} iterations ({:?})",
                    self.operation_name, self.iteration_count, elapsed
                );
            }
        }

        Ok(())
    }

    /// Get the number of iterations processed
    pub fn iterations(&self) -> usize {
        self.iteration_count
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
