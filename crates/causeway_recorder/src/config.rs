//! Configuration for the recorder.

/// Default name of the task used when no task has been started.
pub const DEFAULT_AMBIENT_TASK: &str = "main";

/// Default number of identity registrations between dead-entry sweeps.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// Configuration for a [`Recorder`](crate::Recorder).
#[derive(Clone, Debug)]
pub struct RecorderConfig {
    /// Name of the task that events are tagged with when the task stack is
    /// empty.
    pub ambient_task_name: String,

    /// Number of identity registrations between sweeps of entries whose
    /// object has been dropped. Zero disables automatic sweeping.
    pub sweep_threshold: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            ambient_task_name: DEFAULT_AMBIENT_TASK.to_string(),
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }
}

impl RecorderConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the ambient task name.
    #[must_use]
    pub fn with_ambient_task_name(mut self, name: impl Into<String>) -> Self {
        self.ambient_task_name = name.into();
        self
    }

    /// Builder method to set the sweep threshold.
    #[must_use]
    pub fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }
}
