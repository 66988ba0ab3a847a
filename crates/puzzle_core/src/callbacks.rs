//! [`TaskCallbacks`]: advisory progress and logging hooks for a solve.

use std::fmt;

/// Strictly-advisory progress/log hooks a caller may wire up around a solve.
///
/// Neither hook is required for correctness — every phase also emits
/// ordinary [`log`] records, so a host that never constructs one of these
/// still gets visibility via whatever `log` backend it installs (e.g.
/// `env_logger` in `puzzle_cli`). The hooks exist for hosts that want finer,
/// structured control (a progress bar, a custom log sink) without pulling in
/// a logging framework.
#[derive(Default)]
pub struct TaskCallbacks<'a> {
    progress: Option<Box<dyn FnMut(f32, Option<&str>) + 'a>>,
    log: Option<Box<dyn FnMut(log::Level, &str) + 'a>>,
}

impl<'a> TaskCallbacks<'a> {
    /// Constructs callbacks with neither hook set.
    pub fn new() -> Self {
        Self { progress: None, log: None }
    }

    /// Sets the progress hook, called at coarse boundaries (after each cover
    /// solution, at the start of each phase) with a percentage in `0.0
    /// ..= 100.0` and an optional phase name.
    pub fn with_progress(mut self, f: impl FnMut(f32, Option<&str>) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Sets the log hook, called alongside every `log` record this crate
    /// emits during a solve.
    pub fn with_log(mut self, f: impl FnMut(log::Level, &str) + 'a) -> Self {
        self.log = Some(Box::new(f));
        self
    }

    /// Reports progress: emits a `trace`-level log record and, if set,
    /// calls the progress hook.
    pub fn progress(&mut self, percent: f32, phase: Option<&str>) {
        match phase {
            Some(phase) => log::trace!("progress: {percent:.1}% ({phase})"),
            None => log::trace!("progress: {percent:.1}%"),
        }
        if let Some(cb) = &mut self.progress {
            cb(percent, phase);
        }
    }

    /// Reports a log message at `level`: emits it via [`log`] and, if set,
    /// calls the log hook.
    pub fn log(&mut self, level: log::Level, message: &str) {
        log::log!(level, "{message}");
        if let Some(cb) = &mut self.log {
            cb(level, message);
        }
    }
}

impl fmt::Debug for TaskCallbacks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCallbacks")
            .field("progress", &self.progress.is_some())
            .field("log", &self.log.is_some())
            .finish()
    }
}
