// src/progress.rs
/// Lightweight progress reporting for a pipeline run.
/// Frontends implement this to surface status; the library never prints.
pub trait Progress {
    /// Called at the start with the number of stages.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one stage completes with the row count it produced.
    fn stage_done(&mut self, _stage: Stage, _rows: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Roster,
    Market,
    Merge,
    Export,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Roster => "roster",
            Stage::Market => "market",
            Stage::Merge => "merge",
            Stage::Export => "export",
        }
    }
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
