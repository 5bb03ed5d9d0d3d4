//! Score reporting collaborator.
//!
//! Gameplay never depends on the reporter: calls are fire-and-forget and
//! failures are only logged. With no reporter installed the game runs offline.

use std::fmt;

/// End-of-level summary handed to [`ScoreReporter::save_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: u32,
    pub score: u32,
    pub total_score: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    Unavailable,
    Rejected(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Unavailable => write!(f, "score service unavailable"),
            ReportError::Rejected(msg) => write!(f, "score service rejected the call: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {}

pub trait ScoreReporter {
    fn add_points(&mut self, points: u32) -> Result<(), ReportError>;
    fn save_level(&mut self, summary: &LevelSummary) -> Result<(), ReportError>;
}

/// Optional reporter slot. Swallows and logs every failure.
#[derive(Default)]
pub struct Telemetry {
    reporter: Option<Box<dyn ScoreReporter>>,
}

impl Telemetry {
    pub fn offline() -> Self {
        Self { reporter: None }
    }

    pub fn set_reporter(&mut self, reporter: Option<Box<dyn ScoreReporter>>) {
        self.reporter = reporter;
    }

    pub fn is_online(&self) -> bool {
        self.reporter.is_some()
    }

    pub fn add_points(&mut self, points: u32) {
        if let Some(reporter) = self.reporter.as_mut() {
            if let Err(err) = reporter.add_points(points) {
                log::warn!("telemetry add_points({points}) failed: {err}");
            }
        }
    }

    pub fn save_level(&mut self, summary: LevelSummary) {
        if let Some(reporter) = self.reporter.as_mut() {
            if let Err(err) = reporter.save_level(&summary) {
                log::warn!("telemetry save for level {} failed: {err}", summary.level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    impl ScoreReporter for AlwaysFails {
        fn add_points(&mut self, _points: u32) -> Result<(), ReportError> {
            Err(ReportError::Unavailable)
        }
        fn save_level(&mut self, _summary: &LevelSummary) -> Result<(), ReportError> {
            Err(ReportError::Rejected("quota".into()))
        }
    }

    #[test]
    fn failures_are_swallowed() {
        let mut telemetry = Telemetry::offline();
        telemetry.set_reporter(Some(Box::new(AlwaysFails)));
        assert!(telemetry.is_online());
        telemetry.add_points(100);
        telemetry.save_level(LevelSummary {
            level: 1,
            score: 100,
            total_score: 100,
            completed: true,
        });
    }

    #[test]
    fn offline_is_a_no_op() {
        let mut telemetry = Telemetry::offline();
        assert!(!telemetry.is_online());
        telemetry.add_points(5);
    }
}
