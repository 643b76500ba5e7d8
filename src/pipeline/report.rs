//! Build outcome of a single pipeline unit.

use std::time::{Duration, Instant};

use anyhow::Result;

/// What happened when a unit ran.
///
/// A failed unit never tears down watch mode, the report carries the
/// error to whoever is displaying status.
#[derive(Debug)]
pub enum UnitReport {
    /// Unit completed. `files` counts outputs actually written, so a copy
    /// unit that found everything fresh reports 0.
    Succeeded { files: usize, duration: Duration },
    /// Unit aborted with an error.
    Failed { error: anyhow::Error },
}

impl UnitReport {
    /// Fold a unit result and its start time into a report.
    pub fn from_result(result: Result<usize>, started: Instant) -> Self {
        match result {
            Ok(files) => Self::Succeeded {
                files,
                duration: started.elapsed(),
            },
            Err(error) => Self::Failed { error },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_from_result_success() {
        let report = UnitReport::from_result(Ok(3), Instant::now());
        match report {
            UnitReport::Succeeded { files, .. } => assert_eq!(files, 3),
            UnitReport::Failed { .. } => panic!("expected success"),
        }
        assert!(!UnitReport::from_result(Ok(0), Instant::now()).is_failed());
    }

    #[test]
    fn test_from_result_failure() {
        let report = UnitReport::from_result(Err(anyhow!("boom")), Instant::now());
        assert!(report.is_failed());
    }
}
