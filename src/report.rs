use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
};

use crate::{error::PagecountError, month::MonthPartition};

/// What happened to each file of one month.
#[derive(Debug)]
pub struct MonthReport {
    pub month: MonthPartition,
    pub retrieved: Vec<PathBuf>,
    pub already_present: Vec<String>,
    pub failed: Vec<(String, PagecountError)>,
    /// In the window and missing locally, but skipped because the run was interrupted.
    pub not_attempted: Vec<String>,
    /// Set when the month's listing or manifest could not be obtained.
    pub error: Option<PagecountError>,
}

impl MonthReport {
    pub fn new(month: MonthPartition) -> Self {
        Self {
            month,
            retrieved: vec![],
            already_present: vec![],
            failed: vec![],
            not_attempted: vec![],
            error: None,
        }
    }

    pub fn unavailable(month: MonthPartition, err: PagecountError) -> Self {
        Self {
            error: Some(err),
            ..Self::new(month)
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty() && self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RetrievalReport {
    pub months: Vec<MonthReport>,
    pub interrupted: bool,
}

impl RetrievalReport {
    pub fn retrieved(&self) -> usize {
        self.months.iter().map(|m| m.retrieved.len()).sum()
    }

    pub fn already_present(&self) -> usize {
        self.months.iter().map(|m| m.already_present.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.months.iter().map(|m| m.failed.len()).sum()
    }

    pub fn not_attempted(&self) -> usize {
        self.months.iter().map(|m| m.not_attempted.len()).sum()
    }

    pub fn failed_months(&self) -> impl Iterator<Item = &MonthReport> {
        self.months.iter().filter(|m| m.error.is_some())
    }

    pub fn is_clean(&self) -> bool {
        !self.interrupted && self.months.iter().all(MonthReport::is_clean)
    }

    pub fn month(&self, month: MonthPartition) -> Option<&MonthReport> {
        self.months.iter().find(|m| m.month == month)
    }
}

impl Display for RetrievalReport {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        for m in &self.months {
            if let Some(err) = &m.error {
                writeln!(f, "{}: not processed ({})", m.month, err)?;
                continue;
            }

            writeln!(
                f,
                "{}: {} retrieved, {} already present, {} failed",
                m.month,
                m.retrieved.len(),
                m.already_present.len(),
                m.failed.len()
            )?;
            if !m.not_attempted.is_empty() {
                writeln!(f, "    {} not attempted", m.not_attempted.len())?;
            }

            for (name, err) in &m.failed {
                let kind: &'static str = err.kind().into();
                writeln!(f, "    [{}] {}: {}", kind, name, err)?;
            }
        }

        write!(
            f,
            "total: {} retrieved, {} already present, {} failed",
            self.retrieved(),
            self.already_present(),
            self.failed()
        )?;

        if self.not_attempted() > 0 {
            write!(f, ", {} not attempted", self.not_attempted())?;
        }

        if self.interrupted {
            write!(f, " (interrupted)")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_distinguishes_outcomes() {
        let mut april = MonthReport::new(MonthPartition::new(2013, 4));
        april
            .retrieved
            .push(PathBuf::from("/data/2013/04/pagecounts-20130412-000100.gz"));
        april
            .already_present
            .push("pagecounts-20130412-010000.gz".into());
        april.failed.push((
            "pagecounts-20130412-020000.gz".into(),
            PagecountError::Integrity {
                file: "pagecounts-20130412-020000.gz".into(),
                expected: "abc123".into(),
                actual: "zz999".into(),
            },
        ));
        let may = MonthReport::unavailable(
            MonthPartition::new(2013, 5),
            PagecountError::MonthUnavailable {
                month: MonthPartition::new(2013, 5),
                reason: "listing: status 404 Not Found".into(),
            },
        );

        let report = RetrievalReport {
            months: vec![april, may],
            interrupted: false,
        };

        assert_eq!(report.retrieved(), 1);
        assert_eq!(report.already_present(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_months().count(), 1);
        assert!(!report.is_clean());

        let text = report.to_string();
        assert!(text.contains("2013-04: 1 retrieved, 1 already present, 1 failed"));
        assert!(text.contains("[integrity] pagecounts-20130412-020000.gz"));
        assert!(text.contains("2013-05: not processed"));
        assert!(!text.contains("not attempted"));
    }

    #[test]
    fn summary_counts_files_skipped_by_interrupt() {
        let mut april = MonthReport::new(MonthPartition::new(2013, 4));
        april
            .retrieved
            .push(PathBuf::from("/data/2013/04/pagecounts-20130412-000100.gz"));
        april.not_attempted.push("pagecounts-20130412-010000.gz".into());
        april.not_attempted.push("pagecounts-20130412-020000.gz".into());

        let report = RetrievalReport {
            months: vec![april],
            interrupted: true,
        };

        assert_eq!(report.not_attempted(), 2);
        let text = report.to_string();
        assert!(text.contains("    2 not attempted"));
        assert!(text.ends_with("total: 1 retrieved, 0 already present, 0 failed, 2 not attempted (interrupted)"));
    }
}
