use chrono::naive::NaiveDateTime;

use crate::{error::PagecountError, window::TimeWindow};

/// A remote archive file whose capture time was read from its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub timestamp: NaiveDateTime,
}

/// Parses timestamps out of file names like `pagecounts-20130412-000100.gz`.
#[derive(Clone, Debug)]
pub struct NamingTemplate(String);

impl NamingTemplate {
    pub fn new(template: &str) -> Self {
        NamingTemplate(template.into())
    }

    pub fn parse(&self, name: &str) -> Result<CandidateFile, PagecountError> {
        NaiveDateTime::parse_from_str(name, &self.0)
            .map(|timestamp| CandidateFile {
                name: name.to_owned(),
                timestamp,
            })
            .map_err(|_| PagecountError::Naming {
                name: name.to_owned(),
                template: self.0.clone(),
            })
    }
}

#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub within: Vec<CandidateFile>,
    /// Names that did not fit the template. Reported, never dropped silently.
    pub malformed: Vec<(String, PagecountError)>,
}

pub fn filter_to_window<I, S>(names: I, template: &NamingTemplate, window: &TimeWindow) -> FilterOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = FilterOutcome::default();

    for name in names {
        let name = name.as_ref();
        match template.parse(name) {
            Ok(candidate) => {
                if window.contains(candidate.timestamp) {
                    outcome.within.push(candidate);
                } else {
                    log::debug!("Outside window: {}", name);
                }
            }
            Err(err) => {
                log::error!("Unexpected file name layout: {}", err);
                outcome.malformed.push((name.to_owned(), err));
            }
        }
    }

    outcome
}
