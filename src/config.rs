use std::{fs, path::Path, time::Duration};

use chrono::naive::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PagecountError;

/// Everything the orchestrator needs to address the remote archive and decide which files to take.
///
/// Loaded from a TOML file, any missing key falls back to the value in [`ArchiveConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Root of the date partitioned directory listing. Must end with `/`.
    pub base_url: String,
    /// Earliest date the remote archive holds data for.
    pub epoch_floor: NaiveDate,
    /// Substring that identifies archive files among the other published artifacts.
    pub marker: String,
    /// chrono format string matching a full archive file name.
    pub naming_template: String,
    /// Name of the checksum manifest inside each month directory.
    pub manifest_name: String,
    /// Number of concurrent downloads within a month. 1 means sequential.
    pub download_threads: usize,
    pub request_timeout_secs: u64,
    /// Fetch files without verification when a month publishes a manifest with no entries.
    pub unverified_when_manifest_empty: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "http://dumps.wikimedia.org/other/pagecounts-raw/".to_owned(),
            epoch_floor: NaiveDate::from_ymd_opt(2007, 12, 10).unwrap_or_default(),
            marker: "pagecounts".to_owned(),
            naming_template: "pagecounts-%Y%m%d-%H%M%S.gz".to_owned(),
            manifest_name: "md5sums.txt".to_owned(),
            download_threads: 1,
            request_timeout_secs: 300,
            unverified_when_manifest_empty: false,
        }
    }
}

impl ArchiveConfig {
    pub fn load(path: &Path) -> Result<Self, PagecountError> {
        let data = fs::read_to_string(path).map_err(|err| PagecountError::io(path, err))?;
        let cfg: ArchiveConfig = toml::from_str(&data)
            .map_err(|err| PagecountError::Config(format!("{}: {}", path.display(), err)))?;
        cfg.validated()
    }

    pub fn validated(mut self) -> Result<Self, PagecountError> {
        if self.marker.is_empty() {
            return Err(PagecountError::Config("marker must not be empty".into()));
        }
        if self.naming_template.is_empty() {
            return Err(PagecountError::Config(
                "naming_template must not be empty".into(),
            ));
        }
        if self.download_threads == 0 {
            return Err(PagecountError::Config(
                "download_threads must be at least 1".into(),
            ));
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
