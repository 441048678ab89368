use crate::{error::PagecountError, month::MonthPartition};

/// Raw access to the month partitioned remote archive.
///
/// Implementations report transport failures and non-success responses as
/// [`PagecountError::Network`]; interpreting the content is left to the caller.
pub trait RemoteArchive: Clone + Send + Sync {
    /// The HTML index page of the month's directory.
    fn retrieve_index_page(&self, month: MonthPartition) -> Result<String, PagecountError>;

    /// The plain text checksum manifest for the month.
    fn retrieve_manifest(&self, month: MonthPartition) -> Result<String, PagecountError>;

    fn retrieve_remote_file(
        &self,
        month: MonthPartition,
        file_name: &str,
    ) -> Result<Vec<u8>, PagecountError>;

    /// Location of `file_name`, used when reporting.
    fn file_url(&self, month: MonthPartition, file_name: &str) -> String;
}
