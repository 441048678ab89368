use std::collections::HashMap;

use crate::{error::PagecountError, month::MonthPartition, remote::RemoteArchive};

/// Expected content hash for each archive file published in one month.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    entries: HashMap<String, String>,
}

impl Manifest {
    /// Parse `<hash><whitespace><filename>` lines, keeping only those that mention `marker`.
    pub fn parse(text: &str, marker: &str) -> Result<Self, PagecountError> {
        let mut entries = HashMap::new();

        for line in text.lines().filter(|line| line.contains(marker)) {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(hash), Some(name), None) => {
                    entries.insert(name.to_owned(), hash.to_ascii_lowercase());
                }
                _ => {
                    return Err(PagecountError::Malformed {
                        resource: "manifest",
                        reason: format!("unexpected line {:?}", line),
                    })
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn expected_hash(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Fetch and parse the manifest for `month`. Any failure makes the whole month unverifiable.
pub fn load_manifest<RA: RemoteArchive>(
    remote: &RA,
    month: MonthPartition,
    marker: &str,
) -> Result<Manifest, PagecountError> {
    let text = remote
        .retrieve_manifest(month)
        .map_err(|err| PagecountError::MonthUnavailable {
            month,
            reason: format!("manifest: {}", err),
        })?;

    let manifest = Manifest::parse(&text, marker).map_err(|err| PagecountError::MonthUnavailable {
        month,
        reason: err.to_string(),
    })?;

    log::debug!("Manifest for {} lists {} files", month, manifest.len());
    Ok(manifest)
}
