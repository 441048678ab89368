use std::collections::BTreeSet;

use scraper::{Html, Selector};

use crate::{error::PagecountError, month::MonthPartition, remote::RemoteArchive};

/// `href` values of every anchor in `page` that contain `marker`, deduplicated and sorted.
pub fn anchor_targets(page: &str, marker: &str) -> Result<BTreeSet<String>, PagecountError> {
    let selector = Selector::parse("a[href]").map_err(|err| PagecountError::Malformed {
        resource: "anchor selector",
        reason: format!("{:?}", err),
    })?;
    let doc = Html::parse_document(page);

    let targets = doc
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.contains(marker))
        .map(str::to_owned)
        .collect();

    Ok(targets)
}

/// Fetch the index page for `month` and extract the candidate archive file names.
pub fn list_candidates<RA: RemoteArchive>(
    remote: &RA,
    month: MonthPartition,
    marker: &str,
) -> Result<BTreeSet<String>, PagecountError> {
    let page = remote
        .retrieve_index_page(month)
        .map_err(|err| PagecountError::MonthUnavailable {
            month,
            reason: format!("listing: {}", err),
        })?;

    let names = anchor_targets(&page, marker).map_err(|err| PagecountError::MonthUnavailable {
        month,
        reason: format!("listing: {}", err),
    })?;

    log::debug!("Listing for {} has {} candidates", month, names.len());
    Ok(names)
}
