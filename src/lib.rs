/**************************************************************************************************
 *                                           Public API
 *************************************************************************************************/
pub use crate::{
    archive::Archive,
    config::ArchiveConfig,
    error::{FailureKind, PagecountError},
    fetch::{download_and_verify, md5_hex, write_atomically, Verification},
    filter::{filter_to_window, CandidateFile, FilterOutcome, NamingTemplate},
    http_remote::HttpDirectory,
    listing::{anchor_targets, list_candidates},
    manifest::{load_manifest, Manifest},
    month::MonthPartition,
    remote::RemoteArchive,
    report::{MonthReport, RetrievalReport},
    window::TimeWindow,
};
/**************************************************************************************************
 *                                      Private Implementation
 *************************************************************************************************/
mod archive;
mod config;
mod error;
mod fetch;
mod filter;
mod http_remote;
mod listing;
mod manifest;
mod month;
mod remote;
mod report;
mod window;
