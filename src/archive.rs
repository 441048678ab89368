use std::{
    fs::{create_dir_all, metadata},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use chrono::naive::NaiveDate;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use threadpool::ThreadPool;

use crate::{
    config::ArchiveConfig,
    error::PagecountError,
    fetch::{download_and_verify, Verification},
    filter::{filter_to_window, NamingTemplate},
    listing::list_candidates,
    manifest::{load_manifest, Manifest},
    month::MonthPartition,
    remote::RemoteArchive,
    report::{MonthReport, RetrievalReport},
    window::TimeWindow,
};

/// A local, month partitioned mirror of a remote archive.
pub struct Archive<RA: RemoteArchive> {
    root: PathBuf,
    remote: RA,
    config: ArchiveConfig,
    template: NamingTemplate,
    interrupt: Arc<AtomicBool>,
}

/// A file that still needs downloading, with its expected hash if the manifest had one.
type DownloadJob = (String, Option<String>);
type DownloadResult = (String, DownloadOutcome);

enum DownloadOutcome {
    Finished(Result<PathBuf, PagecountError>),
    /// The interrupt flag was set before this file was started.
    NotAttempted,
}

impl<RA: 'static> Archive<RA>
where
    RA: RemoteArchive,
{
    pub fn connect<P>(
        root_path: P,
        remote: RA,
        config: ArchiveConfig,
    ) -> Result<Self, PagecountError>
    where
        P: Into<PathBuf>,
    {
        let config = config.validated()?;
        let root = root_path.into();
        log::info!("Connected to archive at: {:?}", &root);
        let template = NamingTemplate::new(&config.naming_template);
        Ok(Self {
            root,
            remote,
            config,
            template,
            interrupt: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Share an externally owned flag; once set, no new month or file is started.
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Retrieve every archive file strictly inside `window` that is not already on disk.
    ///
    /// Only an invalid window is an error. Everything else is recorded in the report.
    pub fn retrieve_range(&self, window: TimeWindow) -> Result<RetrievalReport, PagecountError> {
        let today = chrono::Local::now().date_naive();
        self.retrieve_range_as_of(window, today)
    }

    /// Same as [`Archive::retrieve_range`] with an explicit "today" for the upper bound check.
    pub fn retrieve_range_as_of(
        &self,
        window: TimeWindow,
        today: NaiveDate,
    ) -> Result<RetrievalReport, PagecountError> {
        window.validate(self.config.epoch_floor, today)?;

        let pool = ThreadPool::with_name("Download Thread".to_owned(), self.num_downloaders());
        let mut report = RetrievalReport::default();

        for month in window.months() {
            if self.interrupted() {
                break;
            }

            log::info!("Processing month {}", month);
            let month_report = match self.process_month(&pool, month, &window) {
                Ok(month_report) => month_report,
                Err(err) => {
                    log::error!("Skipping month {}: {}", month, err);
                    MonthReport::unavailable(month, err)
                }
            };
            report.months.push(month_report);
        }

        report.interrupted = self.interrupted();
        if report.interrupted {
            log::warn!("Retrieval interrupted");
        }

        Ok(report)
    }
}

// Private methods and associated functions.

impl<RA: 'static> Archive<RA>
where
    RA: RemoteArchive,
{
    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    fn num_downloaders(&self) -> usize {
        self.config.download_threads.max(1)
    }

    fn process_month(
        &self,
        pool: &ThreadPool,
        month: MonthPartition,
        window: &TimeWindow,
    ) -> Result<MonthReport, PagecountError> {
        let marker = &self.config.marker;
        let manifest = load_manifest(&self.remote, month, marker)?;
        let names = list_candidates(&self.remote, month, marker)?;

        let dir = month.local_dir(&self.root);
        if !dir.exists() {
            create_dir_all(&dir).map_err(|err| PagecountError::io(&dir, err))?;
            log::debug!("Creating path: {:?}", dir);
        }

        if manifest.is_empty() {
            if self.config.unverified_when_manifest_empty {
                log::warn!("No hashes found for {}, proceeding without checking hashes", month);
            } else {
                log::error!("No hashes found for {}, files cannot be verified", month);
            }
        }

        let mut month_report = MonthReport::new(month);
        let outcome = filter_to_window(&names, &self.template, window);
        month_report.failed.extend(outcome.malformed);

        let mut jobs: Vec<DownloadJob> = vec![];
        for candidate in outcome.within {
            let local_path = dir.join(&candidate.name);
            if Self::already_retrieved(&local_path) {
                log::debug!("{} already exists", candidate.name);
                month_report.already_present.push(candidate.name);
                continue;
            }

            match self.expected_hash(&manifest, &candidate.name) {
                Ok(expected) => jobs.push((candidate.name, expected)),
                Err(err) => {
                    log::error!("Cannot verify {}: {}", candidate.name, err);
                    month_report.failed.push((candidate.name, err));
                }
            }
        }

        for (name, res) in self.run_downloads(pool, month, &dir, jobs) {
            match res {
                DownloadOutcome::Finished(Ok(pth)) => month_report.retrieved.push(pth),
                DownloadOutcome::Finished(Err(err)) => {
                    log::error!("Error retrieving {}: {}", name, err);
                    month_report.failed.push((name, err));
                }
                DownloadOutcome::NotAttempted => month_report.not_attempted.push(name),
            }
        }

        month_report.retrieved.sort();
        month_report.already_present.sort();
        month_report.not_attempted.sort();
        month_report.failed.sort_by(|a, b| a.0.cmp(&b.0));

        log::info!(
            "Finished {}: {} retrieved, {} already present, {} failed, {} not attempted",
            month,
            month_report.retrieved.len(),
            month_report.already_present.len(),
            month_report.failed.len(),
            month_report.not_attempted.len()
        );

        Ok(month_report)
    }

    /// Existing and non-empty counts as retrieved. Contents are not re-verified.
    fn already_retrieved(pth: &Path) -> bool {
        metadata(pth)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    fn expected_hash(
        &self,
        manifest: &Manifest,
        file_name: &str,
    ) -> Result<Option<String>, PagecountError> {
        match manifest.expected_hash(file_name) {
            Some(hash) => Ok(Some(hash.to_owned())),
            None if manifest.is_empty() && self.config.unverified_when_manifest_empty => Ok(None),
            None => Err(PagecountError::MissingChecksum(file_name.to_owned())),
        }
    }

    fn run_downloads(
        &self,
        pool: &ThreadPool,
        month: MonthPartition,
        dir: &Path,
        jobs: Vec<DownloadJob>,
    ) -> Vec<DownloadResult> {
        if jobs.is_empty() {
            return vec![];
        }

        let (to_downloader, needs_downloaded) = bounded(100);
        let (to_accumulator, results) = unbounded();

        for _ in 0..self.num_downloaders() {
            self.start_download_worker(
                pool,
                month,
                dir.to_owned(),
                needs_downloaded.clone(),
                to_accumulator.clone(),
            );
        }
        drop(needs_downloaded);
        drop(to_accumulator);

        for job in jobs {
            if to_downloader.send(job).is_err() {
                log::error!("All download workers for {} exited early", month);
                break;
            }
        }
        drop(to_downloader);

        results.iter().collect()
    }

    fn start_download_worker(
        &self,
        pool: &ThreadPool,
        month: MonthPartition,
        dir: PathBuf,
        jobs: Receiver<DownloadJob>,
        to_accumulator: Sender<DownloadResult>,
    ) {
        let remote = self.remote.clone();
        let interrupt = Arc::clone(&self.interrupt);

        pool.execute(move || {
            for (name, expected) in jobs {
                if interrupt.load(Ordering::SeqCst) {
                    log::debug!("Interrupted before {}", name);
                    if to_accumulator.send((name, DownloadOutcome::NotAttempted)).is_err() {
                        break;
                    }
                    continue;
                }

                log::info!("Retrieving {}", remote.file_url(month, &name));
                let verification = match &expected {
                    Some(hash) => Verification::Expected(hash),
                    None => Verification::Unverified,
                };
                let res = download_and_verify(&remote, month, &name, &dir, verification);

                if to_accumulator
                    .send((name, DownloadOutcome::Finished(res)))
                    .is_err()
                {
                    break;
                }
            }
        });
    }
}
