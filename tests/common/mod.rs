#![allow(dead_code)]

pub mod http_server;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use pagecount_arch::{md5_hex, MonthPartition, PagecountError, RemoteArchive};

/// In-memory remote archive that counts every request it serves.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    pages: HashMap<MonthPartition, String>,
    manifests: HashMap<MonthPartition, String>,
    files: HashMap<String, Vec<u8>>,
    pub requests: Arc<AtomicUsize>,
    pub file_requests: Arc<AtomicUsize>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a month whose manifest lists the correct hash for every file.
    pub fn with_month(mut self, month: MonthPartition, files: &[(&str, &[u8])]) -> Self {
        let names: Vec<&str> = files.iter().map(|(name, _)| *name).collect();
        let manifest: String = files
            .iter()
            .map(|(name, data)| format!("{}  {}\n", md5_hex(data), name))
            .collect();

        self.pages.insert(month, index_page(&names));
        self.manifests.insert(month, manifest);
        for (name, data) in files {
            self.files.insert(name.to_string(), data.to_vec());
        }
        self
    }

    pub fn with_index_page(mut self, month: MonthPartition, page: &str) -> Self {
        self.pages.insert(month, page.to_owned());
        self
    }

    pub fn with_manifest(mut self, month: MonthPartition, text: &str) -> Self {
        self.manifests.insert(month, text.to_owned());
        self
    }

    pub fn without_manifest(mut self, month: MonthPartition) -> Self {
        self.manifests.remove(&month);
        self
    }

    pub fn with_file(mut self, name: &str, data: &[u8]) -> Self {
        self.files.insert(name.to_owned(), data.to_vec());
        self
    }

    pub fn without_file(mut self, name: &str) -> Self {
        self.files.remove(name);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn file_requests(&self) -> usize {
        self.file_requests.load(Ordering::SeqCst)
    }
}

impl RemoteArchive for MemoryRemote {
    fn retrieve_index_page(&self, month: MonthPartition) -> Result<String, PagecountError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(&month)
            .cloned()
            .ok_or_else(|| not_found(&format!("memory://{}", month.remote_dir())))
    }

    fn retrieve_manifest(&self, month: MonthPartition) -> Result<String, PagecountError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .get(&month)
            .cloned()
            .ok_or_else(|| not_found(&format!("memory://{}md5sums.txt", month.remote_dir())))
    }

    fn retrieve_remote_file(
        &self,
        month: MonthPartition,
        file_name: &str,
    ) -> Result<Vec<u8>, PagecountError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.file_requests.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| not_found(&self.file_url(month, file_name)))
    }

    fn file_url(&self, month: MonthPartition, file_name: &str) -> String {
        format!("memory://{}{}", month.remote_dir(), file_name)
    }
}

fn not_found(url: &str) -> PagecountError {
    PagecountError::Network {
        url: url.to_owned(),
        reason: "status 404 Not Found".to_owned(),
    }
}

/// An index page in the style of a plain web server directory listing.
pub fn index_page(names: &[&str]) -> String {
    let mut page = String::from("<html><body><pre><a href=\"../\">../</a>\n");
    page.push_str("<a href=\"md5sums.txt\">md5sums.txt</a>\n");
    for name in names {
        page.push_str(&format!("<a href=\"{0}\">{0}</a>\n", name));
    }
    page.push_str("</pre></body></html>\n");
    page
}
