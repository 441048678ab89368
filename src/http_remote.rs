use reqwest::blocking::Client;

use crate::{
    config::ArchiveConfig, error::PagecountError, month::MonthPartition, remote::RemoteArchive,
};

/// A remote archive served as plain HTTP directory listings, one directory per month.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: String,
    manifest_name: String,
}

impl HttpDirectory {
    pub fn connect(config: &ArchiveConfig) -> Result<Self, PagecountError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| PagecountError::network(&config.base_url, err))?;

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        log::info!("Connected to remote archive at: {}", base_url);

        Ok(Self {
            client,
            base_url,
            manifest_name: config.manifest_name.clone(),
        })
    }

    fn month_url(&self, month: MonthPartition) -> String {
        format!("{}{}", self.base_url, month.remote_dir())
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, PagecountError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| PagecountError::network(url, err))?;

        if !response.status().is_success() {
            return Err(PagecountError::network(
                url,
                format!("status {}", response.status()),
            ));
        }

        let data = response
            .bytes()
            .map_err(|err| PagecountError::network(url, err))?;

        Ok(data.to_vec())
    }

    fn get_text(&self, url: &str) -> Result<String, PagecountError> {
        let data = self.get(url)?;
        String::from_utf8(data).map_err(|err| PagecountError::network(url, err))
    }
}

impl RemoteArchive for HttpDirectory {
    fn retrieve_index_page(&self, month: MonthPartition) -> Result<String, PagecountError> {
        self.get_text(&self.month_url(month))
    }

    fn retrieve_manifest(&self, month: MonthPartition) -> Result<String, PagecountError> {
        let url = self.month_url(month) + &self.manifest_name;
        self.get_text(&url)
    }

    fn retrieve_remote_file(
        &self,
        month: MonthPartition,
        file_name: &str,
    ) -> Result<Vec<u8>, PagecountError> {
        self.get(&self.file_url(month, file_name))
    }

    fn file_url(&self, month: MonthPartition, file_name: &str) -> String {
        self.month_url(month) + file_name
    }
}
