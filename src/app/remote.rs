use std::time::Duration;

use crate::records::{QueryKey, Record, SearchResponse};

use super::{backend::*, errors::AppError};

pub struct AppRemote {
    remote_addr: String,
    client: reqwest::blocking::Client,
}

impl AppRemote {
    /// `timeout` of `None` lets requests wait on the backend indefinitely.
    pub fn new(addr: &str, timeout: Option<Duration>) -> anyhow::Result<AppRemote, AppError> {
        let remote_addr = addr.strip_suffix("/").unwrap_or(addr).to_string();

        // the blocking client defaults to a 30s timeout, so always set it explicitly
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(AppRemote {
            remote_addr,
            client,
        })
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        log::info!("GET {}{}", self.remote_addr, url);
        let url = format!("{}{}", self.remote_addr, url);

        self.client.get(&url)
    }

    fn post(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        log::info!("POST {}{}", self.remote_addr, url);
        let url = format!("{}{}", self.remote_addr, url);

        self.client.post(&url)
    }
}

fn parse_search_response(text: &str) -> anyhow::Result<Vec<Record>, AppError> {
    let response = serde_json::from_str::<SearchResponse>(text).map_err(|err| {
        log::error!("{err}. tried to parse: {text:?}");
        err
    })?;

    Ok(response.into_records())
}

impl SearchBackend for AppRemote {
    fn load(&self) -> anyhow::Result<(), AppError> {
        let resp = self.post("/load").send()?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            log::warn!("load failed with {status}: {body:?}");
            return Err(AppError::load_failed(body));
        }

        Ok(())
    }

    fn search(&self, key: &QueryKey) -> anyhow::Result<Vec<Record>, AppError> {
        log::debug!("search: {key}");
        let resp = self
            .get("/search")
            .query(&[("query", key.term.as_str()), ("search_type", key.mode.as_str())])
            .send()?;
        let status = resp.status();

        if !status.is_success() {
            log::warn!("search {key} failed with {status}");
            return Err(AppError::SearchFailed);
        }

        let text = resp.text()?;
        parse_search_response(&text)
    }
}
