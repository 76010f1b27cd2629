//! In-memory fetcher and store for unit tests

use crate::config::{StateStore, WatchConfig};
use crate::monitor::fetcher::{Fetch, FetchError, FetchResult};
use crate::ConfigError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves fixed bodies by URL; unknown URLs fail with a 404
#[derive(Default)]
pub struct StaticFetcher {
    pages: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_page(&self, url: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub fn remove_page(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.lock().unwrap().get(url) {
            Some(body) => FetchResult::Success {
                status_code: 200,
                content_type: "text/html".to_string(),
                body: body.clone(),
                attempts: 1,
            },
            None => FetchResult::Failed {
                error: FetchError::Status(404),
                attempts: 3,
            },
        }
    }
}

/// Keeps every saved snapshot; can be told to fail on save
#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<Vec<WatchConfig>>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn snapshots(&self) -> Vec<WatchConfig> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<WatchConfig, ConfigError> {
        self.snapshots
            .lock()
            .unwrap()
            .last()
            .cloned()
            .ok_or_else(|| ConfigError::Validation("nothing saved".to_string()))
    }

    fn save(&self, config: &WatchConfig) -> Result<(), ConfigError> {
        if self.fail_saves {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        self.snapshots.lock().unwrap().push(config.clone());
        Ok(())
    }
}
