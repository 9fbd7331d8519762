use std::sync::Arc;
use std::time::Duration;

use crate::api_client::{ApiClient, ApiClientError};
use crate::cache::TtlCache;

const JOB_IDS_KEY: &str = "job_ids";

/// Shared application state injected into every page handler.
#[derive(Clone)]
pub struct UiState {
    pub api: ApiClient,
    job_ids: Arc<TtlCache<&'static str, Vec<String>>>,
    jd_texts: Arc<TtlCache<String, Option<String>>>,
}

impl UiState {
    pub fn new(api: ApiClient, cache_ttl: Duration) -> Self {
        Self {
            api,
            job_ids: Arc::new(TtlCache::new(cache_ttl)),
            jd_texts: Arc::new(TtlCache::new(cache_ttl)),
        }
    }

    pub async fn job_ids(&self) -> Result<Vec<String>, ApiClientError> {
        if let Some(ids) = self.job_ids.get(&JOB_IDS_KEY) {
            return Ok(ids);
        }
        let ids = self.api.list_jobs().await?;
        self.job_ids.insert(JOB_IDS_KEY, ids.clone());
        Ok(ids)
    }

    pub async fn jd_text(&self, job_id: &str) -> Result<Option<String>, ApiClientError> {
        let key = job_id.to_string();
        if let Some(text) = self.jd_texts.get(&key) {
            return Ok(text);
        }
        let text = self.api.get_job_text(job_id).await?;
        self.jd_texts.insert(key, text.clone());
        Ok(text)
    }

    pub fn invalidate(&self) {
        self.job_ids.clear();
        self.jd_texts.clear();
    }
}
