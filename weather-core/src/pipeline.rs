//! Fetch, cache and render orchestration.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    Config, Coordinate, ViewModel,
    cache::{FileStore, WeatherCache},
    provider::{FetchError, WeatherClient, client_from_config},
};

/// Returns the locale string used to pick the temperature unit.
pub type LocaleSource = Box<dyn Fn() -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Fetching,
}

#[derive(Debug, Error)]
pub enum RefreshFailure {
    #[error("no network connection")]
    NoNetwork,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl RefreshFailure {
    pub fn user_message(&self) -> String {
        match self {
            RefreshFailure::NoNetwork => "No internet connection available.".to_string(),
            RefreshFailure::Fetch(e) => e.user_message(),
        }
    }
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Succeeded(ViewModel),
    Failed(RefreshFailure),
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Succeeded(_))
    }
}

/// Owns the client and the cache for one process.
///
/// Overlapping `refresh` calls are not coordinated; callers are expected to
/// hold off a new refresh while one is outstanding.
pub struct WeatherPipeline {
    client: Box<dyn WeatherClient>,
    cache: WeatherCache,
    locale: LocaleSource,
    in_flight: AtomicUsize,
}

impl std::fmt::Debug for WeatherPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherPipeline")
            .field("client", &self.client)
            .field("cache", &self.cache)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl WeatherPipeline {
    pub fn new(client: Box<dyn WeatherClient>, cache: WeatherCache, locale: LocaleSource) -> Self {
        Self {
            client,
            cache,
            locale,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// OpenWeather client plus a file-backed cache in the configured directory.
    pub fn from_config(config: &Config, locale: LocaleSource) -> anyhow::Result<Self> {
        let client = client_from_config(config)?;
        let cache = WeatherCache::new(Box::new(FileStore::new(config.cache_dir()?)));
        Ok(Self::new(client, cache, locale))
    }

    pub fn state(&self) -> PipelineState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            PipelineState::Fetching
        } else {
            PipelineState::Idle
        }
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Fetches weather for `coord` and, on success, replaces the cached report.
    ///
    /// With `network_available == false` the client is not called. Failures
    /// never touch the cache.
    pub async fn refresh(&self, coord: Coordinate, network_available: bool) -> PipelineOutcome {
        if !network_available {
            warn!("refresh skipped: no network");
            return PipelineOutcome::Failed(RefreshFailure::NoNetwork);
        }

        let _fetching = self.begin_fetch();

        match self.client.fetch(coord).await {
            Ok(report) => {
                if let Err(e) = self.cache.store(&report) {
                    warn!(error = %format!("{e:#}"), "failed to cache weather report");
                }
                let locale = (self.locale)();
                info!(location = %report.location_name, "weather refreshed");
                PipelineOutcome::Succeeded(ViewModel::build(&report, &locale))
            }
            Err(e) => {
                match &e {
                    FetchError::NetworkFailure(cause) => {
                        warn!(error = %e, cause = ?cause, "weather refresh failed")
                    }
                    _ => warn!(error = %e, "weather refresh failed"),
                }
                PipelineOutcome::Failed(e.into())
            }
        }
    }

    /// View of the cached report, if there is one.
    pub fn render_from_cache(&self, locale: &str) -> Option<ViewModel> {
        let report = self.cache.load()?;
        debug!(location = %report.location_name, "rendering cached weather");
        Some(ViewModel::build(&report, locale))
    }

    fn begin_fetch(&self) -> FetchingGuard<'_> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            debug!("refresh started while another is outstanding");
        }
        FetchingGuard {
            in_flight: &self.in_flight,
        }
    }
}

/// Drops the pipeline back to idle, including when a refresh future is cancelled.
struct FetchingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
