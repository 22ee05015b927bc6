//! Best-effort location for alert messages.
//!
//! [`LocationProvider`] is what dispatch consumes: it answers with a fix or
//! with nothing, never with an error. [`GeoLocator`] is the stock provider;
//! it layers the permission gate, the read timeout and the short-lived cache
//! on top of a platform [`PositionSource`].

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

/// Upper bound for a single position read.
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Oldest cached fix that may stand in for a fresh read.
pub const LOCATION_MAX_AGE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Map link handed to recipients.
    pub fn maps_url(&self) -> String {
        format!(
            "https://maps.google.com/?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Options forwarded to the platform position API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_age: Duration,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: LOCATION_TIMEOUT,
            max_age: LOCATION_MAX_AGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Why a position read produced nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("position read timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of current coordinates, queried once per dispatch.
pub trait LocationProvider: Send + Sync {
    /// Current fix, or `None` when it cannot be had.
    fn current_location(&self) -> impl Future<Output = Option<Coordinates>> + Send;
}

/// Raw platform position API.
pub trait PositionSource: Send + Sync {
    fn permission(&self) -> PermissionStatus;

    fn current_position(
        &self,
        request: &PositionRequest,
    ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Permission-gated, time-bounded, caching [`LocationProvider`].
pub struct GeoLocator<S> {
    source: S,
    request: PositionRequest,
    cache: Mutex<Option<(Coordinates, Instant)>>,
}

impl<S: PositionSource> GeoLocator<S> {
    pub fn new(source: S) -> Self {
        Self::with_request(source, PositionRequest::default())
    }

    pub fn with_request(source: S, request: PositionRequest) -> Self {
        Self {
            source,
            request,
            cache: Mutex::new(None),
        }
    }

    fn cached(&self) -> Option<Coordinates> {
        let cache = self.cache.lock().ok()?;
        let (coords, at) = (*cache)?;
        (at.elapsed() <= self.request.max_age).then_some(coords)
    }

    fn remember(&self, coords: Coordinates) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some((coords, Instant::now()));
        }
    }

    async fn read(&self) -> Result<Coordinates, LocationError> {
        if self.source.permission() != PermissionStatus::Granted {
            return Err(LocationError::PermissionDenied);
        }
        if let Some(coords) = self.cached() {
            return Ok(coords);
        }
        let coords = tokio::time::timeout(
            self.request.timeout,
            self.source.current_position(&self.request),
        )
        .await
        .map_err(|_| LocationError::Timeout(self.request.timeout))??;
        self.remember(coords);
        Ok(coords)
    }
}

impl<S: PositionSource> LocationProvider for GeoLocator<S> {
    async fn current_location(&self) -> Option<Coordinates> {
        match self.read().await {
            Ok(coords) => Some(coords),
            Err(error) => {
                tracing::warn!(%error, "Sending alert without location data");
                None
            }
        }
    }
}

/// Position source with a fixed answer, for hosts without a GPS (the CLI)
/// and for tests.
#[derive(Debug, Clone)]
pub struct StaticPosition {
    permission: PermissionStatus,
    fix: Option<Coordinates>,
}

impl StaticPosition {
    pub fn new(permission: PermissionStatus, fix: Option<Coordinates>) -> Self {
        Self { permission, fix }
    }
}

impl PositionSource for StaticPosition {
    fn permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(
        &self,
        _request: &PositionRequest,
    ) -> Result<Coordinates, LocationError> {
        self.fix
            .ok_or_else(|| LocationError::Unavailable("no fixed position configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        reads: AtomicUsize,
        delay: Duration,
        fix: Coordinates,
    }

    impl CountingSource {
        fn new(delay: Duration) -> Self {
            Self {
                reads: AtomicUsize::new(0),
                delay,
                fix: Coordinates::new(51.5, -0.12),
            }
        }
    }

    impl PositionSource for CountingSource {
        fn permission(&self) -> PermissionStatus {
            PermissionStatus::Granted
        }

        async fn current_position(
            &self,
            _request: &PositionRequest,
        ) -> Result<Coordinates, LocationError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(self.fix)
        }
    }

    #[test]
    fn maps_url_uses_both_coordinates() {
        let url = Coordinates::new(40.7128, -74.006).maps_url();
        assert_eq!(url, "https://maps.google.com/?q=40.7128,-74.006");
    }

    #[test]
    fn default_request_matches_platform_options() {
        let req = PositionRequest::default();
        assert!(req.high_accuracy);
        assert_eq!(req.timeout, Duration::from_millis(15_000));
        assert_eq!(req.max_age, Duration::from_millis(10_000));
    }

    #[tokio::test]
    async fn denied_permission_yields_none() {
        let fix = Some(Coordinates::new(1.0, 2.0));
        let locator = GeoLocator::new(StaticPosition::new(PermissionStatus::Denied, fix));
        assert_eq!(locator.current_location().await, None);
    }

    #[tokio::test]
    async fn source_error_yields_none() {
        let locator = GeoLocator::new(StaticPosition::new(PermissionStatus::Granted, None));
        assert_eq!(locator.current_location().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out_to_none() {
        let locator = GeoLocator::new(CountingSource::new(Duration::from_secs(20)));
        assert_eq!(locator.current_location().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn recent_fix_is_reused_then_refreshed() {
        let locator = GeoLocator::new(CountingSource::new(Duration::from_millis(50)));

        assert!(locator.current_location().await.is_some());
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(locator.current_location().await.is_some());
        assert_eq!(locator.source.reads.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(locator.current_location().await.is_some());
        assert_eq!(locator.source.reads.load(Ordering::SeqCst), 2);
    }
}
