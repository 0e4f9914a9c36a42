//! Async geocoding client with rate limiting and retry.
//!
//! Wraps a Nominatim-compatible HTTP API. Public Nominatim requires a
//! descriptive User-Agent and at most one request per second; the client
//! enforces a mandatory minimum delay between consecutive requests and
//! retries transient failures with exponential backoff. Batch lookups
//! never abort on a failed input: each entry is annotated with either a
//! point or a failure marker.

use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{GeocodeError, Result};
use crate::models::{BatchGeocode, GeocodedPoint, LookupOutcome, NominatimPlace};

/// Well-known geocoding services plus custom endpoints.
#[derive(Debug, Clone)]
pub enum GeocodingService {
    /// The public OpenStreetMap Nominatim instance.
    Nominatim,
    /// Any Nominatim-compatible endpoint (provide the root URL, e.g.
    /// `"https://nominatim.example.org"`).
    Custom(String),
}

impl GeocodingService {
    /// Root URL without a trailing slash.
    fn base_url(&self) -> String {
        match self {
            Self::Nominatim => "https://nominatim.openstreetmap.org".to_string(),
            Self::Custom(base) => base.trim_end_matches('/').to_string(),
        }
    }

    /// Full `/search` URL.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url())
    }

    /// Full `/reverse` URL.
    pub fn reverse_url(&self) -> String {
        format!("{}/reverse", self.base_url())
    }
}

/// Options for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderOptions {
    /// Minimum delay between consecutive requests. The public Nominatim
    /// usage policy demands at least one second.
    pub min_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries on timeout/connect failures.
    pub max_retries: u32,
    /// User-Agent header; public Nominatim rejects anonymous clients.
    pub user_agent: String,
}

impl Default for GeocoderOptions {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            user_agent: concat!("lattica/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Async geocoding / reverse-geocoding client.
#[derive(Debug)]
pub struct GeocoderClient {
    client: Client,
    service: GeocodingService,
    options: GeocoderOptions,
    /// Completion time of the last request, for rate limiting.
    last_request: Mutex<Option<Instant>>,
}

impl GeocoderClient {
    /// Create a client for a service.
    pub fn new(service: GeocodingService, options: GeocoderOptions) -> Result<Self> {
        if options.user_agent.trim().is_empty() {
            return Err(GeocodeError::InvalidParameter {
                name: "user_agent",
                reason: "geocoding services require an identifying User-Agent".into(),
            });
        }
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            service,
            options,
            last_request: Mutex::new(None),
        })
    }

    /// Forward-geocode a free-form query.
    ///
    /// Returns `None` when the service has no match; a non-success
    /// response or transport failure is an error.
    pub async fn geocode(&self, query: &str) -> Result<Option<GeocodedPoint>> {
        let url = self.service.search_url();
        let places: Vec<NominatimPlace> = self
            .get_json(&url, &[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .await?;

        match places.into_iter().next() {
            Some(place) => Ok(Some(GeocodedPoint::try_from(place)?)),
            None => Ok(None),
        }
    }

    /// Reverse-geocode a WGS84 coordinate to the nearest address.
    pub async fn reverse(&self, lon: f64, lat: f64) -> Result<GeocodedPoint> {
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(GeocodeError::InvalidCoordinate { lon, lat });
        }

        let url = self.service.reverse_url();
        let lon_s = lon.to_string();
        let lat_s = lat.to_string();
        let place: NominatimPlace = self
            .get_json(&url, &[
                ("lon", lon_s.as_str()),
                ("lat", lat_s.as_str()),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
            ])
            .await?;

        GeocodedPoint::try_from(place)
    }

    /// Geocode a batch of independent queries.
    ///
    /// Lookups run sequentially under the rate limit. A failed lookup is
    /// recorded on its entry and the batch continues; this method itself
    /// never fails.
    pub async fn geocode_batch(&self, queries: &[String]) -> Vec<BatchGeocode> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            let outcome = match self.geocode(query).await {
                Ok(Some(point)) => LookupOutcome::Found(point),
                Ok(None) => LookupOutcome::NoMatch,
                Err(e) => LookupOutcome::Failed(e.to_string()),
            };
            results.push(BatchGeocode {
                query: query.clone(),
                outcome,
            });
        }
        results
    }

    /// GET a URL with query parameters and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let mut last_err: Option<GeocodeError> = None;
        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(250 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }
            // Retries count as requests too: every attempt waits out the
            // mandatory delay since the previous one
            self.respect_rate_limit().await;

            let send = self.client.get(url).query(params).send().await;
            *self.last_request.lock().await = Some(Instant::now());

            match send {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        return Err(GeocodeError::Status {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }
                    return resp
                        .json::<T>()
                        .await
                        .map_err(|e| GeocodeError::Malformed(e.to_string()));
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_err = Some(e.into());
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            GeocodeError::Malformed("retry loop ended without a response".into())
        }))
    }

    /// Sleep until `min_delay` has passed since the previous request.
    async fn respect_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.options.min_delay {
                tokio::time::sleep(self.options.min_delay - elapsed).await;
            }
        }
        // Hold the pessimistic timestamp in case the request errors early
        *last = Some(Instant::now());
    }
}
