use super::types::{check_status, FindPlaceResponse, NearbyResponse};
use super::{PageCursor, PlacePage, SearchResult};
use crate::config::SearchConfig;
use crate::model::Place;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Client for the place search web API
pub struct PlacesClient {
    http: Client,
    base_url: Url,
    api_key: String,
    page_token_delay: Duration,
}

impl PlacesClient {
    /// Creates a client for the API at `config.api_base_url`
    ///
    /// # Arguments
    ///
    /// * `config` - Search settings (base URL, timeouts, paging delay)
    /// * `api_key` - The API key sent with every request
    pub fn new(config: &SearchConfig, api_key: impl Into<String>) -> SearchResult<Self> {
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            api_key: api_key.into(),
            page_token_delay: Duration::from_millis(config.page_token_delay_ms),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> SearchResult<Url> {
        let mut url = self.base_url.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Looks up the provider id of a place by name near a coordinate
    ///
    /// # Returns
    ///
    /// * `Ok(Some(id))` - The first candidate's place id
    /// * `Ok(None)` - No candidate matched
    /// * `Err(SearchError)` - Transport failure or an API error status
    pub async fn find_place(&self, lat: f64, lng: f64, name: &str) -> SearchResult<Option<String>> {
        let bias = format!("point:{},{}", lat, lng);
        let url = self.endpoint(
            "findplacefromtext/json",
            &[
                ("input", name),
                ("inputtype", "textquery"),
                ("locationbias", &bias),
            ],
        )?;

        let response: FindPlaceResponse = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_status(&response.status, response.error_message)?;

        let id = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.place_id);
        tracing::debug!(place = name, found = id.is_some(), "Place lookup");
        Ok(id)
    }

    /// Fetches the first page of places of `place_type` around a coordinate
    pub async fn nearby(
        &self,
        lat: f64,
        lng: f64,
        radius_meters: u32,
        place_type: &str,
    ) -> SearchResult<PlacePage> {
        let location = format!("{},{}", lat, lng);
        let radius = radius_meters.to_string();
        let url = self.endpoint(
            "nearbysearch/json",
            &[
                ("location", &location),
                ("radius", &radius),
                ("type", place_type),
            ],
        )?;
        self.fetch_page(url).await
    }

    /// Fetches the page a cursor points at
    ///
    /// Waits the configured paging delay first: the API rejects tokens that
    /// are used right after being issued.
    pub async fn next_page(&self, cursor: &PageCursor) -> SearchResult<PlacePage> {
        if !self.page_token_delay.is_zero() {
            tokio::time::sleep(self.page_token_delay).await;
        }
        let url = self.endpoint("nearbysearch/json", &[("pagetoken", cursor.as_str())])?;
        self.fetch_page(url).await
    }

    async fn fetch_page(&self, url: Url) -> SearchResult<PlacePage> {
        let response: NearbyResponse = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_status(&response.status, response.error_message)?;

        let places: Vec<Place> = response
            .results
            .into_iter()
            .map(|result| Place::new(result.name, result.place_id))
            .collect();
        let cursor = PageCursor::new(response.next_page_token);

        tracing::info!(places = places.len(), more = cursor.is_some(), "Nearby page fetched");
        Ok(PlacePage { places, cursor })
    }
}
