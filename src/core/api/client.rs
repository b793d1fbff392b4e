use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::error::{ApiError, ApiResult};
use super::models::{
    Category, CategoryId, Contestant, EligibleEvent, Event, EventId, GalleryImage, Group,
    NewContestant, NewRegistration, Poster, Registration, TeamPoints,
};
use crate::config::ApiConfig;

/// Operations the festival backend exposes to the client.
///
/// Views and the registration service only talk to this trait, so tests can
/// swap in a mock and count calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FestApi: Send + Sync {
    /// `GET groups/`
    async fn groups(&self) -> ApiResult<Vec<Group>>;

    /// `GET categories/`
    async fn categories(&self) -> ApiResult<Vec<Category>>;

    /// `GET events/` - full catalog used by the results filter.
    async fn events(&self) -> ApiResult<Vec<Event>>;

    /// `GET events-for-registration/{category}/`
    async fn eligible_events(&self, category: CategoryId) -> ApiResult<Vec<EligibleEvent>>;

    /// `POST contestants/`
    async fn create_contestant(&self, contestant: NewContestant) -> ApiResult<Contestant>;

    /// `POST registrations/`
    async fn create_registration(&self, registration: NewRegistration)
        -> ApiResult<Registration>;

    /// `GET points/`
    async fn points(&self) -> ApiResult<Vec<TeamPoints>>;

    /// `GET gallery/`
    async fn gallery(&self) -> ApiResult<Vec<GalleryImage>>;

    /// `GET generate-event-posters/{event}/`
    async fn event_posters(&self, event: EventId) -> ApiResult<Vec<Poster>>;

    /// Raw bytes of an absolute media URL (poster downloads).
    async fn download(&self, url: String) -> ApiResult<Vec<u8>>;
}

/// `FestApi` over HTTP/JSON.
pub struct HttpFestApi {
    client: Client,
    base: Url,
}

impl HttpFestApi {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base = normalize_base(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        log::info!("API client targeting {base}");
        Ok(Self { client, base })
    }

    /// Base URL every endpoint is resolved against (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        decode(ensure_success(response).await?).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        log::debug!("POST {url}");
        let response = self.client.post(url).json(body).send().await?;
        decode(ensure_success(response).await?).await
    }
}

#[async_trait]
impl FestApi for HttpFestApi {
    #[tracing::instrument(skip(self))]
    async fn groups(&self) -> ApiResult<Vec<Group>> {
        self.get_json("groups/").await
    }

    #[tracing::instrument(skip(self))]
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get_json("categories/").await
    }

    #[tracing::instrument(skip(self))]
    async fn events(&self) -> ApiResult<Vec<Event>> {
        self.get_json("events/").await
    }

    #[tracing::instrument(skip(self))]
    async fn eligible_events(&self, category: CategoryId) -> ApiResult<Vec<EligibleEvent>> {
        self.get_json(&format!("events-for-registration/{category}/"))
            .await
    }

    #[tracing::instrument(skip(self, contestant), fields(email = %contestant.email))]
    async fn create_contestant(&self, contestant: NewContestant) -> ApiResult<Contestant> {
        self.post_json("contestants/", &contestant).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_registration(
        &self,
        registration: NewRegistration,
    ) -> ApiResult<Registration> {
        self.post_json("registrations/", &registration).await
    }

    #[tracing::instrument(skip(self))]
    async fn points(&self) -> ApiResult<Vec<TeamPoints>> {
        self.get_json("points/").await
    }

    #[tracing::instrument(skip(self))]
    async fn gallery(&self) -> ApiResult<Vec<GalleryImage>> {
        self.get_json("gallery/").await
    }

    #[tracing::instrument(skip(self))]
    async fn event_posters(&self, event: EventId) -> ApiResult<Vec<Poster>> {
        self.get_json(&format!("generate-event-posters/{event}/"))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn download(&self, url: String) -> ApiResult<Vec<u8>> {
        // Poster URLs are absolute, but accept paths relative to the API too.
        let url = self.base.join(&url)?;
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Parse the configured base URL and make sure relative joins keep its path.
pub fn normalize_base(raw: &str) -> ApiResult<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Ok(Url::parse(&with_slash)?)
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::warn!("API request failed with {status}: {body}");
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
