use std::time::Duration;

use async_trait::async_trait;
use petdir_core::{Pet, PetFields};
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// The six operations the pet directory service offers.
#[async_trait]
pub trait PetService: Send + Sync {
    async fn list(&self, species: Option<&str>) -> Result<Vec<Pet>>;
    async fn get(&self, id: i64) -> Result<Option<Pet>>;
    async fn create(&self, fields: &PetFields) -> Result<Pet>;
    async fn update(&self, id: i64, fields: &PetFields) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn average_age(&self) -> Result<f64>;
}

#[derive(Deserialize)]
struct AverageBody {
    average: Option<f64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `PetService` over HTTP+JSON.
pub struct HttpPetService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPetService {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn pets_url(&self) -> String {
        format!("{}/pets", self.base_url)
    }

    fn pet_url(&self, id: i64) -> String {
        format!("{}/pets/{}", self.base_url, id)
    }
}

/// Turn a non-2xx response into `ClientError::Status`, keeping the server's message.
async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PetService for HttpPetService {
    async fn list(&self, species: Option<&str>) -> Result<Vec<Pet>> {
        let mut req = self.client.get(self.pets_url());
        if let Some(species) = species {
            req = req.query(&[("species", species)]);
        }
        let resp = ensure_success(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn get(&self, id: i64) -> Result<Option<Pet>> {
        let resp = self.client.get(self.pet_url(id)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = ensure_success(resp).await?;
        Ok(Some(resp.json().await?))
    }

    async fn create(&self, fields: &PetFields) -> Result<Pet> {
        let resp = self.client.post(self.pets_url()).json(fields).send().await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    async fn update(&self, id: i64, fields: &PetFields) -> Result<()> {
        let resp = self.client.put(self.pet_url(id)).json(fields).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let resp = self.client.delete(self.pet_url(id)).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn average_age(&self) -> Result<f64> {
        let url = format!("{}/stats/average-age", self.pets_url());
        let resp = ensure_success(self.client.get(url).send().await?).await?;
        let body: AverageBody = resp.json().await?;
        Ok(body.average.unwrap_or(0.0))
    }
}
