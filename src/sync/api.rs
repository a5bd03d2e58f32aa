use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;

use super::error::SyncError;
use crate::core::section::Section;

/// The remote sections resource. Every mutating call answers with the
/// authoritative section as it is after the change.
#[async_trait]
pub trait SectionsApi: Send + Sync {
    /// `GET /api/sections`
    async fn list_sections(&self) -> Result<Vec<Section>, SyncError>;

    /// `POST /api/sections`
    async fn create_section(&self, title: &str) -> Result<Section, SyncError>;

    /// `POST /api/sections/{section_id}/item`
    async fn add_item(&self, section_id: &str, text: &str) -> Result<Section, SyncError>;

    /// `PUT /api/sections/{section_id}/item/{item_id}`
    async fn toggle_item(&self, section_id: &str, item_id: &str) -> Result<Section, SyncError>;

    /// `DELETE /api/sections/{section_id}/item/{item_id}`
    async fn delete_item(&self, section_id: &str, item_id: &str) -> Result<Section, SyncError>;
}

#[derive(Serialize)]
struct CreateSectionBody<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct CreateItemBody<'a> {
    text: &'a str,
}

/// HTTP client for the sections resource.
#[derive(Clone)]
pub struct RestClient {
    base_url: Url,
    http: Client,
}

impl RestClient {
    /// `base_url` is the full collection URL, e.g. `https://host/api/sections`.
    pub fn new(base_url: &str) -> Result<Self, SyncError> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|e| SyncError::Url {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::Url {
                url: trimmed.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        let http = Client::builder().build()?;
        Ok(Self { base_url, http })
    }

    /// Collection URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, SyncError> {
        log::debug!("{} {}", method, url);
        let resp = self.http.request(method, url).send().await?;
        check_status(resp).await
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Response, SyncError> {
        log::debug!("{} {}", method, url);
        let body = serde_json::to_vec(body)?;
        let resp = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        check_status(resp).await
    }
}

async fn check_status(resp: Response) -> Result<Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Status { status, body })
}

async fn read_section(resp: Response) -> Result<Section, SyncError> {
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Decode a listing body. Anything but a JSON array is rejected so the caller
/// can tell a booting backend apart from an empty collection.
pub fn parse_sections_body(text: &str) -> Result<Vec<Section>, SyncError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(SyncError::NotAnArray(preview(text)));
    }
    Ok(serde_json::from_value(value)?)
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

#[async_trait]
impl SectionsApi for RestClient {
    async fn list_sections(&self) -> Result<Vec<Section>, SyncError> {
        let resp = self.send(Method::GET, self.url(&[])).await?;
        let text = resp.text().await?;
        parse_sections_body(&text)
    }

    async fn create_section(&self, title: &str) -> Result<Section, SyncError> {
        let resp = self
            .send_json(Method::POST, self.url(&[]), &CreateSectionBody { title })
            .await?;
        read_section(resp).await
    }

    async fn add_item(&self, section_id: &str, text: &str) -> Result<Section, SyncError> {
        let resp = self
            .send_json(
                Method::POST,
                self.url(&[section_id, "item"]),
                &CreateItemBody { text },
            )
            .await?;
        read_section(resp).await
    }

    async fn toggle_item(&self, section_id: &str, item_id: &str) -> Result<Section, SyncError> {
        let resp = self
            .send(Method::PUT, self.url(&[section_id, "item", item_id]))
            .await?;
        read_section(resp).await
    }

    async fn delete_item(&self, section_id: &str, item_id: &str) -> Result<Section, SyncError> {
        let resp = self
            .send(Method::DELETE, self.url(&[section_id, "item", item_id]))
            .await?;
        read_section(resp).await
    }
}
