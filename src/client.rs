//! Typed client for the blog API.

use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::models::{BlogPage, NewPost, Post, PostUpdate};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct BlogClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for BlogClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BlogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn blogs_url(&self) -> String {
        format!("{}/blogs", self.base_url)
    }

    fn blog_url(&self, id: &str) -> String {
        format!("{}/blogs/{}", self.base_url, id)
    }

    pub async fn list(&self, page: usize, limit: usize) -> ClientResult<BlogPage> {
        let response = self
            .http
            .get(self.blogs_url())
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;

        decode(response).await
    }

    pub async fn create(&self, new_post: &NewPost) -> ClientResult<Post> {
        let response = self.http.post(self.blogs_url()).json(new_post).send().await?;

        decode(response).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Post> {
        let response = self.http.get(self.blog_url(id)).send().await?;

        decode(response).await
    }

    pub async fn update(&self, id: &str, update: &PostUpdate) -> ClientResult<Post> {
        let response = self.http.put(self.blog_url(id)).json(update).send().await?;

        decode(response).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let response = self.http.delete(self.blog_url(id)).send().await?;

        check(response).await.map(|_| ())
    }
}

async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    Err(ClientError::Api { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    Ok(check(response).await?.json().await?)
}
