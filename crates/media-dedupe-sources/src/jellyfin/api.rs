use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::jellyfin::auth::{AuthSession, ClientIdentity};
use crate::SourceError;

/// Items requested per page when listing a library
const PAGE_SIZE: u32 = 500;

/// Fields the server omits from item listings unless asked for
const ITEM_FIELDS: &str = "ProviderIds,MediaSources,DateCreated,Path,ProductionYear";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<BaseItemDto>,
    #[serde(default)]
    pub total_record_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseItemDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub production_year: Option<i64>,
    #[serde(default)]
    pub provider_ids: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    pub media_sources: Option<Vec<MediaSourceDto>>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub image_tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub collection_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaSourceDto {
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub bitrate: Option<i64>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub media_streams: Option<Vec<MediaStreamDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaStreamDto {
    #[serde(rename = "Type", default)]
    pub stream_type: Option<String>,
    #[serde(default)]
    pub bit_rate: Option<i64>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub codec: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    user: UserDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Thin HTTP layer over the Jellyfin REST API
pub struct JellyfinHttpClient {
    client: Client,
    base_url: String,
}

impl JellyfinHttpClient {
    pub fn new(
        base_url: &str,
        identity: &ClientIdentity,
        token: Option<&str>,
    ) -> Result<Self, SourceError> {
        let authorization = identity.authorization_header(token);
        let client = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&authorization).map_err(|e| {
                        SourceError::InvalidConfig(format!("invalid authorization header: {}", e))
                    })?,
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn authenticate_by_name(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, SourceError> {
        let url = format!("{}/Users/AuthenticateByName", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "Username": username, "Pw": password }))
            .send()
            .await?;

        let result: AuthenticationResult =
            parse_json(check_status(response, "Authenticate").await?).await?;
        debug!("Jellyfin authentication successful for user id {}", result.user.id);

        Ok(AuthSession {
            access_token: result.access_token,
            user_id: result.user.id,
        })
    }

    pub async fn current_user(&self) -> Result<UserDto, SourceError> {
        let url = format!("{}/Users/Me", self.base_url);
        let response = self.client.get(&url).send().await?;
        parse_json(check_status(response, "Get current user").await?).await
    }

    pub async fn get_views(&self, user_id: &str) -> Result<Vec<BaseItemDto>, SourceError> {
        let url = format!("{}/Users/{}/Views", self.base_url, user_id);
        let response = self.client.get(&url).send().await?;
        let views: ItemsResponse = parse_json(check_status(response, "Get libraries").await?).await?;
        Ok(views.items)
    }

    /// All movies below `parent_id`, fetched page by page
    pub async fn get_movies(
        &self,
        user_id: &str,
        parent_id: &str,
    ) -> Result<Vec<BaseItemDto>, SourceError> {
        let url = format!("{}/Users/{}/Items", self.base_url, user_id);
        let mut items: Vec<BaseItemDto> = Vec::new();

        loop {
            let start_index = items.len().to_string();
            let limit = PAGE_SIZE.to_string();
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("ParentId", parent_id),
                    ("IncludeItemTypes", "Movie"),
                    ("Recursive", "true"),
                    ("SortBy", "SortName"),
                    ("SortOrder", "Ascending"),
                    ("Fields", ITEM_FIELDS),
                    ("StartIndex", start_index.as_str()),
                    ("Limit", limit.as_str()),
                ])
                .send()
                .await?;

            let page: ItemsResponse = parse_json(check_status(response, "Get movies").await?).await?;
            let page_len = page.items.len();
            items.extend(page.items);

            trace!(
                "Jellyfin: fetched page of {} items ({} so far, total {:?})",
                page_len,
                items.len(),
                page.total_record_count
            );

            if page_done(page_len, items.len(), page.total_record_count) {
                break;
            }
        }

        Ok(items)
    }

    pub async fn delete_item(&self, item_id: &str) -> Result<(), SourceError> {
        let url = format!("{}/Items/{}", self.base_url, item_id);
        let response = self.client.delete(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(item_id.to_string()));
        }
        check_status(response, "Delete item").await?;
        Ok(())
    }

    /// Primary image URL; no request is made
    pub fn primary_image_url(&self, item_id: &str, tag: &str) -> String {
        format!(
            "{}/Items/{}/Images/Primary?tag={}&maxHeight=300",
            self.base_url,
            item_id,
            urlencoding::encode(tag)
        )
    }
}

/// Whether paging stops after a page of `page_len` items, with `fetched`
/// items collected so far
///
/// An empty page always ends the listing. Without `TotalRecordCount` a short
/// page is the last one.
fn page_done(page_len: usize, fetched: usize, total: Option<u64>) -> bool {
    if page_len == 0 {
        return true;
    }
    match total {
        Some(total) => fetched as u64 >= total,
        None => page_len < PAGE_SIZE as usize,
    }
}

async fn check_status(response: Response, context: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(SourceError::Unauthorized),
        StatusCode::FORBIDDEN => Err(SourceError::Forbidden(context.to_string())),
        _ => {
            let body = response.text().await.unwrap_or_default();
            debug!("Jellyfin: {} failed with {}: {}", context, status, body);
            Err(SourceError::Status {
                status: status.as_u16(),
                context: context.to_string(),
            })
        }
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Malformed(e.to_string()))
}
