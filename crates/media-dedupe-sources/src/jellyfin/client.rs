use async_trait::async_trait;
use chrono::{DateTime, Utc};
use media_dedupe_models::{CatalogEntry, ExternalIds, Library, MediaSource, VideoStream};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::jellyfin::api::{BaseItemDto, JellyfinHttpClient, MediaSourceDto, MediaStreamDto};
use crate::jellyfin::auth::{AuthSession, ClientIdentity};
use crate::{CatalogSource, SourceError};

pub struct JellyfinClient {
    server_url: String,
    identity: ClientIdentity,
    session: Option<AuthSession>,
    http: JellyfinHttpClient,
    authenticated: bool,
}

impl JellyfinClient {
    /// Client without a session; call [`JellyfinClient::login`] before anything else
    pub fn new(server_url: &str, identity: ClientIdentity) -> Result<Self, SourceError> {
        let http = JellyfinHttpClient::new(server_url, &identity, None)?;
        Ok(Self {
            server_url: http.base_url().to_string(),
            identity,
            session: None,
            http,
            authenticated: false,
        })
    }

    /// Client reusing a stored session; [`CatalogSource::authenticate`] verifies it
    pub fn with_session(
        server_url: &str,
        identity: ClientIdentity,
        session: AuthSession,
    ) -> Result<Self, SourceError> {
        let http = JellyfinHttpClient::new(server_url, &identity, Some(&session.access_token))?;
        Ok(Self {
            server_url: http.base_url().to_string(),
            identity,
            session: Some(session),
            http,
            authenticated: false,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Exchange username and password for a session token
    pub async fn login(&mut self, username: &str, password: &str) -> Result<AuthSession, SourceError> {
        let session = self.http.authenticate_by_name(username, password).await?;
        self.http = JellyfinHttpClient::new(
            &self.server_url,
            &self.identity,
            Some(&session.access_token),
        )?;
        self.session = Some(session.clone());
        self.authenticated = true;

        info!("Logged in to Jellyfin at {}", self.server_url);
        Ok(session)
    }

    fn user_id(&self) -> Result<&str, SourceError> {
        if !self.authenticated {
            return Err(SourceError::NotAuthenticated);
        }
        self.session
            .as_ref()
            .map(|s| s.user_id.as_str())
            .ok_or(SourceError::NotAuthenticated)
    }
}

/// Look up a provider id by key, ignoring case ("Tmdb", "tmdb", "TMDB")
fn provider_id(provider_ids: &HashMap<String, Option<String>>, key: &str) -> Option<String> {
    provider_ids
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
}

fn non_negative(value: Option<i64>) -> Option<u64> {
    value.and_then(|v| u64::try_from(v).ok())
}

fn dimension(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn stream_to_video(stream: &MediaStreamDto) -> VideoStream {
    VideoStream {
        bitrate_bps: non_negative(stream.bit_rate),
        width: dimension(stream.width),
        height: dimension(stream.height),
        codec: stream.codec.clone(),
    }
}

fn source_dto_to_media_source(dto: &MediaSourceDto) -> MediaSource {
    let video = dto.media_streams.as_ref().and_then(|streams| {
        streams
            .iter()
            .find(|s| {
                s.stream_type
                    .as_deref()
                    .map(|t| t.eq_ignore_ascii_case("video"))
                    .unwrap_or(false)
            })
            .map(stream_to_video)
    });

    MediaSource {
        size_bytes: non_negative(dto.size),
        bitrate_bps: non_negative(dto.bitrate),
        container: dto.container.clone(),
        video,
    }
}

/// Map a server item into the engine's catalog shape
pub fn item_to_entry(item: &BaseItemDto) -> CatalogEntry {
    let external_ids = item
        .provider_ids
        .as_ref()
        .map(|ids| ExternalIds {
            tmdb: provider_id(ids, "tmdb"),
            imdb: provider_id(ids, "imdb"),
        })
        .unwrap_or_default();

    let sources = item
        .media_sources
        .as_ref()
        .map(|sources| sources.iter().map(source_dto_to_media_source).collect())
        .unwrap_or_default();

    let date_created = parse_date(item.date_created.as_deref());
    if item.date_created.is_some() && date_created.is_none() {
        warn!("Jellyfin: unparseable DateCreated on item {}", item.id);
    }

    CatalogEntry {
        id: item.id.clone(),
        title: item.name.clone().unwrap_or_default(),
        release_year: item.production_year.and_then(|y| u32::try_from(y).ok()),
        external_ids,
        sources,
        date_created,
        primary_image_tag: item
            .image_tags
            .as_ref()
            .and_then(|tags| tags.get("Primary").cloned()),
        path: item.path.clone(),
    }
}

fn view_to_library(view: &BaseItemDto) -> Library {
    Library {
        id: view.id.clone(),
        name: view.name.clone().unwrap_or_default(),
        collection_type: view.collection_type.clone(),
    }
}

#[async_trait]
impl CatalogSource for JellyfinClient {
    fn source_name(&self) -> &str {
        "Jellyfin"
    }

    async fn authenticate(&mut self) -> Result<(), SourceError> {
        if self.session.is_none() {
            return Err(SourceError::NotAuthenticated);
        }

        let user = self.http.current_user().await?;
        let session_user = self.session.as_ref().map(|s| s.user_id.as_str());
        if session_user != Some(user.id.as_str()) {
            warn!(
                "Jellyfin: token belongs to user {} but session stored {:?}",
                user.id, session_user
            );
            if let Some(session) = self.session.as_mut() {
                session.user_id = user.id.clone();
            }
        }

        self.authenticated = true;
        info!(
            "Authenticated to Jellyfin as {}",
            user.name.as_deref().unwrap_or(user.id.as_str())
        );
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_libraries(&self) -> Result<Vec<Library>, SourceError> {
        let user_id = self.user_id()?;
        let views = self.http.get_views(user_id).await?;
        let libraries: Vec<Library> = views.iter().map(view_to_library).collect();
        debug!("Jellyfin: {} libraries visible", libraries.len());
        Ok(libraries)
    }

    async fn get_movies(&self, library_id: &str) -> Result<Vec<CatalogEntry>, SourceError> {
        let user_id = self.user_id()?;
        let items = self.http.get_movies(user_id, library_id).await?;
        info!("Jellyfin: fetched {} movies from library {}", items.len(), library_id);
        Ok(items.iter().map(item_to_entry).collect())
    }

    async fn delete_item(&self, id: &str) -> Result<(), SourceError> {
        self.user_id()?;
        self.http.delete_item(id).await?;
        info!("Jellyfin: deleted item {}", id);
        Ok(())
    }

    fn image_url(&self, entry: &CatalogEntry) -> Option<String> {
        let tag = entry.primary_image_tag.as_deref()?;
        Some(self.http.primary_image_url(&entry.id, tag))
    }
}
