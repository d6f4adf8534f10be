use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CaptionTrack, CaptionsService, VideoDetails, VideoInfoService};
use crate::error::{status_detail, transport_detail, YoutubeError};

/// YouTube Data API v3 client for video metadata and caption listings
#[derive(Debug, Clone)]
pub struct YoutubeDataClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    items: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoSnippet {
    title: String,
    description: String,
    channel_title: String,
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionItem {
    #[serde(default)]
    id: String,
    snippet: Option<CaptionSnippet>,
}

#[derive(Debug, Deserialize)]
struct CaptionSnippet {
    language: Option<String>,
    name: Option<String>,
}

impl YoutubeDataClient {
    pub fn new(client: Client, api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// GET `{base}/{resource}?{query}&key=...` and decode a list response
    async fn get_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &str,
    ) -> Result<Vec<T>, YoutubeError> {
        tracing::debug!("YouTube API request: {}/{}?{}", self.api_base, resource, query);

        let url = format!(
            "{}/{}?{}&key={}",
            self.api_base,
            resource,
            query,
            urlencoding::encode(self.api_key.as_deref().unwrap_or_default())
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| YoutubeError::Api(transport_detail(&e)))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(YoutubeError::QuotaExceeded);
        }
        if !status.is_success() {
            return Err(YoutubeError::Api(status_detail(status)));
        }

        let body: ListResponse<T> = response
            .json()
            .await
            .map_err(|e| YoutubeError::Api(e.to_string()))?;

        Ok(body.items.unwrap_or_default())
    }
}

#[async_trait]
impl VideoInfoService for YoutubeDataClient {
    async fn fetch_video(&self, video_id: &str) -> Result<Option<VideoDetails>, YoutubeError> {
        let query = format!(
            "part=snippet,contentDetails,statistics&id={}",
            urlencoding::encode(video_id)
        );
        let items: Vec<VideoItem> = self.get_list("videos", &query).await?;

        Ok(items.into_iter().next().map(|item| VideoDetails {
            title: item.snippet.title,
            description: item.snippet.description,
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
            view_count: item.statistics.view_count,
            like_count: item.statistics.like_count,
        }))
    }
}

#[async_trait]
impl CaptionsService for YoutubeDataClient {
    async fn list_captions(&self, video_id: &str) -> Result<Vec<CaptionTrack>, YoutubeError> {
        let query = format!("part=snippet&videoId={}", urlencoding::encode(video_id));
        let items: Vec<CaptionItem> = self.get_list("captions", &query).await?;

        Ok(items
            .into_iter()
            .map(|item| CaptionTrack {
                id: item.id,
                language: item.snippet.as_ref().and_then(|s| s.language.clone()),
                name: item.snippet.and_then(|s| s.name),
            })
            .collect())
    }
}
