//! Queries against the `audios` metadata table.

use crate::error::{ClientError, ClientResult};
use crate::types::{AudioRow, ClientConfig, NewAudioRow};
use reqwest::{Client, StatusCode};
use tracing::debug;
use wavedrop_core::{AudioItem, FeedFilter, NewAudioRecord, Page};

/// REST surface over the metadata table.
pub(crate) struct RestApi<'a> {
    http: &'a Client,
    config: &'a ClientConfig,
}

impl<'a> RestApi<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a ClientConfig) -> Self {
        Self { http, config }
    }

    /// List audio rows newest-first, windowed by `offset`/`limit`.
    ///
    /// The exact total is requested alongside and parsed out of the
    /// `Content-Range` header when the backend reports one.
    pub(crate) async fn list(
        &self,
        filter: &FeedFilter,
        offset: u64,
        limit: u64,
        bearer: Option<&str>,
    ) -> ClientResult<Page<AudioItem>> {
        let url = format!("{}/rest/v1/audios", self.config.base_url);
        let mut request = self
            .http
            .get(&url)
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        if let Some(owner) = filter.owner() {
            request = request.query(&[("user_id", format!("eq.{owner}"))]);
        }

        let upper = offset + limit.saturating_sub(1);
        request = request
            .header("apikey", &self.config.anon_key)
            .header("Range-Unit", "items")
            .header("Range", format!("{offset}-{upper}"))
            .header("Prefer", "count=exact");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, offset, limit, "fetching audio rows");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let total = response
                .headers()
                .get("Content-Range")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range_total);

            let rows: Vec<AudioRow> = response.json().await.map_err(|e| {
                ClientError::Parse(format!("Failed to parse audio rows: {e}"))
            })?;
            debug!(rows = rows.len(), ?total, "fetched audio rows");

            Ok(Page {
                rows: rows.into_iter().map(AudioItem::from).collect(),
                total_count: total,
            })
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::AuthRequired)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Insert a metadata row, returning the stored representation.
    pub(crate) async fn insert(
        &self,
        record: NewAudioRecord,
        bearer: Option<&str>,
    ) -> ClientResult<AudioItem> {
        let url = format!("{}/rest/v1/audios", self.config.base_url);
        let row = NewAudioRow::from(record);

        let mut request = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .header("Prefer", "return=representation")
            .json(&row);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, filename = %row.filename, "inserting audio row");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let mut rows: Vec<AudioRow> = response.json().await.map_err(|e| {
                ClientError::Parse(format!("Failed to parse inserted row: {e}"))
            })?;
            if rows.is_empty() {
                return Err(ClientError::Parse(
                    "insert returned no representation".to_string(),
                ));
            }
            Ok(AudioItem::from(rows.remove(0)))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::AuthRequired)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Extract the exact total from a `Content-Range` value ("0-7/19").
///
/// An unknown total ("0-7/*") yields `None`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}
