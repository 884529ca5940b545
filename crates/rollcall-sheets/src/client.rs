//! HTTP client for the Sheets REST API.
//!
//! Three operations back the check-in flow: first-tab title lookup,
//! bounded grid read, and single-cell update. Writes use `USER_ENTERED`
//! input semantics so values land exactly as if typed into the sheet.

use std::{sync::Arc, time::Duration};

use rollcall_core::{models::SheetId, roster::RosterGrid};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::{
    auth::{ServiceAccountKey, TokenProvider},
    error::{Result, SheetsError},
};

/// Bounded read range: header plus up to 999 data rows, columns A through
/// Z. Cell addressing relies on this bound (see `roster::cell_ref`).
const GRID_RANGE: &str = "A1:Z1000";

/// Configuration for the Sheets client.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// API base URL; overridden in tests.
    pub base_url: String,
    /// Token endpoint override; `None` uses the key's own `token_uri`.
    pub token_url: Option<String>,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com".to_string(),
            token_url: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for roster reads and attendance cell writes.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    tokens: Arc<TokenProvider>,
}

/// Spreadsheet metadata, reduced to the tab titles.
#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// A value range response. Formatted values are always strings.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    /// Creates a client for the given service account key.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::Network` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: SheetsConfig, key: ServiceAccountKey) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SheetsError::network(format!("failed to build HTTP client: {e}")))?;

        let tokens = Arc::new(TokenProvider::new(http.clone(), key, config.token_url));

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            tokens,
        })
    }

    /// Returns the title of the spreadsheet's first tab.
    #[instrument(skip(self))]
    pub async fn first_sheet_title(&self, sheet: &SheetId) -> Result<String> {
        let url = format!("{}/v4/spreadsheets/{}", self.base_url, sheet.as_str());
        let meta: SpreadsheetMeta = self.get_json(&url).await?;

        meta.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| SheetsError::decode("spreadsheet has no sheets"))
    }

    /// Reads the roster grid of the given tab; `None` when it has no data.
    #[instrument(skip(self))]
    pub async fn read_grid(&self, sheet: &SheetId, title: &str) -> Result<Option<RosterGrid>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!{}",
            self.base_url,
            sheet.as_str(),
            title,
            GRID_RANGE
        );
        let range: ValueRange = self.get_json(&url).await?;

        debug!(rows = range.values.len(), "fetched roster grid");
        Ok(RosterGrid::from_values(range.values))
    }

    /// Writes a single cell with `USER_ENTERED` input semantics.
    #[instrument(skip(self, value))]
    pub async fn write_cell(
        &self,
        sheet: &SheetId,
        title: &str,
        cell: &str,
        value: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!{}",
            self.base_url,
            sheet.as_str(),
            title,
            cell
        );
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .put(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::api(status.as_u16(), body));
        }

        debug!("attendance cell updated");
        Ok(())
    }

    /// Performs an authenticated GET and decodes the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::api(status.as_u16(), body));
        }

        response.json().await.map_err(|e| SheetsError::decode(e.to_string()))
    }

    /// Categorizes a transport-level request failure.
    fn request_error(&self, error: reqwest::Error) -> SheetsError {
        if error.is_timeout() {
            return SheetsError::timeout(self.timeout.as_secs());
        }
        if error.is_connect() {
            return SheetsError::network(format!("connection failed: {error}"));
        }
        SheetsError::network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rollcall_testing::{mock_token_endpoint, service_account_json};
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    async fn test_client(server: &MockServer) -> SheetsClient {
        mock_token_endpoint(server).await;
        let key =
            ServiceAccountKey::from_json(&service_account_json(&format!("{}/token", server.uri())))
                .unwrap();
        let config = SheetsConfig {
            base_url: server.uri(),
            token_url: None,
            timeout: Duration::from_secs(5),
        };
        SheetsClient::new(config, key).unwrap()
    }

    #[tokio::test]
    async fn first_sheet_title_returns_leading_tab() {
        let server = MockServer::start().await;
        let client = test_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sheets": [
                    { "properties": { "title": "Roster" } },
                    { "properties": { "title": "Archive" } }
                ]
            })))
            .mount(&server)
            .await;

        let title = client.first_sheet_title(&SheetId::from("sheet-a")).await.unwrap();
        assert_eq!(title, "Roster");
    }

    #[tokio::test]
    async fn spreadsheet_without_tabs_is_a_decode_error() {
        let server = MockServer::start().await;
        let client = test_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sheets": [] })))
            .mount(&server)
            .await;

        let result = client.first_sheet_title(&SheetId::from("sheet-a")).await;
        assert!(matches!(result, Err(SheetsError::Decode { .. })));
    }

    #[tokio::test]
    async fn read_grid_parses_values() {
        let server = MockServer::start().await;
        let client = test_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-a/values/Roster!A1:Z1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "Roster!A1:Z1000",
                "majorDimension": "ROWS",
                "values": [["學號", "姓名"], ["S001", "王小明"]]
            })))
            .mount(&server)
            .await;

        let grid = client.read_grid(&SheetId::from("sheet-a"), "Roster").await.unwrap().unwrap();
        assert_eq!(grid.header(), ["學號", "姓名"]);
        assert_eq!(grid.row_count(), 1);
    }

    #[tokio::test]
    async fn empty_grid_reads_as_none() {
        let server = MockServer::start().await;
        let client = test_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-a/values/Roster!A1:Z1000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "range": "Roster!A1:Z1000", "majorDimension": "ROWS" })),
            )
            .mount(&server)
            .await;

        let grid = client.read_grid(&SheetId::from("sheet-a"), "Roster").await.unwrap();
        assert!(grid.is_none());
    }

    #[tokio::test]
    async fn write_cell_uses_user_entered_semantics() {
        let server = MockServer::start().await;
        let client = test_client(&server).await;

        Mock::given(method("PUT"))
            .and(path("/v4/spreadsheets/sheet-a/values/Roster!C4"))
            .and(query_param("valueInputOption", "USER_ENTERED"))
            .and(body_partial_json(json!({ "values": [["出席 10:30"]] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updatedCells": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        client
            .write_cell(&SheetId::from("sheet-a"), "Roster", "C4", "出席 10:30")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_failure_maps_to_status_error() {
        let server = MockServer::start().await;
        let client = test_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-a"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let result = client.first_sheet_title(&SheetId::from("sheet-a")).await;
        match result {
            Err(SheetsError::Api { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("PERMISSION_DENIED"));
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn access_token_is_cached_across_calls() {
        let server = MockServer::start().await;
        mock_token_endpoint(&server).await;
        let key =
            ServiceAccountKey::from_json(&service_account_json(&format!("{}/token", server.uri())))
                .unwrap();
        let config = SheetsConfig {
            base_url: server.uri(),
            token_url: None,
            timeout: Duration::from_secs(5),
        };
        let client = SheetsClient::new(config, key).unwrap();

        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sheets": [{ "properties": { "title": "Roster" } }]
            })))
            .mount(&server)
            .await;

        client.first_sheet_title(&SheetId::from("sheet-a")).await.unwrap();
        client.first_sheet_title(&SheetId::from("sheet-a")).await.unwrap();

        let token_requests = server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/token")
            .count();
        assert_eq!(token_requests, 1);
    }
}
