//! Google Workspace client (Drive, Docs, Gmail)
//!
//! Thin typed wrapper over the Google REST APIs used for project file
//! management. Every public method checks that the client has credentials,
//! issues its request(s), and answers with an [`OperationResult`]; faults are
//! logged and reported as `{success: false, error}`, never propagated.
//!
//! Authentication uses an OAuth2 bearer access token supplied through
//! configuration. Obtaining that token is left to the deployment.
//!
//! [`OperationResult`]: crate::models::OperationResult

mod docs;
mod drive;
mod gmail;
pub mod types;

pub use types::{
    AppendedContent, BatchUploadSummary, DeleteAction, DeletedFile, DeliverableSection,
    DocumentInfo, EmailDraft, FileKind, FileListing, FileSummary, FileTypeFilter, FolderInfo,
    FolderTree, MovedFile, NamedUpload, ProjectStructure, ProjectSubfolders, RecentFiles,
    RenamedFile, SearchResults, SectionBody, SentEmail, ShareInfo, ShareRole, TreeNode,
    UploadRequest, UploadedFile,
};

use crate::core::config::GoogleWorkspaceConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors raised while talking to Google Workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Google Workspace client not configured")]
    NotConfigured,

    #[error("Folder '{0}' not found")]
    FolderNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Google API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client for Google Workspace APIs
pub struct GoogleWorkspaceClient {
    http: Client,
    config: GoogleWorkspaceConfig,
}

impl GoogleWorkspaceClient {
    pub fn new(config: GoogleWorkspaceConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self { http, config }
    }

    /// Check if client is properly configured
    pub fn is_configured(&self) -> bool {
        self.config.access_token.is_some()
    }

    /// Google Cloud project the credentials belong to, if known
    pub fn project_id(&self) -> Option<&str> {
        self.config.project_id.as_deref()
    }

    fn access_token(&self) -> Result<&str, WorkspaceError> {
        self.config
            .access_token
            .as_deref()
            .ok_or(WorkspaceError::NotConfigured)
    }

    fn drive_url(&self, path: &str) -> String {
        format!("{}{}", self.config.drive_base_url.trim_end_matches('/'), path)
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}{}", self.config.drive_upload_url.trim_end_matches('/'), path)
    }

    fn docs_url(&self, path: &str) -> String {
        format!("{}{}", self.config.docs_base_url.trim_end_matches('/'), path)
    }

    fn gmail_url(&self, path: &str) -> String {
        format!("{}{}", self.config.gmail_base_url.trim_end_matches('/'), path)
    }

    /// Authorize, send, check status and decode the JSON body
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, WorkspaceError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| WorkspaceError::UnexpectedResponse(e.to_string()))
    }

    /// Like [`Self::execute`] for calls whose response body is irrelevant
    async fn execute_empty(&self, request: RequestBuilder) -> Result<(), WorkspaceError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, WorkspaceError> {
        let token = self.access_token()?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<GoogleErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or(body);

        Err(WorkspaceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Quote a value as a Drive query string literal
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod test_support {
    use super::GoogleWorkspaceClient;
    use crate::core::config::GoogleWorkspaceConfig;
    use httpmock::MockServer;

    pub const TOKEN: &str = "ya29.test-token";

    pub fn client_for(server: &MockServer) -> GoogleWorkspaceClient {
        GoogleWorkspaceClient::new(GoogleWorkspaceConfig::with_base_url(
            Some(TOKEN.to_string()),
            &server.base_url(),
        ))
    }

    pub fn unconfigured_client_for(server: &MockServer) -> GoogleWorkspaceClient {
        GoogleWorkspaceClient::new(GoogleWorkspaceConfig::with_base_url(
            None,
            &server.base_url(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_literals() {
        assert_eq!(quote("Acme"), "'Acme'");
        assert_eq!(quote("Bob's Bakery"), "'Bob\\'s Bakery'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_is_configured_follows_token() {
        let configured = GoogleWorkspaceClient::new(GoogleWorkspaceConfig {
            access_token: Some("token".to_string()),
            project_id: Some("mwd-prod".to_string()),
            ..GoogleWorkspaceConfig::default()
        });
        assert!(configured.is_configured());
        assert_eq!(configured.project_id(), Some("mwd-prod"));

        let unconfigured = GoogleWorkspaceClient::new(GoogleWorkspaceConfig::default());
        assert!(!unconfigured.is_configured());
        assert!(matches!(
            unconfigured.access_token(),
            Err(WorkspaceError::NotConfigured)
        ));
    }
}
