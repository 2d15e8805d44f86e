//
//  redmine-cli
//  api/resources/uploads.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File uploads.
//!
//! Attaching a file is a two-step process:
//!
//! 1. `POST /uploads.json` with the raw bytes as `application/octet-stream`.
//!    The service answers `201 Created` with `{"upload": {"token": "..."}}`.
//! 2. Pass an [`Upload`] carrying that token (plus a file name) to
//!    `create_issue` or `update_issue`.
//!
//! # Example
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::resources::{Issue, Upload};
//!
//! # async fn run(client: RedmineClient, issue: Issue) -> Result<(), redmine_cli::api::ApiError> {
//! let token = client.upload_file(b"stack trace".to_vec()).await?;
//! let upload = Upload {
//!     token,
//!     filename: "trace.txt".to_string(),
//!     content_type: "text/plain".to_string(),
//!     ..Default::default()
//! };
//! client.update_issue(&issue, &[upload]).await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::api::common::codec::{decode_single, is_zero, nullable};
use crate::api::common::ApiResult;
use crate::api::RedmineClient;

/// A file uploaded ahead of being attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Upload {
    #[serde(default, deserialize_with = "nullable")]
    pub token: String,
    #[serde(default, deserialize_with = "nullable")]
    pub filename: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content_type: String,
}

impl Upload {
    pub(crate) fn encode(&self) -> UploadPayload<'_> {
        UploadPayload {
            token: &self.token,
            filename: &self.filename,
            description: &self.description,
            content_type: &self.content_type,
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub(crate) struct UploadPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    token: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    filename: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    description: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    content_type: &'a str,
}

impl RedmineClient {
    /// Uploads raw file content and returns the upload token.
    pub async fn upload_file(&self, bytes: Vec<u8>) -> ApiResult<String> {
        tracing::debug!(bytes = bytes.len(), "Uploading file");
        let body = self.post_octets("uploads.json", bytes).await?;
        let upload: Upload = decode_single(&body, "upload")?;
        Ok(upload.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ApiError;
    use crate::api::testing::mock_client;

    #[tokio::test]
    async fn test_upload_file_returns_token() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", "/uploads.json")
            .match_header("content-type", "application/octet-stream")
            .match_body("hello world")
            .with_status(201)
            .with_body(r#"{"upload": {"token": "7167.ed1ccdb093229ca1bd0b043618d88743"}}"#)
            .create_async()
            .await;

        let token = client.upload_file(b"hello world".to_vec()).await.unwrap();
        assert_eq!(token, "7167.ed1ccdb093229ca1bd0b043618d88743");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_file_requires_created() {
        let (mut server, client) = mock_client().await;
        let _mock = server
            .mock("POST", "/uploads.json")
            .with_status(413)
            .with_body("Request Entity Too Large")
            .create_async()
            .await;

        let err = client.upload_file(vec![0; 16]).await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { .. }));
        assert!(err.to_string().starts_with("413 Payload Too Large"));
    }

    #[test]
    fn test_upload_payload_skips_empty_fields() {
        let upload = Upload {
            token: "abc".to_string(),
            filename: "a.txt".to_string(),
            ..Default::default()
        };
        let encoded = serde_json::to_value(upload.encode()).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"token": "abc", "filename": "a.txt"})
        );
    }
}
