//! Gmail operations
//!
//! Messages are sent as base64url-encoded RFC 2822 plain-text mail. The
//! access token must carry the `gmail.compose` scope for a real mailbox.

use super::types::{EmailDraft, GmailDraft, GmailMessage, SentEmail};
use super::{GoogleWorkspaceClient, WorkspaceError};
use crate::models::OperationResult;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde_json::json;

impl GoogleWorkspaceClient {
    /// Send a plain-text email from the authorized mailbox
    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        cc: &[String],
    ) -> OperationResult<SentEmail> {
        OperationResult::from_result(
            "Gmail send",
            self.try_send_email(to, subject, body, cc).await,
        )
    }

    async fn try_send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        cc: &[String],
    ) -> Result<SentEmail, WorkspaceError> {
        self.access_token()?;
        let raw = encode_message(to, subject, body, cc)?;

        let sent: GmailMessage = self
            .execute(
                self.http
                    .post(self.gmail_url("/users/me/messages/send"))
                    .json(&json!({ "raw": raw })),
            )
            .await?;

        Ok(SentEmail {
            message_id: sent.id,
            thread_id: sent.thread_id,
        })
    }

    /// Save a plain-text email as a draft in the authorized mailbox
    pub async fn create_draft(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> OperationResult<EmailDraft> {
        OperationResult::from_result(
            "Gmail create draft",
            self.try_create_draft(to, subject, body).await,
        )
    }

    async fn try_create_draft(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<EmailDraft, WorkspaceError> {
        self.access_token()?;
        let raw = encode_message(to, subject, body, &[])?;

        let draft: GmailDraft = self
            .execute(
                self.http
                    .post(self.gmail_url("/users/me/drafts"))
                    .json(&json!({ "message": { "raw": raw } })),
            )
            .await?;

        Ok(EmailDraft {
            draft_id: draft.id,
            message_id: draft.message.id,
        })
    }
}

fn reject_line_breaks(field: &str, value: &str) -> Result<(), WorkspaceError> {
    if value.contains(['\r', '\n']) {
        return Err(WorkspaceError::InvalidInput(format!(
            "{} must not contain line breaks",
            field
        )));
    }
    Ok(())
}

/// RFC 2047 encoded-word for non-ASCII header values
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

/// Build the message and encode it the way the Gmail API expects
fn encode_message(
    to: &str,
    subject: &str,
    body: &str,
    cc: &[String],
) -> Result<String, WorkspaceError> {
    if to.trim().is_empty() {
        return Err(WorkspaceError::InvalidInput("recipient is required".to_string()));
    }
    reject_line_breaks("to", to)?;
    reject_line_breaks("subject", subject)?;
    for address in cc {
        reject_line_breaks("cc", address)?;
    }

    let mut message = format!("To: {}\r\n", to);
    if !cc.is_empty() {
        message.push_str(&format!("Cc: {}\r\n", cc.join(", ")));
    }
    message.push_str(&format!("Subject: {}\r\n", encode_header(subject)));
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
    message.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
    message.push_str(body);

    Ok(URL_SAFE.encode(message.as_bytes()))
}
