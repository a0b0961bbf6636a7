//! Google Docs operations

use super::types::{
    AppendedContent, DeliverableSection, DocsDocument, DocumentInfo, SectionBody,
};
use super::{GoogleWorkspaceClient, WorkspaceError};
use crate::core::constants::google;
use crate::models::OperationResult;
use serde_json::json;

impl GoogleWorkspaceClient {
    /// Create a new Google Doc, optionally filed into a Drive folder
    pub async fn create_document(
        &self,
        title: &str,
        folder_id: Option<&str>,
    ) -> OperationResult<DocumentInfo> {
        OperationResult::from_result(
            "Google Docs create",
            self.try_create_document(title, folder_id).await,
        )
    }

    async fn try_create_document(
        &self,
        title: &str,
        folder_id: Option<&str>,
    ) -> Result<DocumentInfo, WorkspaceError> {
        let doc: DocsDocument = self
            .execute(
                self.http
                    .post(self.docs_url("/documents"))
                    .json(&json!({ "title": title })),
            )
            .await?;

        if doc.document_id.is_empty() {
            return Err(WorkspaceError::UnexpectedResponse(
                "document created without an id".to_string(),
            ));
        }

        if let Some(folder) = folder_id {
            self.execute_empty(
                self.http
                    .patch(self.drive_url(&format!("/files/{}", doc.document_id)))
                    .query(&[("addParents", folder), ("fields", "id, parents")])
                    .json(&json!({})),
            )
            .await?;
        }

        Ok(DocumentInfo {
            url: format!("{}/{}/edit", google::DOCS_EDIT_URL, doc.document_id),
            document_id: doc.document_id,
            title: doc.title,
        })
    }

    /// Append text at the end of a document's body
    ///
    /// `content_added` counts characters, not bytes.
    pub async fn append_to_document(
        &self,
        document_id: &str,
        content: &str,
    ) -> OperationResult<AppendedContent> {
        OperationResult::from_result(
            "Google Docs append",
            self.try_append_to_document(document_id, content).await,
        )
    }

    async fn try_append_to_document(
        &self,
        document_id: &str,
        content: &str,
    ) -> Result<AppendedContent, WorkspaceError> {
        let doc: DocsDocument = self
            .execute(self.http.get(self.docs_url(&format!("/documents/{}", document_id))))
            .await?;

        let end_index = doc
            .body
            .and_then(|body| body.content.last().and_then(|element| element.end_index))
            .ok_or_else(|| {
                WorkspaceError::UnexpectedResponse(format!(
                    "document {} has no body content",
                    document_id
                ))
            })?;

        // The final newline of the body cannot be written before; index 1 is
        // the first writable position.
        let insert_at = (end_index - 1).max(1);

        let requests = json!({
            "requests": [{
                "insertText": {
                    "location": { "index": insert_at },
                    "text": content,
                }
            }]
        });

        self.execute_empty(
            self.http
                .post(self.docs_url(&format!("/documents/{}:batchUpdate", document_id)))
                .json(&requests),
        )
        .await?;

        Ok(AppendedContent {
            document_id: document_id.to_string(),
            content_added: content.chars().count(),
        })
    }

    /// Create a document and fill it with a plain-text rendering of `sections`
    ///
    /// Fails without writing anything when the document cannot be created.
    pub async fn create_deliverable_doc(
        &self,
        title: &str,
        sections: &[DeliverableSection],
        folder_id: Option<&str>,
    ) -> OperationResult<DocumentInfo> {
        OperationResult::from_result(
            "Google Docs create deliverable",
            self.try_create_deliverable_doc(title, sections, folder_id)
                .await,
        )
    }

    async fn try_create_deliverable_doc(
        &self,
        title: &str,
        sections: &[DeliverableSection],
        folder_id: Option<&str>,
    ) -> Result<DocumentInfo, WorkspaceError> {
        let doc = self.try_create_document(title, folder_id).await?;

        self.try_append_to_document(&doc.document_id, &render_deliverable(title, sections))
            .await?;

        Ok(DocumentInfo {
            title: title.to_string(),
            ..doc
        })
    }
}

fn underline(text: &str, mark: char) -> String {
    mark.to_string().repeat(text.chars().count())
}

/// Plain-text layout of a deliverable document
pub(crate) fn render_deliverable(title: &str, sections: &[DeliverableSection]) -> String {
    let mut text = format!("\n{}\n{}\n\n", title, underline(title, '='));

    for section in sections {
        text.push_str(&format!(
            "\n{}\n{}\n",
            section.title,
            underline(&section.title, '-')
        ));

        match &section.body {
            SectionBody::Items(items) => {
                for item in items {
                    text.push_str(&format!("  - {}\n", item));
                }
            }
            SectionBody::Fields(fields) => {
                for (key, value) in fields {
                    text.push_str(&format!("  {}: {}\n", key, value));
                }
            }
            SectionBody::Text(body) => {
                text.push_str(body);
                text.push('\n');
            }
        }

        text.push('\n');
    }

    text
}
