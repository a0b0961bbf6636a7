//! Google Workspace data models
//!
//! Wire types mirror the subset of Drive/Docs/Gmail JSON the client reads.
//! Result payloads are the operation-specific fields of each result record.

use crate::core::constants::google;
use crate::models::OperationResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Drive file resource
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub web_view_link: Option<String>,
    pub web_content_link: Option<String>,
    pub created_time: Option<String>,
    pub modified_time: Option<String>,
    pub parents: Vec<String>,
}

impl DriveFile {
    pub fn url(&self) -> String {
        self.web_view_link.clone().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DriveFileList {
    pub files: Vec<DriveFile>,
}

/// Docs document resource; only the body's element end indexes are read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DocsDocument {
    pub document_id: String,
    pub title: String,
    pub body: Option<DocsBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DocsBody {
    pub content: Vec<DocsStructuralElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DocsStructuralElement {
    pub end_index: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct GmailMessage {
    pub id: String,
    pub thread_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GmailDraft {
    pub id: String,
    pub message: GmailMessage,
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Whether a Drive item is a folder or a regular file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    File,
}

impl FileKind {
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type == google::FOLDER_MIME_TYPE {
            FileKind::Folder
        } else {
            FileKind::File
        }
    }
}

/// Permission role granted when sharing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareRole {
    #[default]
    Reader,
    Writer,
    Commenter,
}

impl ShareRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ShareRole::Reader => "reader",
            ShareRole::Writer => "writer",
            ShareRole::Commenter => "commenter",
        }
    }
}

impl fmt::Display for ShareRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShareRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reader" => Ok(ShareRole::Reader),
            "writer" => Ok(ShareRole::Writer),
            "commenter" => Ok(ShareRole::Commenter),
            other => Err(format!("unknown share role: {}", other)),
        }
    }
}

/// Coarse file-type filter for searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTypeFilter {
    Image,
    Video,
    Document,
    Folder,
}

impl FileTypeFilter {
    /// Drive query clause selecting this type
    pub fn query_clause(self) -> &'static str {
        match self {
            FileTypeFilter::Image => "mimeType contains 'image/'",
            FileTypeFilter::Video => "mimeType contains 'video/'",
            FileTypeFilter::Document => {
                "(mimeType contains 'document' or mimeType contains 'pdf' or mimeType contains 'text/')"
            }
            FileTypeFilter::Folder => "mimeType = 'application/vnd.google-apps.folder'",
        }
    }
}

impl FromStr for FileTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(FileTypeFilter::Image),
            "video" => Ok(FileTypeFilter::Video),
            "document" => Ok(FileTypeFilter::Document),
            "folder" => Ok(FileTypeFilter::Folder),
            other => Err(format!("unknown file type: {}", other)),
        }
    }
}

/// One file of a batch upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub content: Vec<u8>,
    pub name: String,
    pub mime_type: String,
}

/// A titled section of a deliverable document
#[derive(Debug, Clone)]
pub struct DeliverableSection {
    pub title: String,
    pub body: SectionBody,
}

/// Section content, rendered as bullets, `key: value` lines or plain text
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Items(Vec<String>),
    Fields(Vec<(String, String)>),
    Text(String),
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SectionBody {
    /// Arrays become items, objects become fields, anything else text
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => SectionBody::Items(items.iter().map(display_value).collect()),
            Value::Object(map) => SectionBody::Fields(
                map.iter()
                    .map(|(key, value)| (key.clone(), display_value(value)))
                    .collect(),
            ),
            other => SectionBody::Text(display_value(other)),
        }
    }
}

impl DeliverableSection {
    pub fn new(title: impl Into<String>, body: SectionBody) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    /// Sections from a JSON object, one per key
    pub fn from_json_object(sections: &serde_json::Map<String, Value>) -> Vec<Self> {
        sections
            .iter()
            .map(|(title, value)| Self::new(title.clone(), SectionBody::from_json(value)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Result payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderInfo {
    pub folder_id: String,
    pub name: String,
    pub url: String,
}

impl From<DriveFile> for FolderInfo {
    fn from(file: DriveFile) -> Self {
        let url = file.url();
        Self {
            folder_id: file.id,
            name: file.name,
            url,
        }
    }
}

/// Main project folder plus each subfolder that was created, keyed by name
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSubfolders {
    pub main: FolderInfo,
    #[serde(flatten)]
    pub created: BTreeMap<String, FolderInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStructure {
    pub project_folder_id: String,
    pub project_folder_url: String,
    pub subfolders: ProjectSubfolders,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub mime_type: String,
    pub url: String,
    pub created: String,
    pub modified: String,
}

impl From<DriveFile> for FileSummary {
    fn from(file: DriveFile) -> Self {
        Self {
            kind: FileKind::from_mime_type(&file.mime_type),
            url: file.url(),
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            created: file.created_time.unwrap_or_default(),
            modified: file.modified_time.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileListing {
    pub files: Vec<FileSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareInfo {
    pub file_id: String,
    pub shared_with: String,
    pub role: ShareRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub file_id: String,
    pub name: String,
    pub url: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedUpload {
    pub name: String,
    #[serde(flatten)]
    pub result: OperationResult<UploadedFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchUploadSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<NamedUpload>,
}

/// Node of a folder tree; `children` is present only on expanded folders
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub url: String,
    pub modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderTree {
    pub folder_id: String,
    pub name: String,
    pub url: String,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovedFile {
    pub file_id: String,
    pub name: String,
    pub url: String,
    pub new_parent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<FileSummary>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenamedFile {
    pub file_id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteAction {
    Deleted,
    Trashed,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedFile {
    pub file_id: String,
    pub action: DeleteAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentFiles {
    pub results: Vec<FileSummary>,
    pub count: usize,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppendedContent {
    pub document_id: String,
    pub content_added: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentEmail {
    pub message_id: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailDraft {
    pub draft_id: String,
    pub message_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_body_from_json() {
        assert_eq!(
            SectionBody::from_json(&json!(["Innovation", 2])),
            SectionBody::Items(vec!["Innovation".to_string(), "2".to_string()])
        );
        assert_eq!(
            SectionBody::from_json(&json!({"primary": "#1A73E8"})),
            SectionBody::Fields(vec![("primary".to_string(), "#1A73E8".to_string())])
        );
        assert_eq!(
            SectionBody::from_json(&json!("Plain text")),
            SectionBody::Text("Plain text".to_string())
        );
    }

    #[test]
    fn test_sections_keep_caller_order() {
        let payload = json!({
            "Positioning": "Premium but approachable",
            "Audience": ["Founders", "Ops leads"],
            "Colors": {"secondary": "#FBBC04", "primary": "#1A73E8"}
        });
        let sections = DeliverableSection::from_json_object(payload.as_object().unwrap());

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Positioning", "Audience", "Colors"]);
        assert_eq!(
            sections[2].body,
            SectionBody::Fields(vec![
                ("secondary".to_string(), "#FBBC04".to_string()),
                ("primary".to_string(), "#1A73E8".to_string()),
            ])
        );
    }

    #[test]
    fn test_tree_node_omits_children_on_leaves() {
        let node = TreeNode {
            id: "f1".to_string(),
            name: "logo.png".to_string(),
            kind: FileKind::File,
            url: String::new(),
            modified: String::new(),
            children: None,
        };
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], json!("file"));
        assert!(value.get("children").is_none());
    }

    #[test]
    fn test_share_role_parsing() {
        assert_eq!("Writer".parse::<ShareRole>().unwrap(), ShareRole::Writer);
        assert!("owner".parse::<ShareRole>().is_err());
        assert_eq!(ShareRole::default(), ShareRole::Reader);
    }
}
