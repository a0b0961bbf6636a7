//! Google Drive operations

use super::types::{
    BatchUploadSummary, DeleteAction, DeletedFile, DriveFile, DriveFileList, FileKind,
    FileListing, FileSummary, FileTypeFilter, FolderInfo, FolderTree, MovedFile, NamedUpload,
    ProjectStructure, ProjectSubfolders, RecentFiles, RenamedFile, SearchResults, ShareInfo,
    ShareRole, TreeNode, UploadRequest, UploadedFile,
};
use super::{GoogleWorkspaceClient, WorkspaceError, quote};
use crate::core::constants::{google, project};
use crate::models::OperationResult;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error, warn};

const LIST_FIELDS: &str = "files(id, name, mimeType, webViewLink, createdTime, modifiedTime)";

type ChildrenFuture<'a> = Pin<Box<dyn Future<Output = Vec<TreeNode>> + Send + 'a>>;

impl GoogleWorkspaceClient {
    /// Create a folder in Google Drive
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> OperationResult<FolderInfo> {
        OperationResult::from_result(
            "Google Drive create folder",
            self.try_create_folder(name, parent_id).await,
        )
    }

    async fn try_create_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<FolderInfo, WorkspaceError> {
        let mut metadata = json!({
            "name": name,
            "mimeType": google::FOLDER_MIME_TYPE,
        });
        if let Some(parent) = parent_id {
            metadata["parents"] = json!([parent]);
        }

        let folder: DriveFile = self
            .execute(
                self.http
                    .post(self.drive_url("/files"))
                    .query(&[("fields", "id, name, webViewLink")])
                    .json(&metadata),
            )
            .await?;

        Ok(folder.into())
    }

    /// Create the standard project folder with its numbered subfolders
    ///
    /// Fails without creating subfolders when the main folder cannot be
    /// created. A subfolder that fails is logged and left out of the result.
    pub async fn create_project_structure(
        &self,
        project_name: &str,
        parent_id: Option<&str>,
    ) -> OperationResult<ProjectStructure> {
        OperationResult::from_result(
            "Google Drive create project structure",
            self.try_create_project_structure(project_name, parent_id)
                .await,
        )
    }

    async fn try_create_project_structure(
        &self,
        project_name: &str,
        parent_id: Option<&str>,
    ) -> Result<ProjectStructure, WorkspaceError> {
        let main = self.try_create_folder(project_name, parent_id).await?;

        let mut created = BTreeMap::new();
        for subfolder in project::SUBFOLDERS {
            match self.try_create_folder(subfolder, Some(&main.folder_id)).await {
                Ok(folder) => {
                    created.insert(subfolder.to_string(), folder);
                }
                Err(e) => warn!("Skipping subfolder {} of {}: {}", subfolder, project_name, e),
            }
        }

        Ok(ProjectStructure {
            project_folder_id: main.folder_id.clone(),
            project_folder_url: main.url.clone(),
            subfolders: ProjectSubfolders { main, created },
        })
    }

    /// List files in Drive, optionally within a folder and of one MIME type
    pub async fn list_files(
        &self,
        folder_id: Option<&str>,
        mime_type: Option<&str>,
    ) -> OperationResult<FileListing> {
        OperationResult::from_result(
            "Google Drive list files",
            self.try_list_files(folder_id, mime_type).await,
        )
    }

    async fn try_list_files(
        &self,
        folder_id: Option<&str>,
        mime_type: Option<&str>,
    ) -> Result<FileListing, WorkspaceError> {
        let mut query_parts = Vec::new();
        if let Some(folder) = folder_id {
            query_parts.push(format!("{} in parents", quote(folder)));
        }
        if let Some(mime) = mime_type {
            query_parts.push(format!("mimeType={}", quote(mime)));
        }
        query_parts.push("trashed=false".to_string());

        let listing: DriveFileList = self
            .execute(self.http.get(self.drive_url("/files")).query(&[
                ("q", query_parts.join(" and ").as_str()),
                ("pageSize", "100"),
                ("fields", LIST_FIELDS),
            ]))
            .await?;

        let files: Vec<FileSummary> = listing.files.into_iter().map(FileSummary::from).collect();
        Ok(FileListing {
            count: files.len(),
            files,
        })
    }

    /// Share a file or folder with a user
    pub async fn share_file(
        &self,
        file_id: &str,
        email: &str,
        role: ShareRole,
    ) -> OperationResult<ShareInfo> {
        OperationResult::from_result(
            "Google Drive share",
            self.try_share_file(file_id, email, role).await,
        )
    }

    async fn try_share_file(
        &self,
        file_id: &str,
        email: &str,
        role: ShareRole,
    ) -> Result<ShareInfo, WorkspaceError> {
        let permission = json!({
            "type": "user",
            "role": role.as_str(),
            "emailAddress": email,
        });

        self.execute_empty(
            self.http
                .post(self.drive_url(&format!("/files/{}/permissions", file_id)))
                .query(&[("sendNotificationEmail", "true")])
                .json(&permission),
        )
        .await?;

        Ok(ShareInfo {
            file_id: file_id.to_string(),
            shared_with: email.to_string(),
            role,
        })
    }

    /// Find the first non-trashed folder with the given name
    pub async fn find_folder_by_name(
        &self,
        folder_name: &str,
        parent_id: Option<&str>,
    ) -> OperationResult<FolderInfo> {
        OperationResult::from_result(
            "Google Drive find folder",
            self.try_find_folder_by_name(folder_name, parent_id).await,
        )
    }

    async fn try_find_folder_by_name(
        &self,
        folder_name: &str,
        parent_id: Option<&str>,
    ) -> Result<FolderInfo, WorkspaceError> {
        let mut query_parts = vec![
            format!("name={}", quote(folder_name)),
            format!("mimeType={}", quote(google::FOLDER_MIME_TYPE)),
            "trashed=false".to_string(),
        ];
        if let Some(parent) = parent_id {
            query_parts.push(format!("{} in parents", quote(parent)));
        }

        let listing: DriveFileList = self
            .execute(self.http.get(self.drive_url("/files")).query(&[
                ("q", query_parts.join(" and ").as_str()),
                ("pageSize", "10"),
                ("fields", "files(id, name, webViewLink)"),
            ]))
            .await?;

        listing
            .files
            .into_iter()
            .next()
            .map(FolderInfo::from)
            .ok_or_else(|| WorkspaceError::FolderNotFound(folder_name.to_string()))
    }

    /// Upload a file with a multipart (metadata + media) request
    pub async fn upload_file(
        &self,
        file_content: &[u8],
        file_name: &str,
        mime_type: &str,
        folder_id: Option<&str>,
    ) -> OperationResult<UploadedFile> {
        OperationResult::from_result(
            "Google Drive upload",
            self.try_upload_file(file_content, file_name, mime_type, folder_id)
                .await,
        )
    }

    async fn try_upload_file(
        &self,
        file_content: &[u8],
        file_name: &str,
        mime_type: &str,
        folder_id: Option<&str>,
    ) -> Result<UploadedFile, WorkspaceError> {
        let mut metadata = json!({ "name": file_name });
        if let Some(folder) = folder_id {
            metadata["parents"] = json!([folder]);
        }

        let boundary = format!("mwd-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &metadata.to_string(), mime_type, file_content);

        debug!("Uploading {} ({} bytes)", file_name, file_content.len());

        let file: DriveFile = self
            .execute(
                self.http
                    .post(self.upload_url("/files"))
                    .query(&[
                        ("uploadType", "multipart"),
                        ("fields", "id, name, webViewLink, webContentLink"),
                    ])
                    .header(
                        "Content-Type",
                        format!("multipart/related; boundary={}", boundary),
                    )
                    .body(body),
            )
            .await?;

        Ok(UploadedFile {
            url: file.url(),
            download_url: file.web_content_link.unwrap_or_default(),
            file_id: file.id,
            name: file.name,
        })
    }

    /// Upload several files to one folder, one after another
    ///
    /// The record is successful only when every upload succeeded; per-file
    /// outcomes are listed in `results`.
    pub async fn upload_files_batch(
        &self,
        files: &[UploadRequest],
        folder_id: &str,
    ) -> OperationResult<BatchUploadSummary> {
        if !self.is_configured() {
            return OperationResult::failure(WorkspaceError::NotConfigured.to_string());
        }

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let result = self
                .upload_file(&file.content, &file.name, &file.mime_type, Some(folder_id))
                .await;
            results.push(NamedUpload {
                name: file.name.clone(),
                result,
            });
        }

        let successful = results.iter().filter(|r| r.result.is_success()).count();
        let summary = BatchUploadSummary {
            total: files.len(),
            successful,
            failed: files.len() - successful,
            results,
        };

        OperationResult {
            success: successful == files.len(),
            data: Some(summary),
            error: None,
        }
    }

    /// Folder tree under `folder_id`, expanding folders up to `max_depth` levels
    pub async fn get_folder_tree(&self, folder_id: &str, max_depth: u32) -> OperationResult<FolderTree> {
        OperationResult::from_result(
            "Google Drive get folder tree",
            self.try_get_folder_tree(folder_id, max_depth).await,
        )
    }

    async fn try_get_folder_tree(
        &self,
        folder_id: &str,
        max_depth: u32,
    ) -> Result<FolderTree, WorkspaceError> {
        let root: DriveFile = self
            .execute(
                self.http
                    .get(self.drive_url(&format!("/files/{}", folder_id)))
                    .query(&[("fields", "id, name, webViewLink")]),
            )
            .await?;

        Ok(FolderTree {
            folder_id: folder_id.to_string(),
            url: root.url(),
            name: root.name,
            children: self.tree_children(folder_id, 1, max_depth).await,
        })
    }

    /// Children of `parent_id` at `depth`; a listing failure yields no children
    fn tree_children<'a>(&'a self, parent_id: &'a str, depth: u32, max_depth: u32) -> ChildrenFuture<'a> {
        Box::pin(async move {
            if depth > max_depth {
                return Vec::new();
            }

            let listing: DriveFileList = match self
                .execute(self.http.get(self.drive_url("/files")).query(&[
                    ("q", format!("{} in parents and trashed=false", quote(parent_id)).as_str()),
                    ("pageSize", "100"),
                    ("fields", LIST_FIELDS),
                    ("orderBy", "name"),
                ]))
                .await
            {
                Ok(listing) => listing,
                Err(e) => {
                    error!("Error getting children of {}: {}", parent_id, e);
                    return Vec::new();
                }
            };

            let mut items = Vec::with_capacity(listing.files.len());
            for file in listing.files {
                let kind = FileKind::from_mime_type(&file.mime_type);
                let children = if kind == FileKind::Folder && depth < max_depth {
                    Some(self.tree_children(&file.id, depth + 1, max_depth).await)
                } else {
                    None
                };

                items.push(TreeNode {
                    url: file.url(),
                    modified: file.modified_time.unwrap_or_default(),
                    id: file.id,
                    name: file.name,
                    kind,
                    children,
                });
            }
            items
        })
    }

    /// Move a file to another folder
    ///
    /// With `remove_from_current` the file leaves all of its current parents;
    /// otherwise the new folder is added alongside them.
    pub async fn move_file(
        &self,
        file_id: &str,
        new_parent_id: &str,
        remove_from_current: bool,
    ) -> OperationResult<MovedFile> {
        OperationResult::from_result(
            "Google Drive move file",
            self.try_move_file(file_id, new_parent_id, remove_from_current)
                .await,
        )
    }

    async fn try_move_file(
        &self,
        file_id: &str,
        new_parent_id: &str,
        remove_from_current: bool,
    ) -> Result<MovedFile, WorkspaceError> {
        let file_url = self.drive_url(&format!("/files/{}", file_id));

        let current: DriveFile = self
            .execute(self.http.get(&file_url).query(&[("fields", "parents, name")]))
            .await?;
        let previous_parents = current.parents.join(",");

        let mut params = vec![
            ("addParents", new_parent_id),
            ("fields", "id, name, parents, webViewLink"),
        ];
        if remove_from_current && !previous_parents.is_empty() {
            params.push(("removeParents", previous_parents.as_str()));
        }

        let moved: DriveFile = self
            .execute(self.http.patch(&file_url).query(&params).json(&json!({})))
            .await?;

        Ok(MovedFile {
            url: moved.url(),
            file_id: moved.id,
            name: moved.name,
            new_parent: new_parent_id.to_string(),
        })
    }

    /// Search files by name, newest first
    ///
    /// `folder_id` limits the search to direct children of that folder.
    pub async fn search_files(
        &self,
        query: &str,
        folder_id: Option<&str>,
        file_type: Option<FileTypeFilter>,
        max_results: u32,
    ) -> OperationResult<SearchResults> {
        OperationResult::from_result(
            "Google Drive search",
            self.try_search_files(query, folder_id, file_type, max_results)
                .await,
        )
    }

    async fn try_search_files(
        &self,
        query: &str,
        folder_id: Option<&str>,
        file_type: Option<FileTypeFilter>,
        max_results: u32,
    ) -> Result<SearchResults, WorkspaceError> {
        let mut query_parts = vec![
            format!("name contains {}", quote(query)),
            "trashed=false".to_string(),
        ];
        if let Some(folder) = folder_id {
            query_parts.push(format!("{} in parents", quote(folder)));
        }
        if let Some(filter) = file_type {
            query_parts.push(filter.query_clause().to_string());
        }

        let page_size = max_results.to_string();
        let listing: DriveFileList = self
            .execute(self.http.get(self.drive_url("/files")).query(&[
                ("q", query_parts.join(" and ").as_str()),
                ("pageSize", page_size.as_str()),
                (
                    "fields",
                    "files(id, name, mimeType, webViewLink, parents, createdTime, modifiedTime)",
                ),
                ("orderBy", "modifiedTime desc"),
            ]))
            .await?;

        let results: Vec<FileSummary> = listing.files.into_iter().map(FileSummary::from).collect();
        Ok(SearchResults {
            query: query.to_string(),
            count: results.len(),
            results,
        })
    }

    /// Rename a file or folder
    pub async fn rename_file(&self, file_id: &str, new_name: &str) -> OperationResult<RenamedFile> {
        OperationResult::from_result(
            "Google Drive rename",
            self.try_rename_file(file_id, new_name).await,
        )
    }

    async fn try_rename_file(
        &self,
        file_id: &str,
        new_name: &str,
    ) -> Result<RenamedFile, WorkspaceError> {
        let renamed: DriveFile = self
            .execute(
                self.http
                    .patch(self.drive_url(&format!("/files/{}", file_id)))
                    .query(&[("fields", "id, name, webViewLink")])
                    .json(&json!({ "name": new_name })),
            )
            .await?;

        Ok(RenamedFile {
            url: renamed.url(),
            file_id: renamed.id,
            name: renamed.name,
        })
    }

    /// Move a file to the trash, or delete it for good when `permanent`
    pub async fn delete_file(&self, file_id: &str, permanent: bool) -> OperationResult<DeletedFile> {
        OperationResult::from_result(
            "Google Drive delete",
            self.try_delete_file(file_id, permanent).await,
        )
    }

    async fn try_delete_file(
        &self,
        file_id: &str,
        permanent: bool,
    ) -> Result<DeletedFile, WorkspaceError> {
        let file_url = self.drive_url(&format!("/files/{}", file_id));

        let action = if permanent {
            self.execute_empty(self.http.delete(&file_url)).await?;
            DeleteAction::Deleted
        } else {
            self.execute_empty(self.http.patch(&file_url).json(&json!({ "trashed": true })))
                .await?;
            DeleteAction::Trashed
        };

        Ok(DeletedFile {
            file_id: file_id.to_string(),
            action,
        })
    }

    /// Files modified within the last `days` days, newest first
    pub async fn get_recent_files(
        &self,
        folder_id: Option<&str>,
        days: u32,
        max_results: u32,
    ) -> OperationResult<RecentFiles> {
        OperationResult::from_result(
            "Google Drive get recent files",
            self.try_get_recent_files(folder_id, days, max_results)
                .await,
        )
    }

    async fn try_get_recent_files(
        &self,
        folder_id: Option<&str>,
        days: u32,
        max_results: u32,
    ) -> Result<RecentFiles, WorkspaceError> {
        let cutoff = (Utc::now() - Duration::days(i64::from(days)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut query_parts = vec![
            format!("modifiedTime > {}", quote(&cutoff)),
            "trashed=false".to_string(),
        ];
        if let Some(folder) = folder_id {
            query_parts.push(format!("{} in parents", quote(folder)));
        }

        let page_size = max_results.to_string();
        let listing: DriveFileList = self
            .execute(self.http.get(self.drive_url("/files")).query(&[
                ("q", query_parts.join(" and ").as_str()),
                ("pageSize", page_size.as_str()),
                ("fields", "files(id, name, mimeType, webViewLink, modifiedTime)"),
                ("orderBy", "modifiedTime desc"),
            ]))
            .await?;

        let results: Vec<FileSummary> = listing.files.into_iter().map(FileSummary::from).collect();
        Ok(RecentFiles {
            count: results.len(),
            results,
            days,
        })
    }
}

/// Body of a `multipart/related` Drive upload: JSON metadata then media
fn multipart_related_body(
    boundary: &str,
    metadata: &str,
    mime_type: &str,
    content: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{TOKEN, client_for, unconfigured_client_for};
    use super::*;
    use httpmock::Method::PATCH;
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    fn folder_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "webViewLink": format!("https://drive.google.com/drive/folders/{}", id)
        })
    }

    #[tokio::test]
    async fn test_unconfigured_client_makes_no_requests() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/drive/v3/files");
                then.status(200).json_body(folder_json("f1", "x"));
            })
            .await;
        let list = server
            .mock_async(|when, then| {
                when.method(GET).path("/drive/v3/files");
                then.status(200).json_body(json!({"files": []}));
            })
            .await;

        let client = unconfigured_client_for(&server);
        let expected = Some("Google Workspace client not configured");

        assert_eq!(client.create_folder("x", None).await.error_message(), expected);
        assert_eq!(
            client
                .create_project_structure("Acme", None)
                .await
                .error_message(),
            expected
        );
        assert_eq!(client.list_files(None, None).await.error_message(), expected);
        assert_eq!(
            client.search_files("logo", None, None, 50).await.error_message(),
            expected
        );
        assert_eq!(client.get_folder_tree("root", 2).await.error_message(), expected);
        assert_eq!(
            client.upload_files_batch(&[], "f1").await.error_message(),
            expected
        );
        assert_eq!(client.delete_file("f1", true).await.error_message(), expected);

        assert_eq!(create.hits_async().await, 0);
        assert_eq!(list.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_create_folder_under_parent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/drive/v3/files")
                    .header("authorization", format!("Bearer {}", TOKEN))
                    .json_body(json!({
                        "name": "Assets",
                        "mimeType": "application/vnd.google-apps.folder",
                        "parents": ["parent-1"]
                    }));
                then.status(200).json_body(folder_json("f-assets", "Assets"));
            })
            .await;

        let result = client_for(&server)
            .create_folder("Assets", Some("parent-1"))
            .await;

        mock.assert_async().await;
        assert!(result.is_success());
        let folder = result.data.unwrap();
        assert_eq!(folder.folder_id, "f-assets");
        assert_eq!(folder.url, "https://drive.google.com/drive/folders/f-assets");
    }

    #[tokio::test]
    async fn test_create_project_structure_creates_six_subfolders() {
        let server = MockServer::start_async().await;
        let main = server
            .mock_async(|when, then| {
                when.method(POST).path("/drive/v3/files").json_body(json!({
                    "name": "TechFlow",
                    "mimeType": "application/vnd.google-apps.folder"
                }));
                then.status(200).json_body(folder_json("proj", "TechFlow"));
            })
            .await;

        let mut subfolder_mocks = Vec::new();
        for name in project::SUBFOLDERS {
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST).path("/drive/v3/files").json_body(json!({
                        "name": name,
                        "mimeType": "application/vnd.google-apps.folder",
                        "parents": ["proj"]
                    }));
                    then.status(200)
                        .json_body(folder_json(&format!("id-{}", name), name));
                })
                .await;
            subfolder_mocks.push(mock);
        }

        let result = client_for(&server)
            .create_project_structure("TechFlow", None)
            .await;

        main.assert_async().await;
        for mock in &subfolder_mocks {
            mock.assert_async().await;
        }

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["project_folder_id"], json!("proj"));
        assert_eq!(value["subfolders"]["main"]["folder_id"], json!("proj"));
        assert_eq!(
            value["subfolders"]["06_Client_Feedback"]["folder_id"],
            json!("id-06_Client_Feedback")
        );
        assert_eq!(result.data.unwrap().subfolders.created.len(), 6);
    }

    #[tokio::test]
    async fn test_create_project_structure_continues_past_failed_subfolder() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/drive/v3/files").json_body(json!({
                    "name": "TechFlow",
                    "mimeType": "application/vnd.google-apps.folder"
                }));
                then.status(200).json_body(folder_json("proj", "TechFlow"));
            })
            .await;

        let mut subfolder_mocks = Vec::new();
        for name in project::SUBFOLDERS {
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST).path("/drive/v3/files").json_body(json!({
                        "name": name,
                        "mimeType": "application/vnd.google-apps.folder",
                        "parents": ["proj"]
                    }));
                    if name == "03_Content" {
                        then.status(500).json_body(json!({
                            "error": {"code": 500, "message": "Backend Error"}
                        }));
                    } else {
                        then.status(200)
                            .json_body(folder_json(&format!("id-{}", name), name));
                    }
                })
                .await;
            subfolder_mocks.push(mock);
        }

        let result = client_for(&server)
            .create_project_structure("TechFlow", None)
            .await;

        for mock in &subfolder_mocks {
            mock.assert_async().await;
        }
        let created = result.data.unwrap().subfolders.created;
        assert_eq!(created.len(), 5);
        assert!(!created.contains_key("03_Content"));
        for name in ["04_Assets", "05_Deliverables", "06_Client_Feedback"] {
            assert_eq!(created[name].folder_id, format!("id-{}", name));
        }
    }

    #[tokio::test]
    async fn test_create_project_structure_stops_when_parent_fails() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/drive/v3/files");
                then.status(403).json_body(json!({
                    "error": {"code": 403, "message": "Insufficient permissions"}
                }));
            })
            .await;

        let result = client_for(&server)
            .create_project_structure("TechFlow", Some("shared"))
            .await;

        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(
            result.error_message(),
            Some("Google API error (status 403): Insufficient permissions")
        );
    }

    #[tokio::test]
    async fn test_list_files_builds_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files")
                    .query_param("q", "'f1' in parents and mimeType='image/png' and trashed=false")
                    .query_param("pageSize", "100");
                then.status(200).json_body(json!({
                    "files": [
                        {"id": "a", "name": "logo.png", "mimeType": "image/png",
                         "createdTime": "2026-01-01T00:00:00Z"}
                    ]
                }));
            })
            .await;

        let result = client_for(&server)
            .list_files(Some("f1"), Some("image/png"))
            .await;

        mock.assert_async().await;
        let listing = result.data.unwrap();
        assert_eq!(listing.count, 1);
        assert_eq!(listing.files[0].kind, FileKind::File);
        assert_eq!(listing.files[0].created, "2026-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_share_file_with_role() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/drive/v3/files/doc-1/permissions")
                    .query_param("sendNotificationEmail", "true")
                    .json_body(json!({
                        "type": "user",
                        "role": "writer",
                        "emailAddress": "client@example.com"
                    }));
                then.status(200).json_body(json!({"id": "perm-1"}));
            })
            .await;

        let result = client_for(&server)
            .share_file("doc-1", "client@example.com", ShareRole::Writer)
            .await;

        mock.assert_async().await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": true,
                "file_id": "doc-1",
                "shared_with": "client@example.com",
                "role": "writer"
            })
        );
    }

    #[tokio::test]
    async fn test_find_folder_by_name_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/drive/v3/files").query_param(
                    "q",
                    "name='Bob\\'s Designs' and mimeType='application/vnd.google-apps.folder' and trashed=false",
                );
                then.status(200).json_body(json!({"files": []}));
            })
            .await;

        let result = client_for(&server)
            .find_folder_by_name("Bob's Designs", None)
            .await;

        assert_eq!(
            result.error_message(),
            Some("Folder 'Bob's Designs' not found")
        );
    }

    #[tokio::test]
    async fn test_upload_file_sends_multipart_related() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload/drive/v3/files")
                    .query_param("uploadType", "multipart")
                    .header_exists("content-type")
                    .body_contains("\"parents\":[\"f1\"]")
                    .body_contains("Content-Type: text/plain")
                    .body_contains("brand guide");
                then.status(200).json_body(json!({
                    "id": "up-1",
                    "name": "guide.txt",
                    "webViewLink": "https://drive.google.com/file/d/up-1/view",
                    "webContentLink": "https://drive.google.com/uc?id=up-1"
                }));
            })
            .await;

        let result = client_for(&server)
            .upload_file(b"brand guide", "guide.txt", "text/plain", Some("f1"))
            .await;

        mock.assert_async().await;
        let uploaded = result.data.unwrap();
        assert_eq!(uploaded.file_id, "up-1");
        assert_eq!(uploaded.download_url, "https://drive.google.com/uc?id=up-1");
    }

    #[tokio::test]
    async fn test_upload_batch_reports_partial_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload/drive/v3/files")
                    .body_contains("ok.txt");
                then.status(200).json_body(json!({"id": "u1", "name": "ok.txt"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload/drive/v3/files")
                    .body_contains("huge.bin");
                then.status(413).body("Payload Too Large");
            })
            .await;

        let files = vec![
            UploadRequest {
                content: b"hello".to_vec(),
                name: "ok.txt".to_string(),
                mime_type: "text/plain".to_string(),
            },
            UploadRequest {
                content: vec![0u8; 16],
                name: "huge.bin".to_string(),
                mime_type: "application/octet-stream".to_string(),
            },
        ];

        let result = client_for(&server).upload_files_batch(&files, "f1").await;

        assert!(!result.is_success());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["total"], json!(2));
        assert_eq!(value["successful"], json!(1));
        assert_eq!(value["failed"], json!(1));
        assert_eq!(value["results"][0]["name"], json!("ok.txt"));
        assert_eq!(value["results"][0]["success"], json!(true));
        assert_eq!(
            value["results"][1]["error"],
            json!("Google API error (status 413): Payload Too Large")
        );
    }

    #[tokio::test]
    async fn test_folder_tree_respects_depth() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/drive/v3/files/root-f");
                then.status(200).json_body(folder_json("root-f", "TechFlow"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files")
                    .query_param("q", "'root-f' in parents and trashed=false")
                    .query_param("orderBy", "name");
                then.status(200).json_body(json!({"files": [
                    {"id": "design", "name": "02_Design",
                     "mimeType": "application/vnd.google-apps.folder"},
                    {"id": "brief", "name": "brief.pdf", "mimeType": "application/pdf",
                     "modifiedTime": "2026-10-01T10:00:00Z"}
                ]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files")
                    .query_param("q", "'design' in parents and trashed=false");
                then.status(200).json_body(json!({"files": [
                    {"id": "drafts", "name": "Drafts",
                     "mimeType": "application/vnd.google-apps.folder"}
                ]}));
            })
            .await;
        let too_deep = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files")
                    .query_param("q", "'drafts' in parents and trashed=false");
                then.status(200).json_body(json!({"files": []}));
            })
            .await;

        let result = client_for(&server).get_folder_tree("root-f", 2).await;

        assert_eq!(too_deep.hits_async().await, 0);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["name"], json!("TechFlow"));
        assert_eq!(value["children"][0]["type"], json!("folder"));
        assert_eq!(value["children"][0]["children"][0]["name"], json!("Drafts"));
        assert!(value["children"][0]["children"][0].get("children").is_none());
        assert_eq!(value["children"][1]["type"], json!("file"));
        assert_eq!(value["children"][1]["modified"], json!("2026-10-01T10:00:00Z"));
    }

    #[tokio::test]
    async fn test_folder_tree_subtree_failure_yields_empty_children() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/drive/v3/files/root-f");
                then.status(200).json_body(folder_json("root-f", "TechFlow"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/drive/v3/files");
                then.status(500).body("backend error");
            })
            .await;

        let result = client_for(&server).get_folder_tree("root-f", 2).await;

        assert!(result.is_success());
        assert!(result.data.unwrap().children.is_empty());
    }

    #[tokio::test]
    async fn test_move_file_replaces_parents() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files/file-1")
                    .query_param("fields", "parents, name");
                then.status(200)
                    .json_body(json!({"name": "logo.png", "parents": ["old-a", "old-b"]}));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/drive/v3/files/file-1")
                    .query_param("addParents", "new-p")
                    .query_param("removeParents", "old-a,old-b");
                then.status(200).json_body(json!({
                    "id": "file-1",
                    "name": "logo.png",
                    "parents": ["new-p"],
                    "webViewLink": "https://drive.google.com/file/d/file-1/view"
                }));
            })
            .await;

        let result = client_for(&server).move_file("file-1", "new-p", true).await;

        update.assert_async().await;
        let moved = result.data.unwrap();
        assert_eq!(moved.new_parent, "new-p");
        assert_eq!(moved.name, "logo.png");
    }

    #[tokio::test]
    async fn test_search_files_with_type_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files")
                    .query_param(
                        "q",
                        "name contains 'logo' and trashed=false and mimeType contains 'image/'",
                    )
                    .query_param("pageSize", "10")
                    .query_param("orderBy", "modifiedTime desc");
                then.status(200).json_body(json!({"files": [
                    {"id": "i1", "name": "logo.svg", "mimeType": "image/svg+xml"}
                ]}));
            })
            .await;

        let result = client_for(&server)
            .search_files("logo", None, Some(FileTypeFilter::Image), 10)
            .await;

        mock.assert_async().await;
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["query"], json!("logo"));
        assert_eq!(value["count"], json!(1));
        assert_eq!(value["results"][0]["mime_type"], json!("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_rename_file() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/drive/v3/files/file-1")
                    .json_body(json!({"name": "final-logo.png"}));
                then.status(200)
                    .json_body(json!({"id": "file-1", "name": "final-logo.png"}));
            })
            .await;

        let result = client_for(&server)
            .rename_file("file-1", "final-logo.png")
            .await;

        mock.assert_async().await;
        assert_eq!(result.data.unwrap().name, "final-logo.png");
    }

    #[tokio::test]
    async fn test_delete_file_trash_and_permanent() {
        let server = MockServer::start_async().await;
        let trash = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/drive/v3/files/file-1")
                    .json_body(json!({"trashed": true}));
                then.status(200).json_body(json!({"id": "file-1"}));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/drive/v3/files/file-2");
                then.status(204);
            })
            .await;

        let client = client_for(&server);
        let trashed = client.delete_file("file-1", false).await;
        let deleted = client.delete_file("file-2", true).await;

        trash.assert_async().await;
        delete.assert_async().await;
        assert_eq!(trashed.data.unwrap().action, DeleteAction::Trashed);
        assert_eq!(deleted.data.unwrap().action, DeleteAction::Deleted);
    }

    #[tokio::test]
    async fn test_recent_files() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/drive/v3/files")
                    .query_param("pageSize", "20")
                    .query_param("orderBy", "modifiedTime desc");
                then.status(200).json_body(json!({"files": [
                    {"id": "r1", "name": "notes.txt", "mimeType": "text/plain",
                     "modifiedTime": "2026-10-17T09:00:00Z"}
                ]}));
            })
            .await;

        let result = client_for(&server).get_recent_files(None, 7, 20).await;

        mock.assert_async().await;
        let recent = result.data.unwrap();
        assert_eq!(recent.days, 7);
        assert_eq!(recent.count, 1);
        assert_eq!(recent.results[0].modified, "2026-10-17T09:00:00Z");
    }

    #[test]
    fn test_multipart_related_body_layout() {
        let body = multipart_related_body("b", "{\"name\":\"a\"}", "text/plain", b"hi");
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "--b\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"name\":\"a\"}\r\n--b\r\nContent-Type: text/plain\r\n\r\nhi\r\n--b--"
        );
    }
}
