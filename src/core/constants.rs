//! Constants for the LLM and Google Workspace integrations
//!
//! String identifiers, default endpoints and fixed names used throughout the
//! application.

/// Anthropic Messages API constants
pub mod anthropic {
    /// Default API base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

    /// Value sent in the `anthropic-version` header
    pub const API_VERSION: &str = "2023-06-01";

    /// Default completion model
    pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

    /// Default `max_tokens` for a completion
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;
}

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";
}

/// Google API endpoints and identifiers
pub mod google {
    /// Drive v3 metadata endpoint
    pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

    /// Drive v3 media upload endpoint
    pub const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3";

    /// Docs v1 endpoint
    pub const DOCS_BASE_URL: &str = "https://docs.googleapis.com/v1";

    /// Gmail v1 endpoint
    pub const GMAIL_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

    /// Prefix of the browser edit link for a Google Doc
    pub const DOCS_EDIT_URL: &str = "https://docs.google.com/document/d";

    /// MIME type Drive uses for folders
    pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
}

/// Project scaffolding
pub mod project {
    /// Subfolders created under every new project folder, in creation order
    pub const SUBFOLDERS: [&str; 6] = [
        "01_Strategy",
        "02_Design",
        "03_Content",
        "04_Assets",
        "05_Deliverables",
        "06_Client_Feedback",
    ];
}

/// Integration status labels reported by the status endpoint and banner
pub mod status {
    pub const CONFIGURED: &str = "✅ Configured";
    pub const MISSING: &str = "❌ Missing";
    pub const OPTIONAL: &str = "⚠️  Optional";
}
