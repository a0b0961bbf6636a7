//! Clients for third-party services

pub mod google_workspace;

pub use google_workspace::GoogleWorkspaceClient;
