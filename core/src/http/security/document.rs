//! Document service contract.
//!
//! Documents are owned by the backend document service. The access layer
//! never mutates them; it only decides which calls a user may trigger and
//! which listing filter applies.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::http::security::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Stored,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: u64,
    pub title: String,
    pub status: DocumentStatus,
    pub workspace: Workspace,
    pub created_by: String,
    pub file_name: String,
    /// Unix epoch milliseconds.
    pub created_at: u64,
}

/// Listing filter handed to [`DocumentService::list_documents`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub workspace: Workspace,
    /// Only documents created by this user id; `None` lists everything.
    pub created_by: Option<String>,
    pub status: Option<DocumentStatus>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl DocumentQuery {
    pub const DEFAULT_PER_PAGE: usize = 20;
    pub const MAX_PER_PAGE: usize = 100;

    pub fn new(workspace: Workspace) -> Self {
        DocumentQuery {
            workspace,
            created_by: None,
            status: None,
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }

    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }

    pub fn status(mut self, status: Option<DocumentStatus>) -> Self {
        self.status = status;
        self
    }

    /// Sets the page, clamping to `page >= 1` and `1 <= per_page <= MAX_PER_PAGE`.
    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, Self::MAX_PER_PAGE);
        self
    }

    fn matches(&self, document: &Document) -> bool {
        document.workspace == self.workspace
            && self
                .created_by
                .as_deref()
                .map_or(true, |owner| owner == document.created_by)
            && self.status.map_or(true, |status| status == document.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub items: Vec<Document>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Upload request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub title: String,
    pub file_name: String,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DocumentError {
    #[display("document {_0} not found")]
    NotFound(#[error(not(source))] u64),
    #[display("document {id} does not belong to workspace {workspace}")]
    WrongWorkspace { id: u64, workspace: Workspace },
    #[display("document {_0} is already archived")]
    AlreadyArchived(#[error(not(source))] u64),
    #[display("document service unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}

/// Backend document operations used by the dashboards.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_documents(&self, query: &DocumentQuery) -> Result<DocumentPage, DocumentError>;

    async fn upload_document(
        &self,
        workspace: Workspace,
        created_by: &str,
        document: NewDocument,
    ) -> Result<Document, DocumentError>;

    async fn archive_document(&self, workspace: Workspace, id: u64) -> Result<Document, DocumentError>;
}

/// In-memory document service for development and tests.
///
/// Listings are returned newest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentService {
    documents: Arc<RwLock<BTreeMap<u64, Document>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document (builder pattern).
    pub fn with_document(
        self,
        workspace: Workspace,
        created_by: &str,
        title: &str,
        status: DocumentStatus,
    ) -> Self {
        self.insert(Document {
            id: 0,
            title: title.to_string(),
            status,
            workspace,
            created_by: created_by.to_string(),
            file_name: format!("{}.pdf", title.to_lowercase().replace(' ', "_")),
            created_at: now_millis(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: u64) -> Option<Document> {
        self.read().get(&id).cloned()
    }

    fn insert(&self, mut document: Document) -> Document {
        document.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.write().insert(document.id, document.clone());
        document
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<u64, Document>> {
        self.documents.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<u64, Document>> {
        self.documents.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentService for InMemoryDocumentService {
    async fn list_documents(&self, query: &DocumentQuery) -> Result<DocumentPage, DocumentError> {
        let documents = self.read();
        let matching: Vec<&Document> = documents.values().rev().filter(|d| query.matches(d)).collect();
        let items = matching
            .iter()
            .skip((query.page - 1).saturating_mul(query.per_page))
            .take(query.per_page)
            .map(|d| (*d).clone())
            .collect();

        Ok(DocumentPage {
            items,
            total: matching.len(),
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn upload_document(
        &self,
        workspace: Workspace,
        created_by: &str,
        document: NewDocument,
    ) -> Result<Document, DocumentError> {
        let status = if document.draft {
            DocumentStatus::Draft
        } else {
            DocumentStatus::Stored
        };
        Ok(self.insert(Document {
            id: 0,
            title: document.title,
            status,
            workspace,
            created_by: created_by.to_string(),
            file_name: document.file_name,
            created_at: now_millis(),
        }))
    }

    async fn archive_document(&self, workspace: Workspace, id: u64) -> Result<Document, DocumentError> {
        let mut documents = self.write();
        let document = documents.get_mut(&id).ok_or(DocumentError::NotFound(id))?;
        if document.workspace != workspace {
            return Err(DocumentError::WrongWorkspace { id, workspace });
        }
        if document.status == DocumentStatus::Archived {
            return Err(DocumentError::AlreadyArchived(id));
        }
        document.status = DocumentStatus::Archived;
        Ok(document.clone())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
