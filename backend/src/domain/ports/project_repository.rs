//! Port abstraction for project persistence adapters.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{NewProject, Project, ProjectChanges, ProjectFilter, ProjectId, Slug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { message: String } => "project repository rejected duplicate: {message}",
    }
}

/// Storage for portfolio projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Projects matching `filter`, newest first, limited to `page`.
    async fn list(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> Result<Vec<Project>, ProjectPersistenceError>;

    /// Number of projects matching `filter`, ignoring pagination.
    async fn count(&self, filter: &ProjectFilter) -> Result<u64, ProjectPersistenceError>;

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError>;

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Project>, ProjectPersistenceError>;

    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectPersistenceError>;

    /// Apply `changes` and return the updated project, or `None` when absent.
    async fn update(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, ProjectPersistenceError>;

    /// Remove a project. Returns whether a row was deleted.
    async fn delete(&self, id: &ProjectId) -> Result<bool, ProjectPersistenceError>;
}
