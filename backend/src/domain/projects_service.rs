//! CRUD use-cases for portfolio projects.

use std::sync::Arc;

use pagination::Paginated;
use tracing::info;

use crate::domain::ports::{ProjectPersistenceError, ProjectRepository};
use crate::domain::{
    Error, NewProject, Project, ProjectChanges, ProjectId, ProjectListQuery, Slug,
};

const PROJECT_NOT_FOUND: &str = "Project not found";
const SLUG_TAKEN: &str = "Slug already exists";

/// Project service.
#[derive(Clone)]
pub struct ProjectsService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectsService {
    #[must_use]
    pub const fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    /// One page of projects, newest first, with the total across all pages.
    pub async fn find_all(&self, query: &ProjectListQuery) -> Result<Paginated<Project>, Error> {
        let (projects, total) = tokio::try_join!(
            self.repo.list(&query.filter, query.page),
            self.repo.count(&query.filter),
        )
        .map_err(map_persistence_error)?;
        Ok(Paginated::new(projects, query.page, total))
    }

    pub async fn find_by_id(&self, id: &ProjectId) -> Result<Project, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(PROJECT_NOT_FOUND))
    }

    pub async fn find_by_slug(&self, slug: &Slug) -> Result<Project, Error> {
        self.repo
            .find_by_slug(slug)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(PROJECT_NOT_FOUND))
    }

    /// Create a project with a slug no other project uses.
    pub async fn create(&self, project: &NewProject) -> Result<Project, Error> {
        self.ensure_slug_free(&project.slug, None).await?;
        let created = self
            .repo
            .insert(project)
            .await
            .map_err(map_persistence_error)?;
        info!(project_id = %created.id, slug = %created.slug, "project created");
        Ok(created)
    }

    /// Apply a partial update. A changed slug must stay unique.
    pub async fn update(&self, id: &ProjectId, changes: &ProjectChanges) -> Result<Project, Error> {
        let current = self.find_by_id(id).await?;
        if let Some(slug) = changes.slug.as_ref().filter(|slug| **slug != current.slug) {
            self.ensure_slug_free(slug, Some(id)).await?;
        }
        self.repo
            .update(id, changes)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(PROJECT_NOT_FOUND))
    }

    pub async fn delete(&self, id: &ProjectId) -> Result<(), Error> {
        self.find_by_id(id).await?;
        if !self.repo.delete(id).await.map_err(map_persistence_error)? {
            return Err(Error::not_found(PROJECT_NOT_FOUND));
        }
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &Slug, owner: Option<&ProjectId>) -> Result<(), Error> {
        let holder = self
            .repo
            .find_by_slug(slug)
            .await
            .map_err(map_persistence_error)?;
        match holder {
            Some(existing) if Some(&existing.id) != owner => Err(slug_taken()),
            _ => Ok(()),
        }
    }
}

fn map_persistence_error(error: ProjectPersistenceError) -> Error {
    match error {
        ProjectPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectPersistenceError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
        ProjectPersistenceError::Duplicate { .. } => slug_taken(),
    }
}

fn slug_taken() -> Error {
    Error::conflict(SLUG_TAKEN).with_field_error("slug", SLUG_TAKEN)
}

#[cfg(test)]
#[path = "projects_service_tests.rs"]
mod tests;
