//! In-memory project repository.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;

use super::{contains_ignore_case, lock, page_window};
use crate::domain::ports::{ProjectPersistenceError, ProjectRepository};
use crate::domain::{NewProject, Project, ProjectChanges, ProjectFilter, ProjectId, Slug};

/// Project repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    rows: Mutex<Vec<Project>>,
}

fn matches(filter: &ProjectFilter, project: &Project) -> bool {
    filter.status.is_none_or(|status| project.status == status)
        && filter.featured.is_none_or(|featured| project.featured == featured)
        && filter.search.as_deref().is_none_or(|term| {
            contains_ignore_case(project.title.as_ref(), term)
                || contains_ignore_case(&project.summary, term)
        })
}

fn apply(project: &mut Project, changes: &ProjectChanges) {
    let ProjectChanges {
        title,
        slug,
        summary,
        content,
        status,
        featured,
        cover_image,
        tags,
    } = changes.clone();
    if let Some(title) = title {
        project.title = title;
    }
    if let Some(slug) = slug {
        project.slug = slug;
    }
    if let Some(summary) = summary {
        project.summary = summary;
    }
    if let Some(content) = content {
        project.content = content;
    }
    if let Some(status) = status {
        project.status = status;
    }
    if let Some(featured) = featured {
        project.featured = featured;
    }
    if let Some(cover_image) = cover_image {
        project.cover_image = Some(cover_image);
    }
    if let Some(tags) = tags {
        project.tags = tags;
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> Result<Vec<Project>, ProjectPersistenceError> {
        let rows = lock(&self.rows);
        let matching = rows.iter().rev().filter(|project| matches(filter, project)).cloned();
        Ok(page_window(matching, page))
    }

    async fn count(&self, filter: &ProjectFilter) -> Result<u64, ProjectPersistenceError> {
        let rows = lock(&self.rows);
        Ok(rows.iter().filter(|project| matches(filter, project)).count() as u64)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        Ok(lock(&self.rows).iter().find(|project| project.id == *id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Project>, ProjectPersistenceError> {
        Ok(lock(&self.rows)
            .iter()
            .find(|project| project.slug == *slug)
            .cloned())
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectPersistenceError> {
        let mut rows = lock(&self.rows);
        if rows.iter().any(|existing| existing.slug == project.slug) {
            return Err(ProjectPersistenceError::duplicate("slug"));
        }
        let now = Utc::now();
        let NewProject {
            title,
            slug,
            summary,
            content,
            status,
            featured,
            cover_image,
            tags,
        } = project.clone();
        let stored = Project {
            id: ProjectId::random(),
            title,
            slug,
            summary,
            content,
            status,
            featured,
            cover_image,
            tags,
            created_at: now,
            updated_at: now,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, ProjectPersistenceError> {
        let mut rows = lock(&self.rows);
        let slug_clash = changes
            .slug
            .as_ref()
            .is_some_and(|slug| rows.iter().any(|other| other.id != *id && other.slug == *slug));
        if slug_clash {
            return Err(ProjectPersistenceError::duplicate("slug"));
        }
        let Some(project) = rows.iter_mut().find(|project| project.id == *id) else {
            return Ok(None);
        };
        apply(project, changes);
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, ProjectPersistenceError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|project| project.id != *id);
        Ok(rows.len() != before)
    }
}
