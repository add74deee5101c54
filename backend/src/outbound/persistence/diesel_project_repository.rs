//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::warn;

use crate::domain::ports::{ProjectPersistenceError, ProjectRepository};
use crate::domain::{
    NewProject, Project, ProjectChanges, ProjectFilter, ProjectId, ProjectStatus, ProjectTitle,
    Slug,
};

use super::diesel_helpers::{
    contains_pattern, count_to_u64, limit_offset, map_diesel_error, map_pool_error,
};
use super::models::{NewProjectRow, ProjectRow, ProjectUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::projects;

/// Diesel-backed project storage.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ProjectPersistenceError {
    map_pool_error(error, ProjectPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ProjectPersistenceError {
    map_diesel_error(
        error,
        ProjectPersistenceError::query,
        ProjectPersistenceError::connection,
        ProjectPersistenceError::duplicate,
    )
}

fn filtered<'a, ST>(
    mut query: projects::BoxedQuery<'a, Pg, ST>,
    filter: &ProjectFilter,
) -> projects::BoxedQuery<'a, Pg, ST> {
    if let Some(status) = filter.status {
        query = query.filter(projects::status.eq(status.as_str()));
    }
    if let Some(featured) = filter.featured {
        query = query.filter(projects::featured.eq(featured));
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            projects::title
                .ilike(pattern.clone())
                .or(projects::summary.ilike(pattern)),
        );
    }
    query
}

fn row_to_project(row: ProjectRow) -> Result<Project, ProjectPersistenceError> {
    let title = ProjectTitle::new(&row.title).map_err(|err| {
        warn!(project_id = %row.id, %err, "stored project title failed validation");
        ProjectPersistenceError::query("stored project has invalid title")
    })?;
    let slug = Slug::new(&row.slug).map_err(|err| {
        warn!(project_id = %row.id, %err, "stored project slug failed validation");
        ProjectPersistenceError::query("stored project has invalid slug")
    })?;
    let status = row.status.parse().unwrap_or_else(|_| {
        warn!(project_id = %row.id, status = %row.status, "unrecognised status, treating as draft");
        ProjectStatus::Draft
    });
    Ok(Project {
        id: ProjectId::from_uuid(row.id),
        title,
        slug,
        summary: row.summary,
        content: row.content,
        status,
        featured: row.featured,
        cover_image: row.cover_image,
        tags: row.tags,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn list(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> Result<Vec<Project>, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = limit_offset(page);
        let rows: Vec<ProjectRow> =
            filtered(projects::table.select(ProjectRow::as_select()).into_boxed(), filter)
                .order((projects::created_at.desc(), projects::id.desc()))
                .limit(limit)
                .offset(offset)
                .load(&mut conn)
                .await
                .map_err(diesel_error)?;
        rows.into_iter().map(row_to_project).collect()
    }

    async fn count(&self, filter: &ProjectFilter) -> Result<u64, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 =
            filtered(projects::table.select(diesel::dsl::count_star()).into_boxed(), filter)
                .get_result(&mut conn)
                .await
                .map_err(diesel_error)?;
        Ok(count_to_u64(total))
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ProjectRow> = projects::table
            .filter(projects::id.eq(id.as_uuid()))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_project).transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Project>, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ProjectRow> = projects::table
            .filter(projects::slug.eq(slug.as_ref()))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_project).transpose()
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewProjectRow {
            id: *ProjectId::random().as_uuid(),
            title: project.title.as_ref(),
            slug: project.slug.as_ref(),
            summary: &project.summary,
            content: &project.content,
            status: project.status.as_str(),
            featured: project.featured,
            cover_image: project.cover_image.as_deref(),
            tags: &project.tags,
        };
        let stored: ProjectRow = diesel::insert_into(projects::table)
            .values(&row)
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_project(stored)
    }

    async fn update(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = ProjectUpdate {
            title: changes.title.as_ref().map(AsRef::as_ref),
            slug: changes.slug.as_ref().map(AsRef::as_ref),
            summary: changes.summary.as_deref(),
            content: changes.content.as_deref(),
            status: changes.status.map(ProjectStatus::as_str),
            featured: changes.featured,
            cover_image: changes.cover_image.as_deref(),
            tags: changes.tags.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<ProjectRow> =
            diesel::update(projects::table.filter(projects::id.eq(id.as_uuid())))
                .set(&update)
                .returning(ProjectRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(diesel_error)?;
        row.map(row_to_project).transpose()
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(projects::table.filter(projects::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(slug: &str, status: &str) -> ProjectRow {
        let at = DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp");
        ProjectRow {
            id: Uuid::new_v4(),
            title: "Rust CLI".to_owned(),
            slug: slug.to_owned(),
            summary: String::new(),
            content: String::new(),
            status: status.to_owned(),
            featured: true,
            cover_image: None,
            tags: vec!["rust".to_owned()],
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    #[case("published", ProjectStatus::Published)]
    #[case("draft", ProjectStatus::Draft)]
    #[case("archived", ProjectStatus::Draft)]
    fn status_is_read_leniently(#[case] raw: &str, #[case] expected: ProjectStatus) {
        let project = row_to_project(row("rust-cli", raw)).expect("valid row");
        assert_eq!(project.status, expected);
        assert_eq!(project.tags, vec!["rust".to_owned()]);
    }

    #[rstest]
    fn corrupt_slug_is_a_query_error() {
        let err = row_to_project(row("Not A Slug", "draft")).expect_err("bad slug");
        assert_eq!(
            err,
            ProjectPersistenceError::query("stored project has invalid slug")
        );
    }
}
