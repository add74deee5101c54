//! Projects API handlers.
//!
//! Reads are public so the portfolio site can render without a session;
//! writes require one.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{Envelope, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::ApiResult;
use super::error::ErrorEnvelope;
use super::schemas::{AckSchema, EnvelopeSchema, PageEnvelopeSchema};
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldErrors, parse_project_id, parse_slug};
use crate::domain::{
    Error, NewProject, Project, ProjectChanges, ProjectFilter, ProjectListQuery, ProjectStatus,
    ProjectTitle, Slug,
};

/// Project as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: Uuid,
    #[schema(example = "Terminal dashboard")]
    pub title: String,
    #[schema(example = "terminal-dashboard")]
    pub slug: String,
    pub summary: String,
    pub content: String,
    #[schema(example = "published")]
    pub status: String,
    pub featured: bool,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectDto {
    fn from(project: Project) -> Self {
        Self {
            id: *project.id.as_uuid(),
            title: project.title.as_ref().to_owned(),
            slug: project.slug.to_string(),
            summary: project.summary,
            content: project.content,
            status: project.status.as_str().to_owned(),
            featured: project.featured,
            cover_image: project.cover_image,
            tags: project.tags,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Query string for `GET /api/projects`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `draft` or `published`.
    pub status: Option<String>,
    /// `true` or `false`; anything else is ignored.
    pub featured: Option<String>,
    /// Case-insensitive match against title or summary.
    pub q: Option<String>,
}

impl TryFrom<ProjectListParams> for ProjectListQuery {
    type Error = Error;

    fn try_from(params: ProjectListParams) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let status = errors.check_opt(
            params
                .status
                .as_deref()
                .filter(|status| !status.trim().is_empty())
                .map(str::parse::<ProjectStatus>),
        );
        if !errors.is_empty() {
            return Err(errors.into_error());
        }
        let featured = params
            .featured
            .as_deref()
            .and_then(|raw| raw.trim().parse::<bool>().ok());
        Ok(Self {
            page: PageRequest::parse(params.page.as_deref(), params.limit.as_deref()),
            filter: ProjectFilter::new(status, featured, params.q.as_deref()),
        })
    }
}

/// Body of `POST /api/projects`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    /// Defaults to `draft`.
    pub status: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TryFrom<CreateProjectRequest> for NewProject {
    type Error = Error;

    fn try_from(body: CreateProjectRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let title = errors.check(ProjectTitle::new(&body.title));
        let slug = errors.check(Slug::new(&body.slug));
        let status = errors.check_opt(body.status.as_deref().map(str::parse::<ProjectStatus>));

        match (title, slug) {
            (Some(title), Some(slug)) if errors.is_empty() => Ok(Self {
                title,
                slug,
                summary: body.summary,
                content: body.content,
                status: status.unwrap_or_default(),
                featured: body.featured,
                cover_image: body.cover_image,
                tags: body.tags,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

/// Body of `PUT /api/projects/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TryFrom<UpdateProjectRequest> for ProjectChanges {
    type Error = Error;

    fn try_from(body: UpdateProjectRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let title = errors.check_opt(body.title.as_deref().map(ProjectTitle::new));
        let slug = errors.check_opt(body.slug.as_deref().map(Slug::new));
        let status = errors.check_opt(body.status.as_deref().map(str::parse::<ProjectStatus>));
        if !errors.is_empty() {
            return Err(errors.into_error());
        }
        Ok(Self {
            title,
            slug,
            summary: body.summary,
            content: body.content,
            status,
            featured: body.featured,
            cover_image: body.cover_image,
            tags: body.tags,
        })
    }
}

/// List projects, newest first.
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectListParams),
    responses(
        (status = 200, description = "One page of projects", body = PageEnvelopeSchema<ProjectDto>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelope)
    ),
    tags = ["projects"],
    operation_id = "listProjects",
    security([])
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    params: web::Query<ProjectListParams>,
) -> ApiResult<web::Json<Envelope<Vec<ProjectDto>>>> {
    let query = ProjectListQuery::try_from(params.into_inner())?;
    let page = state.projects.find_all(&query).await?;
    Ok(web::Json(Envelope::page(
        "Projects fetched",
        page.map(ProjectDto::from),
    )))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Created", body = EnvelopeSchema<ProjectDto>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 409, description = "Slug already exists", body = ErrorEnvelope)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateProjectRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user(state.now())?;
    let project = NewProject::try_from(payload.into_inner())?;
    let created = state.projects.create(&project).await?;
    Ok(HttpResponse::Created().json(Envelope::ok(
        "Project created",
        ProjectDto::from(created),
    )))
}

/// Fetch a project by slug.
#[utoipa::path(
    get,
    path = "/api/projects/slug/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Project", body = EnvelopeSchema<ProjectDto>),
        (status = 400, description = "Malformed slug", body = ErrorEnvelope),
        (status = 404, description = "Project not found", body = ErrorEnvelope)
    ),
    tags = ["projects"],
    operation_id = "getProjectBySlug",
    security([])
)]
#[get("/projects/slug/{slug}")]
pub async fn get_project_by_slug(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<ProjectDto>>> {
    let slug = parse_slug(&path)?;
    let project = state.projects.find_by_slug(&slug).await?;
    Ok(web::Json(Envelope::ok("Project fetched", project.into())))
}

/// Fetch a project by id.
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = EnvelopeSchema<ProjectDto>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Project not found", body = ErrorEnvelope)
    ),
    tags = ["projects"],
    operation_id = "getProject",
    security([])
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<ProjectDto>>> {
    let id = parse_project_id(&path)?;
    let project = state.projects.find_by_id(&id).await?;
    Ok(web::Json(Envelope::ok("Project fetched", project.into())))
}

/// Partially update a project.
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = EnvelopeSchema<ProjectDto>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "Project not found", body = ErrorEnvelope),
        (status = 409, description = "Slug already exists", body = ErrorEnvelope)
    ),
    tags = ["projects"],
    operation_id = "updateProject"
)]
#[put("/projects/{id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateProjectRequest>,
) -> ApiResult<web::Json<Envelope<ProjectDto>>> {
    session.require_user(state.now())?;
    let id = parse_project_id(&path)?;
    let changes = ProjectChanges::try_from(payload.into_inner())?;
    let project = state.projects.update(&id, &changes).await?;
    Ok(web::Json(Envelope::ok("Project updated", project.into())))
}

/// Delete a project.
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Deleted", body = AckSchema),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "Project not found", body = ErrorEnvelope)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<()>>> {
    session.require_user(state.now())?;
    let id = parse_project_id(&path)?;
    state.projects.delete(&id).await?;
    Ok(web::Json(Envelope::acknowledged("Project deleted")))
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
