//! Portfolio projects.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use regex::Regex;
use uuid::Uuid;

use super::user::normalise_search;

/// Maximum length of a project title.
pub const TITLE_MAX: usize = 200;
/// Maximum length of a slug.
pub const SLUG_MAX: usize = 200;

/// Validation failures for project input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptySlug,
    SlugTooLong { max: usize },
    InvalidSlug,
    UnknownStatus(String),
}

impl ProjectValidationError {
    /// Request field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptySlug | Self::SlugTooLong { .. } | Self::InvalidSlug => "slug",
            Self::UnknownStatus(_) => "status",
        }
    }
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "project id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "Title is required"),
            Self::TitleTooLong { max } => write!(f, "Title must be at most {max} characters"),
            Self::EmptySlug => write!(f, "Slug is required"),
            Self::SlugTooLong { max } => write!(f, "Slug must be at most {max} characters"),
            Self::InvalidSlug => write!(
                f,
                "Slug may only contain lowercase letters, digits, and single hyphens"
            ),
            Self::UnknownStatus(status) => {
                write!(f, "Status must be draft or published (got {status})")
            }
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// Stable project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Parse a textual UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| ProjectValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new("^[a-z0-9]+(?:-[a-z0-9]+)*$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// URL-safe project handle, unique across projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug.
    pub fn new(slug: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let slug = slug.as_ref().trim();
        if slug.is_empty() {
            return Err(ProjectValidationError::EmptySlug);
        }
        if slug.len() > SLUG_MAX {
            return Err(ProjectValidationError::SlugTooLong { max: SLUG_MAX });
        }
        if !slug_regex().is_match(slug) {
            return Err(ProjectValidationError::InvalidSlug);
        }
        Ok(Self(slug.to_owned()))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty project title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTitle(String);

impl ProjectTitle {
    /// Validate and construct a title.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ProjectValidationError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(ProjectValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ProjectValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title.to_owned()))
    }
}

impl AsRef<str> for ProjectTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Publication state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    /// Visible only in the CMS.
    #[default]
    Draft,
    /// Visible on the public site.
    Published,
}

impl ProjectStatus {
    /// Lowercase wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ProjectValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(ProjectValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portfolio entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub title: ProjectTitle,
    pub slug: Slug,
    pub summary: String,
    /// Long-form body, usually Markdown.
    pub content: String,
    pub status: ProjectStatus,
    pub featured: bool,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: ProjectTitle,
    pub slug: Slug,
    pub summary: String,
    pub content: String,
    pub status: ProjectStatus,
    pub featured: bool,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub title: Option<ProjectTitle>,
    pub slug: Option<Slug>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Filters applied to both the list and the count query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    /// Case-insensitive substring matched against title or summary.
    pub search: Option<String>,
}

impl ProjectFilter {
    /// Build a filter, discarding a blank search term.
    #[must_use]
    pub fn new(status: Option<ProjectStatus>, featured: Option<bool>, search: Option<&str>) -> Self {
        Self {
            status,
            featured,
            search: normalise_search(search),
        }
    }
}

/// One page of projects under a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectListQuery {
    pub page: PageRequest,
    pub filter: ProjectFilter,
}
