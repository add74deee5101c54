//! Shared doubles for service tests.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, NewProject, NewUser, Password, PasswordHash, ProjectStatus, ProjectTitle, Slug, User,
    UserChanges, UserCredentials, UserFilter, UserId, UserName, UserRole,
};

/// Reversible "hash" so tests stay fast and deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain:{}", password.expose())))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str().strip_prefix("plain:") == Some(password)
    }
}

pub(crate) fn new_user(email: &str, name: &str) -> NewUser {
    NewUser {
        email: Email::new(email).expect("fixture email"),
        name: UserName::new(name).expect("fixture name"),
        password: Password::new("correct horse").expect("fixture password"),
        role: UserRole::default(),
        avatar: None,
    }
}

pub(crate) fn new_project(title: &str, slug: &str) -> NewProject {
    NewProject {
        title: ProjectTitle::new(title).expect("fixture title"),
        slug: Slug::new(slug).expect("fixture slug"),
        summary: format!("{title} summary"),
        content: String::new(),
        status: ProjectStatus::Draft,
        featured: false,
        cover_image: None,
        tags: Vec::new(),
    }
}

/// Repository whose every call fails with the configured error.
#[derive(Debug, Clone)]
pub(crate) struct FailingUserRepository(pub UserPersistenceError);

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn list(
        &self,
        _filter: &UserFilter,
        _page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn count(&self, _filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn find_credentials_by_email(
        &self,
        _email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn insert(
        &self,
        _user: &NewUser,
        _password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn update(
        &self,
        _id: &UserId,
        _changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        Err(self.0.clone())
    }

    async fn delete(&self, _id: &UserId) -> Result<bool, UserPersistenceError> {
        Err(self.0.clone())
    }
}
