//! In-memory user repository.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;

use super::{contains_ignore_case, lock, page_window};
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordHash, User, UserChanges, UserCredentials, UserFilter, UserId,
};

/// User repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<UserCredentials>>,
}

fn matches(filter: &UserFilter, user: &User) -> bool {
    let role_ok = filter.role.is_none_or(|role| user.role == role);
    let search_ok = filter.search.as_deref().is_none_or(|term| {
        contains_ignore_case(user.email.as_ref(), term) || contains_ignore_case(user.name.as_ref(), term)
    });
    role_ok && search_ok
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let rows = lock(&self.rows);
        let matching = rows
            .iter()
            .rev()
            .map(|row| &row.user)
            .filter(|user| matches(filter, user))
            .cloned();
        Ok(page_window(matching, page))
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let rows = lock(&self.rows);
        let total = rows.iter().filter(|row| matches(filter, &row.user)).count();
        Ok(total as u64)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let rows = lock(&self.rows);
        Ok(rows
            .iter()
            .find(|row| row.user.id == *id)
            .map(|row| row.user.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let rows = lock(&self.rows);
        Ok(rows
            .iter()
            .find(|row| row.user.email == *email)
            .map(|row| row.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let rows = lock(&self.rows);
        Ok(rows.iter().find(|row| row.user.email == *email).cloned())
    }

    async fn insert(
        &self,
        user: &NewUser,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        if rows.iter().any(|row| row.user.email == user.email) {
            return Err(UserPersistenceError::duplicate("email"));
        }
        let now = Utc::now();
        let stored = User {
            id: UserId::random(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.push(UserCredentials {
            user: stored.clone(),
            password_hash: password_hash.clone(),
        });
        Ok(stored)
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows.iter_mut().find(|row| row.user.id == *id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.user.name = name.clone();
        }
        if let Some(role) = changes.role {
            row.user.role = role;
        }
        if let Some(avatar) = &changes.avatar {
            row.user.avatar = Some(avatar.clone());
        }
        row.user.updated_at = Utc::now();
        Ok(Some(row.user.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|row| row.user.id != *id);
        Ok(rows.len() != before)
    }
}
