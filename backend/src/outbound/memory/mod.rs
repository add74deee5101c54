//! In-memory adapters for the persistence ports.
//!
//! Back the server when no database is configured and give service tests a
//! real repository without I/O. Rows live in insertion order; listings walk
//! them newest first.

mod projects;
mod settings;
mod users;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use projects::InMemoryProjectRepository;
pub use settings::InMemorySettingsRepository;
pub use users::InMemoryUserRepository;

fn lock<T>(rows: &Mutex<T>) -> MutexGuard<'_, T> {
    rows.lock().unwrap_or_else(PoisonError::into_inner)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page_window<T: Clone>(rows: impl Iterator<Item = T>, page: pagination::PageRequest) -> Vec<T> {
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    rows.skip(skip).take(take).collect()
}
