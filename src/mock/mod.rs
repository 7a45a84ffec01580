//! In-memory collaborators for tests
//!
//! - `MockStore`: records copies, serves configured bucket listings
//! - `MockCatalog`: records collection creations and uploads
//!
//! Both accept injected failures matched by substring of the call subject
//! (source path for copies, asset id for uploads, bucket for listings).

mod catalog;
mod failure;
mod store;

pub use catalog::MockCatalog;
pub use failure::{FailureConfig, FailureInjector, FailureMode};
pub use store::{CopyCall, MockStore};

use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
