//! The `notifications` module stores durable, per-user notification records.
//!
//! Records are written independently of live delivery: a record exists
//! whether or not its recipient was online when it was created. Lists are
//! append-only apart from the `read` flag and deletions requested by the
//! owner, and they are always read back in append order.
//!
//! `SledNotificationStore` keeps one sled tree per user.

pub mod record;
pub mod sled_store;

pub use record::{NotificationKind, NotificationRecord};
pub use sled_store::SledNotificationStore;

use crate::utils::Result;

/// Storage seam for notification records.
///
/// The methods are synchronous and may block on disk I/O; async callers run
/// them on a blocking task.
pub trait NotificationStore: Send + Sync + 'static {
    fn append(&self, user_id: &str, record: &NotificationRecord) -> Result<()>;

    /// All records of a user in append order.
    fn list(&self, user_id: &str) -> Result<Vec<NotificationRecord>>;

    fn unread_count(&self, user_id: &str) -> Result<usize> {
        Ok(self.list(user_id)?.iter().filter(|r| !r.read).count())
    }

    /// Sets the read flag on `ids`, or on every record when `ids` is `None`.
    /// Returns how many records changed.
    fn mark_read(&self, user_id: &str, ids: Option<&[String]>) -> Result<usize>;

    /// Removes `ids`, or the whole list when `ids` is `None`. Returns how
    /// many records were removed.
    fn delete(&self, user_id: &str, ids: Option<&[String]>) -> Result<usize>;
}

#[cfg(test)]
mod tests;
