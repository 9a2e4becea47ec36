//! sled-backed notification store
//!
//! Each user gets a tree named `notifications/<user id>`. Keys are
//! big-endian ids from `Db::generate_id`, which only grow, so iterating a
//! tree yields records in the order they were appended.

use std::path::Path;

use sled::{Db, Tree};
use tracing::debug;

use crate::notifications::{NotificationRecord, NotificationStore};
use crate::utils::Result;

const TREE_PREFIX: &str = "notifications/";

#[derive(Clone)]
pub struct SledNotificationStore {
    db: Db,
}

impl SledNotificationStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn tree(&self, user_id: &str) -> Result<Tree> {
        Ok(self.db.open_tree(format!("{TREE_PREFIX}{user_id}"))?)
    }
}

/// Key and decoded record of every entry, in key order.
fn read_entries(tree: &Tree) -> Result<Vec<(sled::IVec, NotificationRecord)>> {
    let mut entries = Vec::new();
    for item in tree.iter() {
        let (key, value) = item?;
        entries.push((key, serde_json::from_slice(&value)?));
    }
    Ok(entries)
}

fn selected(record: &NotificationRecord, ids: Option<&[String]>) -> bool {
    ids.is_none_or(|ids| ids.iter().any(|id| *id == record.id))
}

impl NotificationStore for SledNotificationStore {
    fn append(&self, user_id: &str, record: &NotificationRecord) -> Result<()> {
        let tree = self.tree(user_id)?;
        let key = self.db.generate_id()?;
        let serialized = serde_json::to_vec(record)?;
        tree.insert(key.to_be_bytes(), serialized)?;
        debug!(user = %user_id, id = %record.id, "notification appended");
        Ok(())
    }

    fn list(&self, user_id: &str) -> Result<Vec<NotificationRecord>> {
        let tree = self.tree(user_id)?;
        Ok(read_entries(&tree)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    fn mark_read(&self, user_id: &str, ids: Option<&[String]>) -> Result<usize> {
        let tree = self.tree(user_id)?;
        let mut changed = 0;
        for (key, mut record) in read_entries(&tree)? {
            if record.read || !selected(&record, ids) {
                continue;
            }
            record.read = true;
            tree.insert(key, serde_json::to_vec(&record)?)?;
            changed += 1;
        }
        Ok(changed)
    }

    fn delete(&self, user_id: &str, ids: Option<&[String]>) -> Result<usize> {
        let tree = self.tree(user_id)?;
        if ids.is_none() {
            let removed = tree.len();
            tree.clear()?;
            return Ok(removed);
        }

        let mut removed = 0;
        for (key, record) in read_entries(&tree)? {
            if selected(&record, ids) {
                tree.remove(key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for SledNotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledNotificationStore")
            .field("db", &"sled::Db")
            .finish()
    }
}
