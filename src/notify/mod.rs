//! Notifier
//!
//! The entry point for request handlers that complete a durable action
//! (welcome, like, follow, comment, reply, share, admin push). Every call
//! commits the notification record first, then tries a live push (welcome
//! records are only written). A failed write is returned to the handler and
//! nothing is pushed; a push to an offline user is skipped and the record
//! stays for later.
//!
//! The write runs on a blocking task and no router lock is held while it
//! runs.

use std::sync::Arc;

use tracing::{error, warn};

use crate::hub::event;
use crate::hub::Router;
use crate::notifications::{NotificationKind, NotificationRecord, NotificationStore};
use crate::utils::Result;

/// Comment excerpts in notification messages are cut to this many chars.
const COMMENT_EXCERPT_CHARS: usize = 50;

/// What happened to one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The actor acted on their own content; nothing written or pushed.
    SelfAction,
    /// Record written, recipient offline.
    Stored,
    /// Record written and pushed to the recipient's connection.
    Pushed,
}

pub struct Notifier<S> {
    store: Arc<S>,
    router: Arc<Router>,
}

impl<S> Clone for Notifier<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            router: Arc::clone(&self.router),
        }
    }
}

impl<S: NotificationStore> Notifier<S> {
    pub fn new(store: Arc<S>, router: Arc<Router>) -> Self {
        Self { store, router }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Writes `record` to `recipient`'s list, then pushes it as `event_name`.
    pub async fn deliver(
        &self,
        recipient: &str,
        record: NotificationRecord,
        event_name: &str,
    ) -> Result<Delivery> {
        if record.source_user_id.as_deref() == Some(recipient) {
            return Ok(Delivery::SelfAction);
        }

        self.write(recipient, &record).await?;

        let payload = match serde_json::to_value(&record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(user = %recipient, "notification stored but not pushed: {e}");
                return Ok(Delivery::Stored);
            }
        };

        if self.router.push_to_user(recipient, event_name, payload) {
            Ok(Delivery::Pushed)
        } else {
            Ok(Delivery::Stored)
        }
    }

    /// Greets a freshly registered account. Only the record is written; a
    /// new account has no live connection to push to.
    pub async fn welcomed(&self, user_id: &str, app_name: &str) -> Result<Delivery> {
        let record = NotificationRecord::new(
            NotificationKind::Welcome,
            format!("Welcome to {app_name}!"),
        );
        self.write(user_id, &record).await?;
        Ok(Delivery::Stored)
    }

    pub async fn post_liked(
        &self,
        owner: &str,
        actor_id: &str,
        actor_name: &str,
        post_id: &str,
    ) -> Result<Delivery> {
        let record = NotificationRecord::new(
            NotificationKind::Like,
            format!("{actor_name} liked your post"),
        )
        .from_user(actor_id)
        .about(post_id);
        self.deliver(owner, record, event::NEW_LIKE).await
    }

    pub async fn user_followed(
        &self,
        target: &str,
        actor_id: &str,
        actor_name: &str,
    ) -> Result<Delivery> {
        let record = NotificationRecord::new(
            NotificationKind::Follow,
            format!("{actor_name} started following you"),
        )
        .from_user(actor_id);
        self.deliver(target, record, event::NEW_FOLLOWER).await
    }

    pub async fn post_commented(
        &self,
        owner: &str,
        actor_id: &str,
        actor_name: &str,
        post_id: &str,
        text: &str,
    ) -> Result<Delivery> {
        let excerpt: String = text.chars().take(COMMENT_EXCERPT_CHARS).collect();
        let record = NotificationRecord::new(
            NotificationKind::Comment,
            format!("{actor_name} commented on your post: \"{excerpt}...\""),
        )
        .from_user(actor_id)
        .about(post_id);
        self.deliver(owner, record, event::NEW_COMMENT).await
    }

    pub async fn comment_replied(
        &self,
        comment_author: &str,
        actor_id: &str,
        actor_name: &str,
        post_id: &str,
        comment_id: &str,
    ) -> Result<Delivery> {
        let record = NotificationRecord::new(
            NotificationKind::Reply,
            format!("{actor_name} replied to your comment"),
        )
        .from_user(actor_id)
        .about(post_id)
        .on_comment(comment_id);
        self.deliver(comment_author, record, event::NEW_REPLY).await
    }

    pub async fn post_shared(
        &self,
        owner: &str,
        actor_id: &str,
        actor_name: &str,
        post_id: &str,
    ) -> Result<Delivery> {
        let record = NotificationRecord::new(
            NotificationKind::Share,
            format!("{actor_name} shared your post"),
        )
        .from_user(actor_id)
        .about(post_id);
        self.deliver(owner, record, event::NEW_SHARE).await
    }

    /// Admin push to a single user. Callers check admin rights first.
    pub async fn admin_push(&self, user_id: &str, title: &str, message: &str) -> Result<Delivery> {
        let record = NotificationRecord::new(
            NotificationKind::AdminBroadcast,
            format!("{title}: {message}"),
        );
        self.deliver(user_id, record, event::ADMIN_BROADCAST).await
    }

    /// Appends `record` on a blocking task. Errors are logged and returned.
    async fn write(&self, recipient: &str, record: &NotificationRecord) -> Result<()> {
        let store = Arc::clone(&self.store);
        let user_id = recipient.to_string();
        let to_store = record.clone();
        let written =
            match tokio::task::spawn_blocking(move || store.append(&user_id, &to_store)).await {
                Ok(res) => res,
                Err(join_err) => Err(join_err.into()),
            };
        if let Err(e) = &written {
            error!(user = %recipient, kind = ?record.kind, "failed to store notification: {e}");
        }
        written
    }
}
