//! # Notification Emitter
//!
//! Fire-and-forget toast queue: ordered, auto-expiring user feedback emitted
//! by state-changing commands. Pure UI feedback; no storefront logic reads
//! toast state back.
//!
//! ## Behavior
//! - `show` appends a toast with a generated unique id; insertion order is
//!   display order, and several toasts may be visible at once
//! - toasts expire [`TOAST_TTL`] after creation; expiry is applied lazily
//!   whenever the queue is read (the session is single-actor, so nothing can
//!   observe a toast between reads)
//! - `remove` dismisses a toast early (user click)

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Toast severity/kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A visible toast, as the UI shell renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

struct Entry {
    toast: Toast,
    created_at: Instant,
}

/// The toast queue. Cheap to clone; all clones share one queue.
#[derive(Clone)]
pub struct Notifier {
    entries: Arc<Mutex<Vec<Entry>>>,
    ttl: Duration,
}

impl Notifier {
    /// Creates a notifier with the standard display duration.
    pub fn new() -> Self {
        Notifier::with_ttl(TOAST_TTL)
    }

    /// Creates a notifier with a custom display duration (tests).
    pub fn with_ttl(ttl: Duration) -> Self {
        Notifier {
            entries: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    /// Appends a toast and returns its generated id.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> String {
        let id = Uuid::new_v4().to_string();
        let toast = Toast {
            id: id.clone(),
            message: message.into(),
            kind,
        };

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(Entry {
            toast,
            created_at: Instant::now(),
        });
        id
    }

    /// Dismisses a toast early. Returns whether it was still visible.
    pub fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|e| e.toast.id != id);
        entries.len() != before
    }

    /// Returns the currently visible toasts, oldest first, dropping any
    /// whose display duration has elapsed.
    pub fn visible(&self) -> Vec<Toast> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let ttl = self.ttl;
        entries.retain(|e| e.created_at.elapsed() < ttl);
        entries.iter().map(|e| e.toast.clone()).collect()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier::new()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("ttl", &self.ttl).finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_display_in_insertion_order() {
        let notifier = Notifier::new();
        notifier.show("first", ToastKind::Success);
        notifier.show("second", ToastKind::Info);
        notifier.show("third", ToastKind::Error);

        let visible = notifier.visible();
        let messages: Vec<&str> = visible.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let notifier = Notifier::new();
        let a = notifier.show("a", ToastKind::Success);
        let b = notifier.show("b", ToastKind::Success);
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_dismisses_early() {
        let notifier = Notifier::new();
        let id = notifier.show("dismiss me", ToastKind::Info);

        assert!(notifier.remove(&id));
        assert!(notifier.visible().is_empty());
        // Second removal is a no-op
        assert!(!notifier.remove(&id));
    }

    #[test]
    fn test_expired_toasts_are_dropped() {
        let notifier = Notifier::with_ttl(Duration::ZERO);
        notifier.show("gone", ToastKind::Success);
        assert!(notifier.visible().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let notifier = Notifier::new();
        notifier.show("Order placed successfully!", ToastKind::Success);
        let json = serde_json::to_value(notifier.visible()).unwrap();
        assert_eq!(json[0]["message"], "Order placed successfully!");
        assert_eq!(json[0]["type"], "success");
    }
}
