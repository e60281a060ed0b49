//! # Response Envelopes
//!
//! The three body shapes this gateway speaks: `{objects, next, prev, total}`
//! for listings, `{message}` for mutations, and the error envelope in
//! [`crate::error`]. Also the lenient `?page=` query: a missing or
//! malformed page number degrades to page 0 rather than rejecting the
//! request.

use gantry_core::PageWindow;
use gantry_storage_client::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query parameters accepted by listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Zero-based page number.
    pub page: Option<String>,
}

impl PageQuery {
    /// The effective page number; absent or unparseable values become 0.
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageEnvelope {
    /// Canonical name strings for this page.
    pub objects: Vec<String>,
    /// Whether a further page exists.
    pub next: bool,
    /// Whether this page started past the first item.
    pub prev: bool,
    /// Total matching items, as counted by the storage service.
    pub total: u64,
}

impl PageEnvelope {
    /// Trim a storage window into a gateway page.
    ///
    /// The storage service returns up to one probe item past the page size;
    /// `next` is proven by its presence, `prev` by the window's offset, and
    /// `total` is relayed untouched.
    pub fn from_window(window: PageWindow, page: Page<String>) -> Self {
        let total = page.total;
        let (objects, next) = window.trim(page.objects);
        Self {
            objects,
            next,
            prev: window.has_prev(),
            total,
        }
    }
}

/// Plain confirmation body for mutations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    /// Human-readable outcome of the operation.
    pub message: String,
}

impl Message {
    /// Wrap a message string.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(count: usize, total: u64) -> Page<String> {
        Page {
            objects: (0..count).map(|i| format!("item-{i}")).collect(),
            next: false,
            prev: false,
            total,
        }
    }

    #[test]
    fn absent_page_parameter_is_page_zero() {
        assert_eq!(PageQuery::default().page(), 0);
    }

    #[test]
    fn malformed_page_parameter_is_page_zero() {
        let query = PageQuery {
            page: Some("banana".into()),
        };
        assert_eq!(query.page(), 0);
        let negative = PageQuery {
            page: Some("-3".into()),
        };
        assert_eq!(negative.page(), 0);
    }

    #[test]
    fn probe_item_sets_next_and_is_trimmed() {
        let window = PageWindow::new(0, 3);
        let envelope = PageEnvelope::from_window(window, page_of(4, 10));
        assert_eq!(envelope.objects.len(), 3);
        assert!(envelope.next);
        assert!(!envelope.prev);
        assert_eq!(envelope.total, 10);
    }

    #[test]
    fn short_window_has_no_next_page() {
        let window = PageWindow::new(2, 3);
        let envelope = PageEnvelope::from_window(window, page_of(2, 8));
        assert_eq!(envelope.objects.len(), 2);
        assert!(!envelope.next);
        assert!(envelope.prev);
    }
}
