//! Dashboard summary: post counts and the most recently created posts.

use serde::Serialize;

use crate::entity::{BlogRecord, BlogStatus};
use crate::storage::{BlogStore, Storage};

/// Counts shown on the dashboard cards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub in_trash: usize,
}

#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    pub stats: DashboardStats,
    /// Newest active posts by creation time
    pub recent: Vec<&'a BlogRecord>,
}

impl<'a> Dashboard<'a> {
    pub fn from_views(
        active: &[&'a BlogRecord],
        trashed: &[&'a BlogRecord],
        recent_limit: usize,
    ) -> Self {
        let stats = DashboardStats {
            total: active.len(),
            published: active
                .iter()
                .filter(|b| b.status == BlogStatus::Published)
                .count(),
            drafts: active
                .iter()
                .filter(|b| b.status == BlogStatus::Draft)
                .count(),
            in_trash: trashed.len(),
        };

        let mut recent = active.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(recent_limit);

        Self { stats, recent }
    }

    pub fn build<S: Storage>(store: &'a BlogStore<S>, recent_limit: usize) -> Self {
        Self::from_views(&store.active(), &store.trashed(), recent_limit)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::entity::{BlogFields, BlogPatch};
    use crate::storage::{MemoryStorage, StoreOptions};

    #[test]
    fn test_empty_dashboard() {
        let store = BlogStore::open(MemoryStorage::new(), StoreOptions::default());
        let dashboard = Dashboard::build(&store, 3);
        assert_eq!(dashboard.stats, DashboardStats::default());
        assert!(dashboard.recent.is_empty());
    }

    #[test]
    fn test_counts_and_recent() {
        let start = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let now = Rc::new(Cell::new(start));
        let clock = Rc::clone(&now);
        let mut store = BlogStore::open(
            MemoryStorage::new(),
            StoreOptions::default().with_clock(move || clock.get()),
        );

        let mut ids = Vec::new();
        for i in 0..5 {
            now.set(start + Duration::hours(i));
            let blog = store
                .create(BlogFields::new(format!("Post {}", i), "body", "Ada"))
                .unwrap();
            ids.push(blog.id);
        }

        let publish = BlogPatch {
            status: Some(BlogStatus::Published),
            ..Default::default()
        };
        store.update(&ids[0], publish.clone()).unwrap();
        store.update(&ids[1], publish).unwrap();
        store.soft_delete(&ids[4]).unwrap();

        let dashboard = Dashboard::build(&store, 3);
        assert_eq!(
            dashboard.stats,
            DashboardStats {
                total: 4,
                published: 2,
                drafts: 2,
                in_trash: 1,
            }
        );

        let titles: Vec<_> = dashboard.recent.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Post 3", "Post 2", "Post 1"]);
    }
}
