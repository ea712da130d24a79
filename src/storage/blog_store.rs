// src/storage/blog_store.rs
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entity::{BlogFields, BlogPatch, BlogRecord, BlogStatus};
use crate::Result;

use super::Storage;

/// Slot name the collection is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "blog_data";
/// How long a trashed post survives before the next load drops it.
pub const TRASH_RETENTION_DAYS: i64 = 30;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of "now" for timestamps and trash expiry.
pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Knobs for a [`BlogStore`].
pub struct StoreOptions {
    pub storage_key: String,
    pub retention: Duration,
    clock: Clock,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            retention: Duration::days(TRASH_RETENTION_DAYS),
            clock: Box::new(Utc::now),
        }
    }
}

impl StoreOptions {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

/// What happened while loading the persisted collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Records that survived the load.
    pub loaded: usize,
    /// Expired trash dropped during the load.
    pub purged: usize,
    /// The slot could not be read or parsed and was treated as empty.
    pub recovered: bool,
}

/// Owner of the canonical blog collection.
///
/// All mutation goes through the lifecycle operations below, each of which
/// rewrites the whole collection to storage before returning. Operations on an
/// id that is not in the collection are no-ops and report `false`.
pub struct BlogStore<S: Storage> {
    storage: S,
    options: StoreOptions,
    blogs: Vec<BlogRecord>,
    ready: bool,
    report: LoadReport,
}

impl<S: Storage> BlogStore<S> {
    /// Create a store that has not loaded anything yet.
    pub fn new(storage: S, options: StoreOptions) -> Self {
        Self {
            storage,
            options,
            blogs: Vec::new(),
            ready: false,
            report: LoadReport::default(),
        }
    }

    /// Create a store and load it immediately.
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let mut store = Self::new(storage, options);
        store.initialize();
        store
    }

    /// Load the persisted collection and drop expired trash.
    ///
    /// Never fails: unreadable or corrupt data is logged and treated as an
    /// empty collection. Calling this on a ready store returns the earlier report.
    pub fn initialize(&mut self) -> LoadReport {
        if self.ready {
            return self.report;
        }

        let (parsed, recovered) = self.read_slot();
        let total = parsed.len();

        let now = self.now();
        let retention = self.options.retention;
        let blogs: Vec<BlogRecord> = parsed
            .into_iter()
            .filter(|blog| !blog.is_expired(now, retention))
            .collect();
        let purged = total - blogs.len();

        self.blogs = blogs;

        if purged > 0 {
            info!(purged, "purged expired posts from trash");
            if let Err(e) = self.persist() {
                warn!(error = %e, "failed to write back purged collection");
            }
        }

        self.report = LoadReport {
            loaded: self.blogs.len(),
            purged,
            recovered,
        };
        self.ready = true;
        debug!(loaded = self.report.loaded, "blog store ready");
        self.report
    }

    fn read_slot(&self) -> (Vec<BlogRecord>, bool) {
        let key = &self.options.storage_key;
        match self.storage.get(key) {
            Ok(None) => (Vec::new(), false),
            Ok(Some(raw)) if raw.trim().is_empty() => (Vec::new(), false),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<BlogRecord>>(&raw) {
                Ok(blogs) => (blogs, false),
                Err(e) => {
                    warn!(slot = %key, error = %e, "failed to parse saved blogs; starting empty");
                    (Vec::new(), true)
                }
            },
            Err(e) => {
                warn!(slot = %key, error = %e, "failed to load saved blogs; starting empty");
                (Vec::new(), true)
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.blogs)?;
        self.storage.set(&self.options.storage_key, &json)
    }

    fn ensure_ready(&mut self) {
        if !self.ready {
            debug!("mutation before load; initializing first");
            self.initialize();
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.options.clock)()
    }

    fn position(&self, id: &Uuid) -> Option<usize> {
        self.blogs.iter().position(|b| &b.id == id)
    }

    /// Apply `change` to the record at `idx` and persist, rolling the record
    /// back if the write fails.
    fn modify_at(&mut self, idx: usize, change: impl FnOnce(&mut BlogRecord)) -> Result<()> {
        let previous = self.blogs[idx].clone();
        change(&mut self.blogs[idx]);
        if let Err(e) = self.persist() {
            self.blogs[idx] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Add a new post at the front of the collection.
    pub fn create(&mut self, fields: BlogFields) -> Result<BlogRecord> {
        self.ensure_ready();

        let mut id = Uuid::new_v4();
        while self.position(&id).is_some() {
            id = Uuid::new_v4();
        }

        let record = BlogRecord::create(id, fields, self.now());
        self.blogs.insert(0, record.clone());
        if let Err(e) = self.persist() {
            self.blogs.remove(0);
            return Err(e);
        }

        debug!(id = %record.id, title = %record.title, "created blog");
        Ok(record)
    }

    /// Merge `patch` into the post with `id`.
    pub fn update(&mut self, id: &Uuid, patch: BlogPatch) -> Result<bool> {
        self.ensure_ready();
        let Some(idx) = self.position(id) else {
            debug!(%id, "update: no such blog");
            return Ok(false);
        };

        self.modify_at(idx, |blog| patch.apply(blog))?;
        debug!(%id, "updated blog");
        Ok(true)
    }

    /// Move the post with `id` to the trash.
    pub fn soft_delete(&mut self, id: &Uuid) -> Result<bool> {
        self.ensure_ready();
        let Some(idx) = self.position(id) else {
            debug!(%id, "soft_delete: no such blog");
            return Ok(false);
        };

        let now = self.now();
        self.modify_at(idx, |blog| {
            blog.deleted_at = Some(now);
            blog.status = BlogStatus::Archived;
        })?;
        debug!(%id, "moved blog to trash");
        Ok(true)
    }

    /// Bring the post with `id` back from the trash as a draft.
    pub fn restore(&mut self, id: &Uuid) -> Result<bool> {
        self.ensure_ready();
        let Some(idx) = self.position(id) else {
            debug!(%id, "restore: no such blog");
            return Ok(false);
        };

        self.modify_at(idx, |blog| {
            blog.deleted_at = None;
            blog.status = BlogStatus::Draft;
        })?;
        debug!(%id, "restored blog");
        Ok(true)
    }

    /// Remove the post with `id` from the collection for good.
    pub fn permanently_delete(&mut self, id: &Uuid) -> Result<bool> {
        self.ensure_ready();
        let Some(idx) = self.position(id) else {
            debug!(%id, "permanently_delete: no such blog");
            return Ok(false);
        };

        let removed = self.blogs.remove(idx);
        if let Err(e) = self.persist() {
            self.blogs.insert(idx, removed);
            return Err(e);
        }
        debug!(%id, "permanently deleted blog");
        Ok(true)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn load_report(&self) -> LoadReport {
        self.report
    }

    /// Every post, active and trashed, newest first.
    pub fn records(&self) -> &[BlogRecord] {
        &self.blogs
    }

    pub fn get(&self, id: &Uuid) -> Option<&BlogRecord> {
        self.blogs.iter().find(|b| &b.id == id)
    }

    /// Posts not in the trash.
    pub fn active(&self) -> Vec<&BlogRecord> {
        self.blogs.iter().filter(|b| !b.is_trashed()).collect()
    }

    /// Posts in the trash.
    pub fn trashed(&self) -> Vec<&BlogRecord> {
        self.blogs.iter().filter(|b| b.is_trashed()).collect()
    }

    /// Whole days (rounded up) until the next load purges `record`.
    pub fn days_until_purge(&self, record: &BlogRecord) -> Option<i64> {
        let due = record.purge_due(self.options.retention)?;
        let remaining_ms = (due - self.now()).num_milliseconds().max(0);
        Some((remaining_ms + MS_PER_DAY - 1) / MS_PER_DAY)
    }
}
