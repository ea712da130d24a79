// src/entity/blog.rs
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Technology,
    Lifestyle,
    Education,
    Health,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Technology => write!(f, "Technology"),
            Category::Lifestyle => write!(f, "Lifestyle"),
            Category::Education => write!(f, "Education"),
            Category::Health => write!(f, "Health"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technology" | "tech" => Ok(Category::Technology),
            "lifestyle" => Ok(Category::Lifestyle),
            "education" => Ok(Category::Education),
            "health" => Ok(Category::Health),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Publication state of a post. `Archived` is only ever set by the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogStatus::Draft => write!(f, "Draft"),
            BlogStatus::Published => write!(f, "Published"),
            BlogStatus::Archived => write!(f, "Archived"),
        }
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "archived" => Ok(BlogStatus::Archived),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// A single blog post as it is persisted in the storage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: BlogStatus,
    pub publish_date: NaiveDate,
    /// Inline `data:` URI, never a path or URL.
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BlogRecord {
    pub(crate) fn create(id: Uuid, fields: BlogFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            author: fields.author,
            category: fields.category,
            status: fields.status,
            publish_date: fields.publish_date,
            image: fields.image,
            created_at,
            deleted_at: None,
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// When the trash will drop this record for good, if it is trashed.
    /// `None` also covers a retention that runs past the last representable date.
    pub fn purge_due(&self, retention: Duration) -> Option<DateTime<Utc>> {
        self.deleted_at.and_then(|deleted| deleted.checked_add_signed(retention))
    }

    /// True once the record has sat in the trash for longer than `retention`.
    /// A record exactly at the boundary is not yet expired.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        match self.deleted_at {
            Some(deleted) => now - deleted > retention,
            None => false,
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

/// Content supplied when creating a post.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogFields {
    pub title: String,
    pub description: String,
    pub author: String,
    pub category: Category,
    pub status: BlogStatus,
    pub publish_date: NaiveDate,
    pub image: Option<String>,
}

impl BlogFields {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            author: author.into(),
            category: Category::default(),
            status: BlogStatus::default(),
            publish_date: Utc::now().date_naive(),
            image: None,
        }
    }
}

/// Partial update for a post. Identity and lifecycle timestamps are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub category: Option<Category>,
    pub status: Option<BlogStatus>,
    pub publish_date: Option<NaiveDate>,
    pub image: Option<Option<String>>, // Some(None) to clear, Some(Some(uri)) to set
}

impl BlogPatch {
    pub(crate) fn apply(self, record: &mut BlogRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(author) = self.author {
            record.author = author;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(publish_date) = self.publish_date {
            record.publish_date = publish_date;
        }
        if let Some(image) = self.image {
            record.image = image;
        }
    }
}
