//! Post form: required-field checks and image intake.
//!
//! The store accepts whatever it is given. Everything a user types or
//! uploads passes through [`BlogForm`] first.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{NaiveDate, Utc};

use crate::entity::{BlogFields, BlogPatch, BlogRecord, BlogStatus, Category};
use crate::error::{BlogdeskError, Result};

/// Largest image accepted for embedding, in bytes.
pub const MAX_IMAGE_BYTES: u64 = 1024 * 1024;

/// MIME types an embedded image may have.
pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Editable state of a post before it is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogForm {
    pub title: String,
    pub description: String,
    pub author: String,
    pub category: Category,
    pub status: BlogStatus,
    pub publish_date: NaiveDate,
    pub image: Option<String>,
    /// Editing a trashed post. Its status stays `Archived` until it is restored.
    pub in_trash: bool,
}

impl Default for BlogForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            author: String::new(),
            category: Category::default(),
            status: BlogStatus::Draft,
            publish_date: Utc::now().date_naive(),
            image: None,
            in_trash: false,
        }
    }
}

impl BlogForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the form from an existing post for editing.
    pub fn from_record(record: &BlogRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            author: record.author.clone(),
            category: record.category,
            status: record.status,
            publish_date: record.publish_date,
            image: record.image.clone(),
            in_trash: record.is_trashed(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BlogdeskError::MissingField("title"));
        }
        if self.author.trim().is_empty() {
            return Err(BlogdeskError::MissingField("author"));
        }
        if self.description.trim().is_empty() {
            return Err(BlogdeskError::MissingField("description"));
        }
        match (self.in_trash, self.status) {
            (false, BlogStatus::Archived) => Err(BlogdeskError::InvalidStatus(
                "Archived is set by the trash; use Draft or Published".to_string(),
            )),
            (true, status) if status != BlogStatus::Archived => {
                Err(BlogdeskError::InvalidStatus(format!(
                    "{} on a trashed post; restore it first to change its status",
                    status
                )))
            }
            _ => Ok(()),
        }
    }

    /// Read, check and embed an image file.
    pub fn attach_image(&mut self, path: &Path) -> Result<()> {
        self.image = Some(load_image(path)?);
        Ok(())
    }

    pub fn into_fields(self) -> Result<BlogFields> {
        self.validate()?;
        Ok(BlogFields {
            title: self.title,
            description: self.description,
            author: self.author,
            category: self.category,
            status: self.status,
            publish_date: self.publish_date,
            image: self.image,
        })
    }

    /// Validate and turn the whole form into an update that replaces every editable field.
    /// A trashed post's status is left alone.
    pub fn into_patch(self) -> Result<BlogPatch> {
        self.validate()?;
        Ok(BlogPatch {
            title: Some(self.title),
            description: Some(self.description),
            author: Some(self.author),
            category: Some(self.category),
            status: (!self.in_trash).then_some(self.status),
            publish_date: Some(self.publish_date),
            image: Some(self.image),
        })
    }
}

/// Parse a `YYYY-MM-DD` publish date.
pub fn parse_publish_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| BlogdeskError::InvalidField {
        field: "publish date",
        message: format!("'{}' ({}); expected YYYY-MM-DD", s, e),
    })
}

/// MIME type for an image path, judged by its extension.
pub fn image_mime_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        _ => Err(BlogdeskError::UnsupportedImageType(path.display().to_string())),
    }
}

/// Encode image bytes as a `data:` URI after checking type and size.
pub fn encode_image(bytes: &[u8], mime: &str) -> Result<String> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime) {
        return Err(BlogdeskError::UnsupportedImageType(mime.to_string()));
    }
    let size = bytes.len() as u64;
    if size > MAX_IMAGE_BYTES {
        return Err(BlogdeskError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Load an image file into a `data:` URI.
pub fn load_image(path: &Path) -> Result<String> {
    let mime = image_mime_type(path)?;

    let size = fs::metadata(path)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(BlogdeskError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }

    let bytes = fs::read(path)?;
    encode_image(&bytes, mime)
}

/// Decoded payload size of a `data:` URI, if it is one.
pub fn data_uri_size(uri: &str) -> Option<usize> {
    let (header, payload) = uri.strip_prefix("data:")?.split_once(',')?;
    if !header.ends_with(";base64") {
        return Some(payload.len());
    }
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    Some((payload.len() / 4 * 3).saturating_sub(padding))
}
