//! Search and pagination over the active post list.

use crate::entity::{BlogRecord, BlogStatus, Category};

/// Parsed list filter.
///
/// Filters can be given in the search string using prefixes:
/// - `category:health` - Only posts in a category
/// - `status:published` - Only posts with a status
///
/// Everything else is free text matched against title and author.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SearchFilter {
    /// Case-insensitive text matched against title or author
    pub text: String,
    /// Exact category match
    pub category: Option<Category>,
    /// Exact status match
    pub status: Option<BlogStatus>,
}

impl SearchFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if filter has any constraints.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.category.is_none() && self.status.is_none()
    }

    pub fn matches(&self, blog: &BlogRecord) -> bool {
        let needle = self.text.to_lowercase();
        let text_ok = needle.is_empty()
            || blog.title.to_lowercase().contains(&needle)
            || blog.author.to_lowercase().contains(&needle);
        let category_ok = self.category.map_or(true, |c| blog.category == c);
        let status_ok = self.status.map_or(true, |s| blog.status == s);
        text_ok && category_ok && status_ok
    }
}

/// Parse a raw search string into a filter.
///
/// Unrecognised `category:`/`status:` values are kept as plain text.
///
/// # Examples
///
/// ```ignore
/// let filter = parse_query("category:health status:draft sleep");
/// assert_eq!(filter.text, "sleep");
/// assert_eq!(filter.category, Some(Category::Health));
/// ```
pub fn parse_query(raw: &str) -> SearchFilter {
    let mut filter = SearchFilter::default();
    let mut remaining = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(category) = token
            .strip_prefix("category:")
            .and_then(|v| v.parse::<Category>().ok())
        {
            filter.category = Some(category);
        } else if let Some(status) = token
            .strip_prefix("status:")
            .and_then(|v| v.parse::<BlogStatus>().ok())
        {
            filter.status = Some(status);
        } else {
            remaining.push(token);
        }
    }

    filter.text = remaining.join(" ");
    filter
}

/// Keep the posts matching `filter`, preserving order.
pub fn filter_blogs<'a>(
    blogs: impl IntoIterator<Item = &'a BlogRecord>,
    filter: &SearchFilter,
) -> Vec<&'a BlogRecord> {
    blogs.into_iter().filter(|b| filter.matches(b)).collect()
}

/// One page of a filtered list.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub items: Vec<&'a BlogRecord>,
    /// 1-based page number actually shown
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Page<'_> {
    /// 1-based index of the first item on this page (0 when empty).
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item on this page (0 when empty).
    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice out page `page` (1-based). Out-of-range pages are clamped.
pub fn paginate(items: Vec<&BlogRecord>, page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let items = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        page_size,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::entity::BlogFields;

    fn blog(title: &str, author: &str, category: Category) -> BlogRecord {
        let mut fields = BlogFields::new(title, "body", author);
        fields.category = category;
        BlogRecord::create(Uuid::new_v4(), fields, Utc::now())
    }

    fn sample() -> Vec<BlogRecord> {
        vec![
            blog("Rust ownership", "Ferris", Category::Technology),
            blog("Morning runs", "Dana", Category::Health),
            blog("Teaching kids to code", "rusty", Category::Education),
            blog("Slow living", "Ana", Category::Lifestyle),
        ]
    }

    #[test]
    fn test_parse_query_no_filters() {
        let filter = parse_query("hello world");
        assert_eq!(filter.text, "hello world");
        assert!(filter.category.is_none());
        assert!(filter.status.is_none());
    }

    #[test]
    fn test_parse_query_category_and_status() {
        let filter = parse_query("category:Health status:draft runs");
        assert_eq!(filter.text, "runs");
        assert_eq!(filter.category, Some(Category::Health));
        assert_eq!(filter.status, Some(BlogStatus::Draft));
    }

    #[test]
    fn test_parse_query_unknown_category_is_text() {
        let filter = parse_query("category:sports");
        assert_eq!(filter.text, "category:sports");
        assert!(filter.category.is_none());
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(SearchFilter::new().is_empty());
        assert!(!parse_query("category:health").is_empty());
    }

    #[test]
    fn test_text_matches_title_or_author_case_insensitive() {
        let blogs = sample();
        let filter = parse_query("RUST");
        let hits = filter_blogs(&blogs, &filter);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust ownership");
        assert_eq!(hits[1].author, "rusty");
    }

    #[test]
    fn test_category_filter() {
        let blogs = sample();
        let filter = SearchFilter {
            category: Some(Category::Lifestyle),
            ..Default::default()
        };
        let hits = filter_blogs(&blogs, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Slow living");
    }

    #[test]
    fn test_empty_filter_keeps_all_in_order() {
        let blogs = sample();
        let hits = filter_blogs(&blogs, &SearchFilter::new());
        let titles: Vec<_> = hits.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Rust ownership", "Morning runs", "Teaching kids to code", "Slow living"]
        );
    }

    #[test]
    fn test_paginate_pages() {
        let blogs: Vec<BlogRecord> = (0..12)
            .map(|i| blog(&format!("Post {}", i), "A", Category::Technology))
            .collect();
        let all: Vec<&BlogRecord> = blogs.iter().collect();

        let first = paginate(all.clone(), 1, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 12);
        assert_eq!(first.items.len(), 5);
        assert_eq!((first.first_index(), first.last_index()), (1, 5));
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(all, 3, 5);
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.items[0].title, "Post 10");
        assert_eq!((last.first_index(), last.last_index()), (11, 12));
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let blogs = sample();
        let all: Vec<&BlogRecord> = blogs.iter().collect();

        let page = paginate(all.clone(), 99, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);

        let page = paginate(all, 0, 3);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::new(), 1, 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.first_index(), 0);
        assert_eq!(page.last_index(), 0);
    }
}
