use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::BlogdeskConfig;
use crate::dashboard::Dashboard;
use crate::entity::{BlogRecord, BlogStatus, Category};
use crate::error::{BlogdeskError, Result};
use crate::form::{self, BlogForm};
use crate::search::{filter_blogs, paginate, parse_query};
use crate::storage::{BlogStore, FileStorage, BLOGDESK_DIR};

use super::commands::{AddArgs, EditArgs};

/// Find the project root by looking for .blogdesk/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(BLOGDESK_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

/// Open the project's store, reporting anything the load had to clean up.
fn open_store() -> Result<(BlogdeskConfig, BlogStore<FileStorage>)> {
    let root = find_project_root();
    let storage = FileStorage::open(&root)?;
    let config = BlogdeskConfig::load(storage.dir())?;
    let store = BlogStore::open(storage, config.store_options());

    let report = store.load_report();
    if report.recovered {
        eprintln!("Warning: saved blog data was unreadable; starting from an empty collection");
    }
    if report.purged > 0 {
        eprintln!(
            "Purged {} post(s) that were in the trash for more than {} days",
            report.purged, config.trash_retention_days
        );
    }

    Ok((config, store))
}

#[derive(Clone, Copy)]
enum Scope {
    Any,
    Active,
    Trashed,
}

/// Resolve a full UUID or unique UUID prefix to a post id.
fn resolve_id(store: &BlogStore<FileStorage>, id: &str, scope: Scope) -> Result<Uuid> {
    let needle = id.trim().to_lowercase();
    if needle.is_empty() {
        return Err(BlogdeskError::BlogNotFound(id.to_string()));
    }

    let in_scope = |b: &&BlogRecord| match scope {
        Scope::Any => true,
        Scope::Active => !b.is_trashed(),
        Scope::Trashed => b.is_trashed(),
    };

    let matches: Vec<Uuid> = store
        .records()
        .iter()
        .filter(in_scope)
        .filter(|b| b.id.to_string().starts_with(&needle))
        .map(|b| b.id)
        .collect();

    match matches.as_slice() {
        [] => Err(BlogdeskError::BlogNotFound(id.to_string())),
        [only] => Ok(*only),
        _ => Err(BlogdeskError::AmbiguousId(id.to_string())),
    }
}

/// Ask before a destructive action. Non-interactive callers must pass --force.
fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    eprintln!("{} [y/N] ", prompt);

    // Check if stdin is a tty for interactive confirmation
    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    } else {
        Err(BlogdeskError::Storage(
            "Use --force to confirm in non-interactive mode".to_string(),
        ))
    }
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn parse_category(s: &str) -> Result<Category> {
    s.parse::<Category>().map_err(|message| BlogdeskError::InvalidField {
        field: "category",
        message,
    })
}

fn parse_status(s: &str) -> Result<BlogStatus> {
    s.parse::<BlogStatus>().map_err(BlogdeskError::InvalidStatus)
}

fn describe_image(image: Option<&str>) -> String {
    match image {
        None => "none".to_string(),
        Some(uri) => {
            let mime = uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or("unknown");
            match form::data_uri_size(uri) {
                Some(size) => format!("{} ({} bytes)", mime, size),
                None => mime.to_string(),
            }
        }
    }
}

fn print_summary_line(blog: &BlogRecord) {
    println!(
        "  {} [{}] {} - {} ({}, {})",
        blog.short_id(),
        blog.status,
        blog.title,
        blog.author,
        blog.category,
        blog.publish_date
    );
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let storage = FileStorage::init(&root)?;
    BlogdeskConfig::default().save(storage.dir())?;

    println!("Initialized blogdesk project in {}", root.display());
    Ok(())
}

pub fn handle_add(args: AddArgs) -> Result<()> {
    let (_config, mut store) = open_store()?;

    let mut form = BlogForm::new();
    form.title = args.title;
    form.author = args.author.unwrap_or_default();
    form.description = if args.stdin {
        read_stdin()?
    } else {
        args.description.unwrap_or_default()
    };
    form.category = parse_category(&args.category)?;
    form.status = parse_status(&args.status)?;
    if let Some(date) = args.publish_date {
        form.publish_date = form::parse_publish_date(&date)?;
    }
    if let Some(path) = args.image {
        form.attach_image(&path)?;
    }

    let blog = store.create(form.into_fields()?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&blog)?);
    } else {
        println!("Created blog ({}) - {}", blog.short_id(), blog.title);
    }

    Ok(())
}

pub fn handle_list(
    search: Option<String>,
    category: Option<String>,
    page: usize,
    json: bool,
) -> Result<()> {
    let (config, store) = open_store()?;

    let mut filter = parse_query(search.as_deref().unwrap_or(""));
    if let Some(category) = category {
        filter.category = Some(parse_category(&category)?);
    }
    debug!(?filter, page, "listing blogs");

    let matching = filter_blogs(store.active(), &filter);
    let page = paginate(matching, page, config.page_size);

    if json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PageJson<'a> {
            page: usize,
            total_pages: usize,
            total_items: usize,
            items: &'a [&'a BlogRecord],
        }

        let out = PageJson {
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            items: &page.items,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if page.items.is_empty() {
        if filter.is_empty() {
            println!("No blogs yet. Create one with 'blogdesk add'.");
        } else {
            println!("No blogs match your search.");
        }
        return Ok(());
    }

    for blog in &page.items {
        print_summary_line(blog);
    }
    println!(
        "\nShowing {}-{} of {} (page {}/{})",
        page.first_index(),
        page.last_index(),
        page.total_items,
        page.page,
        page.total_pages
    );
    if page.has_previous() {
        println!("Previous page: --page {}", page.page - 1);
    }
    if page.has_next() {
        println!("Next page: --page {}", page.page + 1);
    }

    Ok(())
}

pub fn handle_show(id: String, json: bool) -> Result<()> {
    let (_config, store) = open_store()?;

    let id = resolve_id(&store, &id, Scope::Any)?;
    let blog = store
        .get(&id)
        .ok_or_else(|| BlogdeskError::BlogNotFound(id.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(blog)?);
        return Ok(());
    }

    println!("{}", blog.title);
    println!("  ID:        {}", blog.id);
    println!("  Author:    {}", blog.author);
    println!("  Category:  {}", blog.category);
    println!("  Status:    {}", blog.status);
    println!("  Published: {}", blog.publish_date);
    println!("  Created:   {}", blog.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Image:     {}", describe_image(blog.image.as_deref()));
    if let Some(deleted_at) = blog.deleted_at {
        println!("  Trashed:   {}", deleted_at.format("%Y-%m-%d %H:%M:%S UTC"));
        if let Some(days) = store.days_until_purge(blog) {
            println!("  Purged in: {} day(s)", days);
        }
    }
    println!();
    println!("{}", blog.description);

    Ok(())
}

pub fn handle_edit(args: EditArgs) -> Result<()> {
    let (_config, mut store) = open_store()?;

    let id = resolve_id(&store, &args.id, Scope::Any)?;
    let existing = store
        .get(&id)
        .ok_or_else(|| BlogdeskError::BlogNotFound(args.id.clone()))?;

    let mut form = BlogForm::from_record(existing);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(author) = args.author {
        form.author = author;
    }
    if args.stdin {
        form.description = read_stdin()?;
    } else if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(category) = args.category {
        form.category = parse_category(&category)?;
    }
    if let Some(status) = args.status {
        form.status = parse_status(&status)?;
    }
    if let Some(date) = args.publish_date {
        form.publish_date = form::parse_publish_date(&date)?;
    }
    if let Some(path) = args.image {
        form.attach_image(&path)?;
    } else if args.remove_image {
        form.image = None;
    }

    if !store.update(&id, form.into_patch()?)? {
        return Err(BlogdeskError::BlogNotFound(args.id));
    }

    let updated = store
        .get(&id)
        .ok_or_else(|| BlogdeskError::Storage("Failed to retrieve updated blog".to_string()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(updated)?);
    } else {
        println!("Updated blog ({}) - {}", updated.short_id(), updated.title);
    }

    Ok(())
}

pub fn handle_delete(id: String, force: bool) -> Result<()> {
    let (config, mut store) = open_store()?;

    let id = resolve_id(&store, &id, Scope::Active)?;
    let title = store.get(&id).map(|b| b.title.clone()).unwrap_or_default();

    if !confirm(&format!("Move '{}' to trash?", title), force)? {
        println!("Cancelled.");
        return Ok(());
    }

    store.soft_delete(&id)?;
    println!(
        "Moved '{}' to trash. It will be removed after {} days.",
        title, config.trash_retention_days
    );

    Ok(())
}

pub fn handle_trash(json: bool) -> Result<()> {
    let (_config, store) = open_store()?;
    let trashed = store.trashed();

    if json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct TrashedJson<'a> {
            #[serde(flatten)]
            blog: &'a BlogRecord,
            purge_in_days: Option<i64>,
        }

        let out: Vec<TrashedJson> = trashed
            .iter()
            .map(|blog| TrashedJson {
                blog,
                purge_in_days: store.days_until_purge(blog),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if trashed.is_empty() {
        println!("Trash is empty.");
        return Ok(());
    }

    println!("Trash ({}):\n", trashed.len());
    for blog in &trashed {
        let deleted = blog
            .deleted_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let days = store.days_until_purge(blog).unwrap_or(0);
        println!(
            "  {} {} - {} (deleted {}, purged in {} day(s))",
            blog.short_id(),
            blog.title,
            blog.author,
            deleted,
            days
        );
    }

    Ok(())
}

pub fn handle_restore(id: String) -> Result<()> {
    let (_config, mut store) = open_store()?;

    let id = resolve_id(&store, &id, Scope::Trashed)?;
    store.restore(&id)?;

    if let Some(blog) = store.get(&id) {
        println!("Restored '{}' as a draft.", blog.title);
    }

    Ok(())
}

pub fn handle_purge(id: String, force: bool) -> Result<()> {
    let (_config, mut store) = open_store()?;

    let id = resolve_id(&store, &id, Scope::Trashed)?;
    let title = store.get(&id).map(|b| b.title.clone()).unwrap_or_default();

    if !confirm(
        &format!("Permanently delete '{}'? This cannot be undone.", title),
        force,
    )? {
        println!("Cancelled.");
        return Ok(());
    }

    store.permanently_delete(&id)?;
    println!("Permanently deleted '{}'.", title);

    Ok(())
}

pub fn handle_dashboard(json: bool) -> Result<()> {
    let (config, store) = open_store()?;
    let dashboard = Dashboard::build(&store, config.recent_limit);

    if json {
        #[derive(Serialize)]
        struct DashboardJson<'a> {
            stats: crate::dashboard::DashboardStats,
            recent: &'a [&'a BlogRecord],
        }

        let out = DashboardJson {
            stats: dashboard.stats,
            recent: &dashboard.recent,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let stats = dashboard.stats;
    println!("Total blogs: {}", stats.total);
    println!("Published:   {}", stats.published);
    println!("Drafts:      {}", stats.drafts);
    println!("In trash:    {}", stats.in_trash);

    println!("\nRecent blogs:");
    if dashboard.recent.is_empty() {
        println!("  (none yet)");
    }
    for blog in &dashboard.recent {
        println!(
            "  {} [{}] {} ({})",
            blog.short_id(),
            blog.status,
            blog.title,
            blog.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
