use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blogdesk")]
#[command(version, about = "A local-first blog admin desk with a 30-day trash")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new blogdesk project in the current directory
    Init,

    /// Create a new blog post
    Add(AddArgs),

    /// List active posts
    List {
        /// Search title or author; accepts category:<name> and status:<name> filters
        #[arg(value_name = "SEARCH")]
        search: Option<String>,

        /// Only show posts in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Page number (1-based)
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single post (active or trashed)
    Show {
        /// Post ID (full UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing post
    Edit(EditArgs),

    /// Move a post to the trash
    Delete {
        /// Post ID (full UUID or unique prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// List posts in the trash
    Trash {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a post from the trash as a draft
    Restore {
        /// Post ID (full UUID or unique prefix)
        id: String,
    },

    /// Permanently delete a post from the trash
    Purge {
        /// Post ID (full UUID or unique prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Show post counts and recent posts
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Post title
    pub title: String,

    /// Author name
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Post body
    #[arg(long, short = 'd', conflicts_with = "stdin")]
    pub description: Option<String>,

    /// Read the post body from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Category (technology, lifestyle, education, health)
    #[arg(long, short = 'c', default_value = "technology")]
    pub category: String,

    /// Status (draft, published)
    #[arg(long, short = 's', default_value = "draft")]
    pub status: String,

    /// Publish date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub publish_date: Option<String>,

    /// JPG or PNG cover image, at most 1MB
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Post ID (full UUID or unique prefix)
    pub id: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New author
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// New body
    #[arg(long, short = 'd', conflicts_with = "stdin")]
    pub description: Option<String>,

    /// Read the new body from stdin
    #[arg(long)]
    pub stdin: bool,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// New status (draft, published)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// New publish date as YYYY-MM-DD
    #[arg(long)]
    pub publish_date: Option<String>,

    /// Replace the cover image
    #[arg(long, value_name = "PATH", conflicts_with = "remove_image")]
    pub image: Option<PathBuf>,

    /// Remove the cover image
    #[arg(long)]
    pub remove_image: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
