use clap::Parser;
use tracing_subscriber::EnvFilter;

use blogdesk::cli::{
    handle_add, handle_dashboard, handle_delete, handle_edit, handle_init, handle_list,
    handle_purge, handle_restore, handle_show, handle_trash, Cli, Commands,
};

/// Log to stderr so `--json` output on stdout stays parseable.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("BLOGDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add(args) => handle_add(args),
        Commands::List {
            search,
            category,
            page,
            json,
        } => handle_list(search, category, page, json),
        Commands::Show { id, json } => handle_show(id, json),
        Commands::Edit(args) => handle_edit(args),
        Commands::Delete { id, force } => handle_delete(id, force),
        Commands::Trash { json } => handle_trash(json),
        Commands::Restore { id } => handle_restore(id),
        Commands::Purge { id, force } => handle_purge(id, force),
        Commands::Dashboard { json } => handle_dashboard(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
