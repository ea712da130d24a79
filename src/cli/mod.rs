mod commands;
mod handlers;

pub use commands::{AddArgs, Cli, Commands, EditArgs};
pub use handlers::{
    handle_add, handle_dashboard, handle_delete, handle_edit, handle_init, handle_list,
    handle_purge, handle_restore, handle_show, handle_trash,
};
