#[path = "commands.rs"]
pub mod commands;

#[path = "handlers.rs"]
pub mod handlers;

pub use commands::{CLAP_STYLING, command_argument_builder};
pub use handlers::{
    handle_audit, init_logging, read_domain, report_format_from_args, resolve_output_path,
    scan_config_from_args,
};
