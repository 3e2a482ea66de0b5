pub mod config;
pub mod list;

pub use config::handle_config_command;
pub use list::handle_list_command;
