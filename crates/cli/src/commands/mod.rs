pub mod build;
pub mod init;
pub mod list;
pub mod validate;

pub use build::{BuildOptions, build_command};
pub use init::init_command;
pub use list::list_command;
pub use validate::validate_command;
