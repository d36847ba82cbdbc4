pub mod loader;
pub mod templates;

pub use loader::load_config;
pub use templates::create_default_config;
