pub mod tagging;
pub mod user_loader;
