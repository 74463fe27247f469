pub mod cat;
pub mod config;
pub mod validate;
