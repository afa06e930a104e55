pub mod service;
pub mod settings;
pub mod source;
