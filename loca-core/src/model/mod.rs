pub mod dictionary;
pub mod entry;
pub mod session;
pub mod settings;
pub mod status;
