pub mod content_file;
pub mod dictionary_store;
pub mod encoding;
pub mod files;
pub mod reconcile;
pub mod search;
pub mod settings;
pub mod workspace;
