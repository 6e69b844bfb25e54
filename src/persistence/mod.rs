pub mod files;
pub mod schema;
pub mod store;

pub use files::{atomic_write, clean_filename, user_file};
pub use store::{LoadStatus, Loaded, Store, StoreError};
