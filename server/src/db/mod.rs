pub mod json_file;
pub mod memory;
pub mod pg_store;
pub mod seed;
pub mod store;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use store::Store;
