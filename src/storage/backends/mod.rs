mod collection;
pub mod file;
pub mod memory;

pub use collection::CollectionState;
pub use file::FileStore;
pub use memory::MemoryStore;
