//! Session persistence and the session store.

pub mod file;
pub mod memory;
pub mod store;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::SessionStore;
pub use traits::SessionBackend;
