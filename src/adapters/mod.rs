//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits in [`crate::ports`].

pub mod file_sink;
pub mod in_memory_repository;
pub mod memory_sink;
pub mod msgpack_repository;

pub use file_sink::FileSink;
pub use in_memory_repository::InMemoryRepository;
pub use memory_sink::MemorySink;
pub use msgpack_repository::MsgPackRepository;
