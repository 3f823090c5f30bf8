//! Durable and ephemeral key/value storage

pub mod memory;
pub mod ports;

pub use memory::MemoryStore;
pub use ports::KeyValueStore;
