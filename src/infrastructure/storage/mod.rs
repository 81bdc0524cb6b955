//! Non-SQL store implementations

mod memory;

pub use memory::InMemoryUserRepository;
