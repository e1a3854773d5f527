pub mod file;
pub mod user;

pub use file::FileUserRepository;
pub use user::{MemoryUserRepository, PasswordCheck, StoreError, UserRecord, UserRepository};
