pub mod db;
pub mod memory;
pub mod mongo;
pub mod store;

pub use db::Database;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{PostStore, StoreError, UserStore};
