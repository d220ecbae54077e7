pub mod pool;
pub mod queries;
pub mod schema;

pub use pool::{PetPool, DEFAULT_POOL_SIZE};
pub use queries::Database;
