pub mod db;
pub mod error;
pub mod models;

pub use db::{Database, PetPool, DEFAULT_POOL_SIZE};
pub use error::{PetDirError, Result};
pub use models::{Pet, PetFields, PetForm, ValidationError, KNOWN_SPECIES};
