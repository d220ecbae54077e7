pub mod pet;

pub use pet::{Pet, PetFields, PetForm, ValidationError, KNOWN_SPECIES};
