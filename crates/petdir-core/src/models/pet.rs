use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Species offered by the front-ends. The store accepts any string.
pub const KNOWN_SPECIES: [&str; 5] = ["Dog", "Cat", "Fish", "Bird", "Other"];

/// A stored pet record. `id` is assigned by the store and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub age: f64,
    pub owner: String,
}

impl Pet {
    pub fn fields(&self) -> PetFields {
        PetFields {
            name: self.name.clone(),
            species: self.species.clone(),
            age: self.age,
            owner: self.owner.clone(),
        }
    }

    /// Overwrite every mutable field; `id` is left alone.
    pub fn apply(&mut self, fields: PetFields) {
        self.name = fields.name;
        self.species = fields.species;
        self.age = fields.age;
        self.owner = fields.owner;
    }
}

/// The four mutable fields. Create and update both take the complete set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetFields {
    pub name: String,
    pub species: String,
    pub age: f64,
    pub owner: String,
}

impl PetFields {
    pub fn new(name: &str, species: &str, age: f64, owner: &str) -> Self {
        Self {
            name: name.to_string(),
            species: species.to_string(),
            age,
            owner: owner.to_string(),
        }
    }

    pub fn into_pet(self, id: i64) -> Pet {
        Pet {
            id,
            name: self.name,
            species: self.species,
            age: self.age,
            owner: self.owner,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("owner is required")]
    MissingOwner,

    #[error("age must be a non-negative number, got '{0}'")]
    InvalidAge(String),
}

/// Form contents as typed by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetForm {
    pub name: String,
    pub species: String,
    pub age: String,
    pub owner: String,
}

impl Default for PetForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            species: KNOWN_SPECIES[0].to_string(),
            age: String::new(),
            owner: String::new(),
        }
    }
}

impl PetForm {
    /// Pre-fill the form with a pet's current values.
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            age: pet.age.to_string(),
            owner: pet.owner.clone(),
        }
    }

    /// Check required fields and parse the age. Nothing is sent unless this passes.
    pub fn validate(&self) -> Result<PetFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let owner = self.owner.trim();
        if owner.is_empty() {
            return Err(ValidationError::MissingOwner);
        }
        let age = match self.age.trim().parse::<f64>() {
            Ok(age) if age.is_finite() && age >= 0.0 => age,
            _ => return Err(ValidationError::InvalidAge(self.age.clone())),
        };
        Ok(PetFields {
            name: name.to_string(),
            species: self.species.trim().to_string(),
            age,
            owner: owner.to_string(),
        })
    }
}
