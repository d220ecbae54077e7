use petdir_core::{Pet, PetFields};

/// Local stand-in for the service once the session is in demo mode.
/// Mutations only ever touch this in-memory list.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoStore {
    pets: Vec<Pet>,
}

impl DemoStore {
    /// The fixed fallback dataset.
    pub fn seeded() -> Self {
        Self {
            pets: vec![
                PetFields::new("Demo Dog", "Dog", 4.0, "Offline Mode").into_pet(1),
                PetFields::new("Demo Cat", "Cat", 2.0, "No Backend").into_pet(2),
            ],
        }
    }

    pub fn list(&self, species: Option<&str>) -> Vec<Pet> {
        self.pets
            .iter()
            .filter(|p| species.map_or(true, |s| p.species == s))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<Pet> {
        self.pets.iter().find(|p| p.id == id).cloned()
    }

    pub fn average_age(&self) -> f64 {
        if self.pets.is_empty() {
            return 0.0;
        }
        let total: f64 = self.pets.iter().map(|p| p.age).sum();
        total / self.pets.len() as f64
    }

    pub fn create(&mut self, fields: PetFields) -> Pet {
        let id = self.pets.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let pet = fields.into_pet(id);
        self.pets.push(pet.clone());
        pet
    }

    /// Same semantics as the service: unknown ids are ignored.
    pub fn update(&mut self, id: i64, fields: PetFields) {
        if let Some(pet) = self.pets.iter_mut().find(|p| p.id == id) {
            pet.apply(fields);
        }
    }

    pub fn delete(&mut self, id: i64) {
        self.pets.retain(|p| p.id != id);
    }
}
