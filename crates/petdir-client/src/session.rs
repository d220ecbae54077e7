use petdir_core::{Pet, PetForm};

use crate::demo::DemoStore;
use crate::error::{ClientError, Result};
use crate::service::PetService;
use crate::view::{View, ViewAction};

/// One user's session against the pet directory.
///
/// Once a list fetch fails the session switches to demo mode for the rest
/// of its life: reads and writes go to a local [`DemoStore`] and the
/// service is never called again.
pub struct Session<S> {
    service: S,
    pets: Vec<Pet>,
    species_filter: Option<String>,
    average_age: f64,
    view: View,
    form: PetForm,
    pending_delete: Option<i64>,
    demo: Option<DemoStore>,
}

impl<S: PetService> Session<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            pets: Vec::new(),
            species_filter: None,
            average_age: 0.0,
            view: View::List,
            form: PetForm::default(),
            pending_delete: None,
            demo: None,
        }
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn species_filter(&self) -> Option<&str> {
        self.species_filter.as_deref()
    }

    pub fn average_age(&self) -> f64 {
        self.average_age
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn form(&self) -> &PetForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PetForm {
        &mut self.form
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn is_demo_mode(&self) -> bool {
        self.demo.is_some()
    }

    /// Fetch the list and the average age. Both complete before any state
    /// is replaced; the session is loading for as long as this future is
    /// pending.
    pub async fn refresh(&mut self) {
        if self.demo.is_none() {
            let species = self.species_filter.as_deref();
            let (list, average) =
                tokio::join!(self.service.list(species), self.service.average_age());

            match list {
                Ok(pets) => {
                    self.pets = pets;
                    match average {
                        Ok(avg) => self.average_age = avg,
                        Err(e) => log::warn!("Could not fetch average age: {}", e),
                    }
                }
                Err(e) => {
                    log::warn!("Pet service unavailable, switching to demo mode: {}", e);
                    self.demo = Some(DemoStore::seeded());
                }
            }
        }

        if let Some(demo) = &self.demo {
            self.pets = demo.list(self.species_filter.as_deref());
            self.average_age = demo.average_age();
        }
    }

    /// Change the species filter and re-fetch. An empty filter clears it.
    pub async fn set_filter(&mut self, species: Option<String>) {
        self.species_filter = species.filter(|s| !s.trim().is_empty());
        self.refresh().await;
    }

    /// Look up one pet, from the service or the local demo data.
    pub async fn find(&self, id: i64) -> Result<Option<Pet>> {
        match &self.demo {
            Some(demo) => Ok(demo.get(id)),
            None => self.service.get(id).await,
        }
    }

    /// Open a blank form for a new pet.
    pub fn open_new(&mut self) {
        self.form = PetForm::default();
        self.transition(ViewAction::New);
    }

    /// Open the form pre-filled with `pet`'s current values.
    pub fn open_edit(&mut self, pet: Pet) {
        self.form = PetForm::from_pet(&pet);
        self.transition(ViewAction::Edit(pet));
    }

    /// Leave the form without saving.
    pub async fn cancel(&mut self) {
        self.transition(ViewAction::Cancel);
        self.form = PetForm::default();
        self.refresh().await;
    }

    /// Validate and submit the open form. On success the view returns to
    /// the list and the list is re-fetched. On failure the form stays open.
    pub async fn save(&mut self) -> Result<()> {
        let target_id = match &self.view {
            View::EditForm { target } => target.as_ref().map(|p| p.id),
            View::List => return Err(ClientError::NoOpenForm),
        };
        let fields = self.form.validate()?;

        match (&mut self.demo, target_id) {
            (Some(demo), Some(id)) => demo.update(id, fields),
            (Some(demo), None) => {
                demo.create(fields);
            }
            (None, Some(id)) => self.service.update(id, &fields).await?,
            (None, None) => {
                let pet = self.service.create(&fields).await?;
                log::info!("Created pet {} ({})", pet.id, pet.name);
            }
        }

        self.transition(ViewAction::Saved);
        self.form = PetForm::default();
        self.refresh().await;
        Ok(())
    }

    /// First step of a delete; nothing is sent until [`Session::confirm_delete`].
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Carry out the pending delete. Returns `false` if none was requested.
    pub async fn confirm_delete(&mut self) -> Result<bool> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };
        match &mut self.demo {
            Some(demo) => demo.delete(id),
            None => self.service.delete(id).await?,
        }
        self.refresh().await;
        Ok(true)
    }

    fn transition(&mut self, action: ViewAction) {
        let current = std::mem::take(&mut self.view);
        self.view = current.apply(action);
    }
}
