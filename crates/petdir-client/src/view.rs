use petdir_core::Pet;

/// Which screen the client is showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    List,
    /// `target` is the pet being edited, or `None` for a new pet.
    EditForm { target: Option<Pet> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    New,
    Edit(Pet),
    Cancel,
    Saved,
}

impl View {
    pub fn apply(self, action: ViewAction) -> View {
        match action {
            ViewAction::New => View::EditForm { target: None },
            ViewAction::Edit(pet) => View::EditForm { target: Some(pet) },
            ViewAction::Cancel | ViewAction::Saved => View::List,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, View::EditForm { .. })
    }
}
