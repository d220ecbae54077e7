//! Client side of the pet directory: talks to the HTTP service and falls
//! back to a small built-in dataset ("demo mode") when the service is down.

pub mod demo;
pub mod error;
pub mod service;
pub mod session;
pub mod view;

pub use demo::DemoStore;
pub use error::{ClientError, Result};
pub use service::{HttpPetService, PetService, DEFAULT_API_URL};
pub use session::Session;
pub use view::{View, ViewAction};
