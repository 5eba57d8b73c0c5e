//! Multi-step appointment entry.

pub mod wizard;

pub use wizard::{AppointmentWizard, Step, StepInput, SubmitError};
