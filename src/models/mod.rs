//! Records exchanged with the remote API and the upload relay.

pub mod appointment;
pub mod area;
pub mod auth;
pub mod document;
pub mod leader;
pub mod province;

mod lenient;

pub use appointment::{
    required_fields, Appointment, AppointmentStatus, ChiefAppointment, HeadmanAppointment, LeaderDraft, Nominee,
    ValidationError, VillageHeadAppointment,
};
pub use area::{AreaKind, TraditionalArea};
pub use auth::{ErrorResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest, UserProfile};
pub use document::{DocumentKind, DocumentPath};
pub use leader::{LeaderField, LeaderRole, TraditionalLeader};
pub use province::Province;
