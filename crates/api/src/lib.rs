//! HTTP collaborator for the Campus client: login, registration, school
//! listings and the signed-in user's profile.

mod client;
pub mod errors;
pub mod registration;
pub mod types;

pub use client::ApiClient;
pub use errors::{ApiError, ApiResult};
pub use registration::{PersonalDetails, StudentRegistration, TeacherRegistration};
pub use types::{
    ClassItem, Envelope, LoginResponse, Profile, RegistrationOutcome, School, SubjectItem,
};
