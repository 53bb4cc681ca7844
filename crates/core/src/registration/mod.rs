mod operations;
mod types;

pub use operations::{
    count_by_event, registrations_for_event, registrations_for_runner, transform_registration,
};
pub use types::{
    BackendRegistration, NewRegistration, Registration, RegistrationId, RegistrationStatus,
    RegistrationUser,
};
