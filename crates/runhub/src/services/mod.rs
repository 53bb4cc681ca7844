//! Write paths and aggregated reads.

mod dashboard;
mod error;
mod events;
mod images;
mod posts;
mod registrations;

pub use dashboard::{BusinessDashboard, MetricsCache};
pub use error::{Result, ServiceError};
pub use events::EventService;
pub use images::ImageService;
pub use posts::{BusinessPostService, PostImageChanges};
pub use registrations::RegistrationService;
