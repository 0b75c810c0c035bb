pub mod access;
pub mod auth;
pub mod availability;
pub mod clock;
pub mod directory;
pub mod leave;
pub mod need;
pub mod validation;

pub use auth::AuthService;
pub use availability::AvailabilityService;
pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use directory::DirectoryService;
pub use leave::LeaveService;
pub use need::NeedService;
