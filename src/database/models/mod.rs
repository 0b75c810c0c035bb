pub mod admin;
pub mod availability;
pub mod category;
pub mod colony;
pub mod leave;
pub mod macros;
pub mod main_category;
pub mod need;
pub mod user;

// Re-export all models for easy importing
pub use admin::*;
pub use availability::*;
pub use category::*;
pub use colony::*;
pub use leave::*;
pub use main_category::*;
pub use need::*;
pub use user::*;
