pub mod auth;
pub mod availability;
pub mod categories;
pub mod colonies;
pub mod leaves;
pub mod main_categories;
pub mod needs;
pub mod shared;
pub mod users;
