use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{
    Admin, Availability, AvailabilityChanges, CategoryInput, Colony, ColonyInput, LeaveRecord,
    LeaveStatus, LeaveType, MainCategory, MainCategoryInput, Need, NeedFilter, NewAdmin,
    NewAvailability, NewCategory, NewColony, NewLeave, NewMainCategory, NewNeed, NewUser,
    ServiceCategory, User, UserChanges,
};
use crate::error::AppResult;

pub mod admin;
pub mod availability;
pub mod category;
pub mod colony;
pub mod leave;
pub mod main_category;
pub mod need;
pub mod user;

// Re-export all repositories for easy importing
pub use admin::AdminRepository;
pub use availability::AvailabilityRepository;
pub use category::CategoryRepository;
pub use colony::ColonyRepository;
pub use leave::LeaveRepository;
pub use main_category::MainCategoryRepository;
pub use need::NeedRepository;
pub use user::UserRepository;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> AppResult<User>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_users(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
    async fn find_user_by_mobile(&self, mobile_number: &str) -> AppResult<Option<User>>;
    async fn registration_id_taken(&self, registration_id: &str) -> AppResult<bool>;
    /// Newest first.
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn set_user_blocked(&self, id: Uuid, is_blocked: bool) -> AppResult<Option<User>>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<User>>;
    /// Removes the user along with their leaves, availabilities and needs.
    async fn delete_user(&self, id: Uuid) -> AppResult<Option<User>>;
    /// Unblocked providers with tatkal on, sorted by name.
    async fn find_tatkal_providers(
        &self,
        service_category_id: Option<Uuid>,
        pincode: Option<i32>,
    ) -> AppResult<Vec<User>>;
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn insert_admin(&self, admin: NewAdmin) -> AppResult<Admin>;
    async fn find_admin(&self, id: Uuid) -> AppResult<Option<Admin>>;
    async fn find_admin_by_login(&self, admin_id: &str) -> AppResult<Option<Admin>>;
    async fn count_admins(&self) -> AppResult<i64>;
    /// Newest first.
    async fn list_admins(&self) -> AppResult<Vec<Admin>>;
}

#[async_trait]
pub trait ColonyStore: Send + Sync {
    async fn insert_colony(&self, colony: NewColony) -> AppResult<Colony>;
    async fn find_colony(&self, id: Uuid) -> AppResult<Option<Colony>>;
    async fn find_colonies(&self, ids: &[Uuid]) -> AppResult<Vec<Colony>>;
    /// Sorted by name.
    async fn list_colonies(&self, active_only: bool) -> AppResult<Vec<Colony>>;
    async fn update_colony(&self, id: Uuid, input: ColonyInput) -> AppResult<Option<Colony>>;
    async fn delete_colony(&self, id: Uuid) -> AppResult<Option<Colony>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert_category(&self, category: NewCategory) -> AppResult<ServiceCategory>;
    async fn find_category(&self, id: Uuid) -> AppResult<Option<ServiceCategory>>;
    async fn find_categories(&self, ids: &[Uuid]) -> AppResult<Vec<ServiceCategory>>;
    /// Case-insensitive on the trimmed name.
    async fn find_category_by_name(&self, name: &str) -> AppResult<Option<ServiceCategory>>;
    /// Sorted by name.
    async fn list_categories(&self, active_only: bool) -> AppResult<Vec<ServiceCategory>>;
    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> AppResult<Option<ServiceCategory>>;
    async fn deactivate_category(&self, id: Uuid) -> AppResult<Option<ServiceCategory>>;
}

#[async_trait]
pub trait MainCategoryStore: Send + Sync {
    async fn insert_main_category(&self, main: NewMainCategory) -> AppResult<MainCategory>;
    async fn find_main_category(&self, id: Uuid) -> AppResult<Option<MainCategory>>;
    /// Sorted by name.
    async fn list_main_categories(&self, active_only: bool) -> AppResult<Vec<MainCategory>>;
    async fn update_main_category(
        &self,
        id: Uuid,
        input: MainCategoryInput,
    ) -> AppResult<Option<MainCategory>>;
    async fn deactivate_main_category(&self, id: Uuid) -> AppResult<Option<MainCategory>>;
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Inserts a pending leave. Implementations must refuse, with a
    /// conflict error, a leave that collides with an active leave of the
    /// same provider, atomically with the insert.
    async fn insert_leave(&self, leave: NewLeave) -> AppResult<LeaveRecord>;
    async fn find_leave(&self, id: Uuid) -> AppResult<Option<LeaveRecord>>;
    async fn list_leaves(&self, user_id: Option<Uuid>) -> AppResult<Vec<LeaveRecord>>;
    async fn find_user_leaves(
        &self,
        user_id: Uuid,
        leave_type: Option<LeaveType>,
        statuses: &[LeaveStatus],
    ) -> AppResult<Vec<LeaveRecord>>;
    /// Moves a leave to `to` only if it currently has status `from`.
    async fn transition_leave(
        &self,
        id: Uuid,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> AppResult<Option<LeaveRecord>>;
    async fn delete_leave(&self, id: Uuid) -> AppResult<Option<LeaveRecord>>;
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn insert_availability(&self, availability: NewAvailability) -> AppResult<Availability>;
    async fn find_availability(&self, id: Uuid) -> AppResult<Option<Availability>>;
    /// Sorted by date then start time.
    async fn list_availabilities(&self, user_id: Option<Uuid>) -> AppResult<Vec<Availability>>;
    /// Available records of a provider dated on or after `from`.
    async fn find_open_availabilities(
        &self,
        user_id: Uuid,
        from: NaiveDate,
    ) -> AppResult<Vec<Availability>>;
    async fn update_availability(
        &self,
        id: Uuid,
        changes: AvailabilityChanges,
    ) -> AppResult<Option<Availability>>;
    async fn delete_availability(&self, id: Uuid) -> AppResult<Option<Availability>>;
}

#[async_trait]
pub trait NeedStore: Send + Sync {
    async fn insert_need(&self, need: NewNeed) -> AppResult<Need>;
    async fn find_need(&self, id: Uuid) -> AppResult<Option<Need>>;
    /// Newest first.
    async fn list_needs(&self, filter: &NeedFilter) -> AppResult<Vec<Need>>;
    async fn delete_need(&self, id: Uuid) -> AppResult<Option<Need>>;
}
