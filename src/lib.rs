use std::sync::Arc;

use sqlx::PgPool;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{
    AuthService, AvailabilityService, DirectoryService, LeaveService, NeedService, SharedClock,
};

use database::memory::MemoryStore;
use database::repositories::{
    AdminRepository, AdminStore, AvailabilityRepository, AvailabilityStore, CategoryRepository,
    CategoryStore, ColonyRepository, ColonyStore, LeaveRepository, LeaveStore,
    MainCategoryRepository, MainCategoryStore, NeedRepository, NeedStore, UserRepository,
    UserStore,
};

/// One handle per store concern, backed by Postgres or the in-memory store.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub admins: Arc<dyn AdminStore>,
    pub colonies: Arc<dyn ColonyStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub main_categories: Arc<dyn MainCategoryStore>,
    pub leaves: Arc<dyn LeaveStore>,
    pub availabilities: Arc<dyn AvailabilityStore>,
    pub needs: Arc<dyn NeedStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            admins: Arc::new(AdminRepository::new(pool.clone())),
            colonies: Arc::new(ColonyRepository::new(pool.clone())),
            categories: Arc::new(CategoryRepository::new(pool.clone())),
            main_categories: Arc::new(MainCategoryRepository::new(pool.clone())),
            leaves: Arc::new(LeaveRepository::new(pool.clone())),
            availabilities: Arc::new(AvailabilityRepository::new(pool.clone())),
            needs: Arc::new(NeedRepository::new(pool)),
        }
    }

    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            admins: Arc::new(store.clone()),
            colonies: Arc::new(store.clone()),
            categories: Arc::new(store.clone()),
            main_categories: Arc::new(store.clone()),
            leaves: Arc::new(store.clone()),
            availabilities: Arc::new(store.clone()),
            needs: Arc::new(store),
        }
    }
}

pub struct AppState {
    pub auth_service: AuthService,
    pub leave_service: LeaveService,
    pub availability_service: AvailabilityService,
    pub need_service: NeedService,
    pub directory_service: DirectoryService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores, clock: SharedClock) -> Self {
        Self {
            auth_service: AuthService::new(
                config,
                stores.users.clone(),
                stores.admins.clone(),
                stores.categories.clone(),
            ),
            leave_service: LeaveService::new(
                stores.leaves.clone(),
                stores.users.clone(),
                clock.clone(),
            ),
            availability_service: AvailabilityService::new(
                stores.availabilities.clone(),
                stores.users.clone(),
                stores.colonies.clone(),
            ),
            need_service: NeedService::new(
                stores.needs.clone(),
                stores.users.clone(),
                stores.categories.clone(),
                stores.colonies.clone(),
                stores.availabilities.clone(),
                clock,
            ),
            directory_service: DirectoryService::new(
                stores.colonies,
                stores.categories,
                stores.main_categories,
                stores.users,
                stores.needs,
            ),
        }
    }
}
