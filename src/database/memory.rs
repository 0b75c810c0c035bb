use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    Admin, Availability, AvailabilityChanges, CategoryInput, Colony, ColonyInput, LeaveRecord,
    LeaveSchedule, LeaveStatus, LeaveType, MainCategory, MainCategoryInput, Need, NeedFilter,
    NeedStatus, NewAdmin, NewAvailability, NewCategory, NewColony, NewLeave, NewMainCategory,
    NewNeed, NewUser, ServiceCategory, User, UserChanges, find_conflict,
};
use super::repositories::{
    AdminStore, AvailabilityStore, CategoryStore, ColonyStore, LeaveStore, MainCategoryStore,
    NeedStore, UserStore,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    admins: Vec<Admin>,
    colonies: Vec<Colony>,
    categories: Vec<ServiceCategory>,
    main_categories: Vec<MainCategory>,
    leaves: Vec<LeaveRecord>,
    availabilities: Vec<Availability>,
    needs: Vec<Need>,
}

/// In-process store implementing every store trait. Each write runs under
/// one lock, so uniqueness checks and inserts are atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn leave_sort_key(leave: &LeaveRecord) -> NaiveDate {
    match &leave.schedule {
        LeaveSchedule::Single { start_date, .. } => *start_date,
        LeaveSchedule::Weekly { .. } => leave.created_at.date_naive(),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.mobile_number == user.mobile_number || u.registration_id == user.registration_id)
        {
            return Err(AppError::conflict("Record collides with existing data (users)"));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            registration_id: user.registration_id,
            full_name: user.full_name,
            mobile_number: user.mobile_number,
            whatsapp_number: user.whatsapp_number,
            email: user.email,
            password_hash: user.password_hash,
            address: user.address,
            pincode: user.pincode,
            is_blocked: false,
            role: user.role,
            service_category_id: user.service_category_id,
            experience: user.experience,
            service_charge: user.service_charge,
            tatkal_enabled: false,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_user_by_mobile(&self, mobile_number: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.mobile_number == mobile_number)
            .cloned())
    }

    async fn registration_id_taken(&self, registration_id: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .any(|u| u.registration_id == registration_id))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users = tables.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn set_user_blocked(&self, id: Uuid, is_blocked: bool) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.is_blocked = is_blocked;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(mobile_number) = &changes.mobile_number {
            if tables
                .users
                .iter()
                .any(|u| u.id != id && &u.mobile_number == mobile_number)
            {
                return Err(AppError::conflict("Record collides with existing data (users)"));
            }
        }

        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            changes.apply_to(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };

        tables.leaves.retain(|l| l.user_id != id);
        tables.availabilities.retain(|a| a.user_id != id);
        tables.needs.retain(|n| n.user_id != id);
        Ok(Some(tables.users.remove(index)))
    }

    async fn find_tatkal_providers(
        &self,
        service_category_id: Option<Uuid>,
        pincode: Option<i32>,
    ) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| u.tatkal_enabled && !u.is_blocked && u.is_provider())
            .filter(|u| service_category_id.is_none_or(|id| u.service_category_id == Some(id)))
            .filter(|u| pincode.is_none_or(|p| u.pincode == p))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn insert_admin(&self, admin: NewAdmin) -> AppResult<Admin> {
        let mut tables = self.tables.write().await;
        if tables.admins.iter().any(|a| a.admin_id == admin.admin_id) {
            return Err(AppError::conflict("Record collides with existing data (admins)"));
        }

        let now = Utc::now();
        let created = Admin {
            id: Uuid::new_v4(),
            admin_id: admin.admin_id,
            password_hash: admin.password_hash,
            name: admin.name,
            created_at: now,
            updated_at: now,
        };
        tables.admins.push(created.clone());
        Ok(created)
    }

    async fn find_admin(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.id == id).cloned())
    }

    async fn find_admin_by_login(&self, admin_id: &str) -> AppResult<Option<Admin>> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.admin_id == admin_id).cloned())
    }

    async fn count_admins(&self) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.admins.len() as i64)
    }

    async fn list_admins(&self) -> AppResult<Vec<Admin>> {
        let tables = self.tables.read().await;
        let mut admins = tables.admins.clone();
        admins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(admins)
    }
}

#[async_trait]
impl ColonyStore for MemoryStore {
    async fn insert_colony(&self, colony: NewColony) -> AppResult<Colony> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created = Colony {
            id: Uuid::new_v4(),
            name: colony.name,
            address: colony.address,
            landmark: colony.landmark,
            city: colony.city,
            pincode: colony.pincode,
            description: colony.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.colonies.push(created.clone());
        Ok(created)
    }

    async fn find_colony(&self, id: Uuid) -> AppResult<Option<Colony>> {
        let tables = self.tables.read().await;
        Ok(tables.colonies.iter().find(|c| c.id == id).cloned())
    }

    async fn find_colonies(&self, ids: &[Uuid]) -> AppResult<Vec<Colony>> {
        let tables = self.tables.read().await;
        let mut colonies: Vec<Colony> = tables
            .colonies
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        colonies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(colonies)
    }

    async fn list_colonies(&self, active_only: bool) -> AppResult<Vec<Colony>> {
        let tables = self.tables.read().await;
        let mut colonies: Vec<Colony> = tables
            .colonies
            .iter()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect();
        colonies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(colonies)
    }

    async fn update_colony(&self, id: Uuid, input: ColonyInput) -> AppResult<Option<Colony>> {
        let mut tables = self.tables.write().await;
        let Some(colony) = tables.colonies.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            colony.name = name;
        }
        if input.address.is_some() {
            colony.address = input.address;
        }
        if input.landmark.is_some() {
            colony.landmark = input.landmark;
        }
        if input.city.is_some() {
            colony.city = input.city;
        }
        if let Some(pincode) = input.pincode {
            colony.pincode = pincode;
        }
        if input.description.is_some() {
            colony.description = input.description;
        }
        if let Some(is_active) = input.is_active {
            colony.is_active = is_active;
        }
        colony.updated_at = Utc::now();

        Ok(Some(colony.clone()))
    }

    async fn delete_colony(&self, id: Uuid) -> AppResult<Option<Colony>> {
        let mut tables = self.tables.write().await;
        if tables.needs.iter().any(|n| n.colony_id == id) {
            return Err(AppError::conflict(
                "Record is still referenced (needs_colony_id_fkey)",
            ));
        }

        let position = tables.colonies.iter().position(|c| c.id == id);
        Ok(position.map(|index| tables.colonies.remove(index)))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn insert_category(&self, category: NewCategory) -> AppResult<ServiceCategory> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.has_name(&category.name)) {
            return Err(AppError::conflict(
                "Record collides with existing data (service_categories_name_key)",
            ));
        }

        let now = Utc::now();
        let created = ServiceCategory {
            id: Uuid::new_v4(),
            name: category.name,
            description: category.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(created.clone());
        Ok(created)
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<ServiceCategory>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_categories(&self, ids: &[Uuid]) -> AppResult<Vec<ServiceCategory>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_category_by_name(&self, name: &str) -> AppResult<Option<ServiceCategory>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.has_name(name)).cloned())
    }

    async fn list_categories(&self, active_only: bool) -> AppResult<Vec<ServiceCategory>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<ServiceCategory> = tables
            .categories
            .iter()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> AppResult<Option<ServiceCategory>> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &input.name {
            if tables.categories.iter().any(|c| c.id != id && c.has_name(name)) {
                return Err(AppError::conflict(
                    "Record collides with existing data (service_categories_name_key)",
                ));
            }
        }

        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            category.name = name;
        }
        if input.description.is_some() {
            category.description = input.description;
        }
        if let Some(is_active) = input.is_active {
            category.is_active = is_active;
        }
        category.updated_at = Utc::now();

        Ok(Some(category.clone()))
    }

    async fn deactivate_category(&self, id: Uuid) -> AppResult<Option<ServiceCategory>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .map(|category| {
                category.is_active = false;
                category.updated_at = Utc::now();
                category.clone()
            }))
    }
}

#[async_trait]
impl MainCategoryStore for MemoryStore {
    async fn insert_main_category(&self, main: NewMainCategory) -> AppResult<MainCategory> {
        let mut tables = self.tables.write().await;
        if tables.main_categories.iter().any(|m| m.has_name(&main.name)) {
            return Err(AppError::conflict(
                "Record collides with existing data (main_categories_name_key)",
            ));
        }

        let now = Utc::now();
        let created = MainCategory {
            id: Uuid::new_v4(),
            name: main.name,
            description: main.description,
            service_category_ids: main.service_category_ids,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.main_categories.push(created.clone());
        Ok(created)
    }

    async fn find_main_category(&self, id: Uuid) -> AppResult<Option<MainCategory>> {
        let tables = self.tables.read().await;
        Ok(tables.main_categories.iter().find(|m| m.id == id).cloned())
    }

    async fn list_main_categories(&self, active_only: bool) -> AppResult<Vec<MainCategory>> {
        let tables = self.tables.read().await;
        let mut mains: Vec<MainCategory> = tables
            .main_categories
            .iter()
            .filter(|m| !active_only || m.is_active)
            .cloned()
            .collect();
        mains.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(mains)
    }

    async fn update_main_category(
        &self,
        id: Uuid,
        input: MainCategoryInput,
    ) -> AppResult<Option<MainCategory>> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &input.name {
            if tables.main_categories.iter().any(|m| m.id != id && m.has_name(name)) {
                return Err(AppError::conflict(
                    "Record collides with existing data (main_categories_name_key)",
                ));
            }
        }

        let Some(main) = tables.main_categories.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            main.name = name;
        }
        if input.description.is_some() {
            main.description = input.description;
        }
        if let Some(ids) = input.service_category_ids {
            main.service_category_ids = ids;
        }
        if let Some(is_active) = input.is_active {
            main.is_active = is_active;
        }
        main.updated_at = Utc::now();

        Ok(Some(main.clone()))
    }

    async fn deactivate_main_category(&self, id: Uuid) -> AppResult<Option<MainCategory>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .main_categories
            .iter_mut()
            .find(|m| m.id == id)
            .map(|main| {
                main.is_active = false;
                main.updated_at = Utc::now();
                main.clone()
            }))
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn insert_leave(&self, leave: NewLeave) -> AppResult<LeaveRecord> {
        let mut tables = self.tables.write().await;

        let own: Vec<LeaveRecord> = tables
            .leaves
            .iter()
            .filter(|l| l.user_id == leave.user_id)
            .cloned()
            .collect();
        if let Some(existing) = find_conflict(&own, &leave.schedule) {
            return Err(AppError::conflict_with(
                format!("Leave collides with existing leave {}", existing.id),
                serde_json::to_value(existing).unwrap_or_default(),
            ));
        }

        let now = Utc::now();
        let created = LeaveRecord {
            id: Uuid::new_v4(),
            user_id: leave.user_id,
            schedule: leave.schedule,
            reason: leave.reason,
            status: LeaveStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.leaves.push(created.clone());
        Ok(created)
    }

    async fn find_leave(&self, id: Uuid) -> AppResult<Option<LeaveRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.leaves.iter().find(|l| l.id == id).cloned())
    }

    async fn list_leaves(&self, user_id: Option<Uuid>) -> AppResult<Vec<LeaveRecord>> {
        let tables = self.tables.read().await;
        let mut leaves: Vec<LeaveRecord> = tables
            .leaves
            .iter()
            .filter(|l| user_id.is_none_or(|id| l.user_id == id))
            .cloned()
            .collect();
        leaves.sort_by(|a, b| {
            leave_sort_key(b)
                .cmp(&leave_sort_key(a))
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(leaves)
    }

    async fn find_user_leaves(
        &self,
        user_id: Uuid,
        leave_type: Option<LeaveType>,
        statuses: &[LeaveStatus],
    ) -> AppResult<Vec<LeaveRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .leaves
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter(|l| leave_type.is_none_or(|t| l.leave_type() == t))
            .filter(|l| statuses.contains(&l.status))
            .cloned()
            .collect())
    }

    async fn transition_leave(
        &self,
        id: Uuid,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> AppResult<Option<LeaveRecord>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .leaves
            .iter_mut()
            .find(|l| l.id == id && l.status == from)
            .map(|leave| {
                leave.status = to;
                leave.updated_at = Utc::now();
                leave.clone()
            }))
    }

    async fn delete_leave(&self, id: Uuid) -> AppResult<Option<LeaveRecord>> {
        let mut tables = self.tables.write().await;
        let position = tables.leaves.iter().position(|l| l.id == id);
        Ok(position.map(|index| tables.leaves.remove(index)))
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn insert_availability(&self, availability: NewAvailability) -> AppResult<Availability> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created = Availability {
            id: Uuid::new_v4(),
            user_id: availability.user_id,
            date: availability.date,
            start_time: availability.start_time,
            end_time: availability.end_time,
            is_available: availability.is_available,
            notes: availability.notes,
            colony_ids: availability.colony_ids,
            created_at: now,
            updated_at: now,
        };
        tables.availabilities.push(created.clone());
        Ok(created)
    }

    async fn find_availability(&self, id: Uuid) -> AppResult<Option<Availability>> {
        let tables = self.tables.read().await;
        Ok(tables.availabilities.iter().find(|a| a.id == id).cloned())
    }

    async fn list_availabilities(&self, user_id: Option<Uuid>) -> AppResult<Vec<Availability>> {
        let tables = self.tables.read().await;
        let mut availabilities: Vec<Availability> = tables
            .availabilities
            .iter()
            .filter(|a| user_id.is_none_or(|id| a.user_id == id))
            .cloned()
            .collect();
        availabilities.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        Ok(availabilities)
    }

    async fn find_open_availabilities(
        &self,
        user_id: Uuid,
        from: NaiveDate,
    ) -> AppResult<Vec<Availability>> {
        let mut availabilities = self.list_availabilities(Some(user_id)).await?;
        availabilities.retain(|a| a.is_available && a.date >= from);
        Ok(availabilities)
    }

    async fn update_availability(
        &self,
        id: Uuid,
        changes: AvailabilityChanges,
    ) -> AppResult<Option<Availability>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .availabilities
            .iter_mut()
            .find(|a| a.id == id)
            .map(|availability| {
                changes.apply_to(availability);
                availability.updated_at = Utc::now();
                availability.clone()
            }))
    }

    async fn delete_availability(&self, id: Uuid) -> AppResult<Option<Availability>> {
        let mut tables = self.tables.write().await;
        let position = tables.availabilities.iter().position(|a| a.id == id);
        Ok(position.map(|index| tables.availabilities.remove(index)))
    }
}

#[async_trait]
impl NeedStore for MemoryStore {
    async fn insert_need(&self, need: NewNeed) -> AppResult<Need> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created = Need {
            id: Uuid::new_v4(),
            user_id: need.user_id,
            service_category_id: need.service_category_id,
            colony_id: need.colony_id,
            description: need.description,
            status: NeedStatus::Open,
            created_at: now,
            updated_at: now,
        };
        tables.needs.push(created.clone());
        Ok(created)
    }

    async fn find_need(&self, id: Uuid) -> AppResult<Option<Need>> {
        let tables = self.tables.read().await;
        Ok(tables.needs.iter().find(|n| n.id == id).cloned())
    }

    async fn list_needs(&self, filter: &NeedFilter) -> AppResult<Vec<Need>> {
        let tables = self.tables.read().await;
        let mut needs: Vec<Need> = tables
            .needs
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        needs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(needs)
    }

    async fn delete_need(&self, id: Uuid) -> AppResult<Option<Need>> {
        let mut tables = self.tables.write().await;
        let position = tables.needs.iter().position(|n| n.id == id);
        Ok(position.map(|index| tables.needs.remove(index)))
    }
}
