use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{
    CategoryInput, Colony, ColonyInput, MainCategoryInput, MainCategoryView, NeedFilter,
    NewCategory, NewColony, NewMainCategory, ServiceCategory, TatkalQuery, User, dedup_ids,
};
use crate::database::repositories::{
    CategoryStore, ColonyStore, MainCategoryStore, NeedStore, UserStore,
};
use crate::error::{AppError, AppResult};
use crate::services::{access::ensure_admin, auth::Claims, validation::require_text};

/// Reference data (colonies, service and main categories) and user moderation.
#[derive(Clone)]
pub struct DirectoryService {
    colonies: Arc<dyn ColonyStore>,
    categories: Arc<dyn CategoryStore>,
    main_categories: Arc<dyn MainCategoryStore>,
    users: Arc<dyn UserStore>,
    needs: Arc<dyn NeedStore>,
}

impl DirectoryService {
    pub fn new(
        colonies: Arc<dyn ColonyStore>,
        categories: Arc<dyn CategoryStore>,
        main_categories: Arc<dyn MainCategoryStore>,
        users: Arc<dyn UserStore>,
        needs: Arc<dyn NeedStore>,
    ) -> Self {
        Self {
            colonies,
            categories,
            main_categories,
            users,
            needs,
        }
    }

    pub async fn create_colony(&self, claims: &Claims, input: ColonyInput) -> AppResult<Colony> {
        ensure_admin(claims)?;

        let name = require_text("name", input.name)?;
        let pincode = input
            .pincode
            .ok_or_else(|| AppError::validation("pincode is required"))?;

        let colony = self
            .colonies
            .insert_colony(NewColony {
                name,
                address: input.address,
                landmark: input.landmark,
                city: input.city,
                pincode,
                description: input.description,
            })
            .await?;

        log::info!("Colony {} ({}) created", colony.id, colony.name);
        Ok(colony)
    }

    pub async fn list_colonies(&self) -> AppResult<Vec<Colony>> {
        self.colonies.list_colonies(true).await
    }

    pub async fn get_colony(&self, id: Uuid) -> AppResult<Colony> {
        self.colonies
            .find_colony(id)
            .await?
            .ok_or_else(|| AppError::not_found("Colony not found"))
    }

    pub async fn update_colony(
        &self,
        claims: &Claims,
        id: Uuid,
        mut input: ColonyInput,
    ) -> AppResult<Colony> {
        ensure_admin(claims)?;

        if let Some(name) = input.name.take() {
            input.name = Some(require_text("name", Some(name))?);
        }

        let colony = self
            .colonies
            .update_colony(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Colony not found"))?;

        log::info!("Colony {} updated", id);
        Ok(colony)
    }

    /// Hard delete. Refused while any need still points at the colony; the
    /// stores enforce the same rule, this check only gives a clearer message.
    pub async fn delete_colony(&self, claims: &Claims, id: Uuid) -> AppResult<Colony> {
        ensure_admin(claims)?;

        let filter = NeedFilter {
            colony_id: Some(id),
            ..Default::default()
        };
        let referencing = self.needs.list_needs(&filter).await?.len();
        if referencing > 0 {
            return Err(AppError::conflict(format!(
                "Colony is referenced by {} need(s); deactivate it instead",
                referencing
            )));
        }

        let colony = self
            .colonies
            .delete_colony(id)
            .await?
            .ok_or_else(|| AppError::not_found("Colony not found"))?;

        log::info!("Colony {} deleted", id);
        Ok(colony)
    }

    pub async fn create_category(
        &self,
        claims: &Claims,
        input: CategoryInput,
    ) -> AppResult<ServiceCategory> {
        ensure_admin(claims)?;

        let name = require_text("name", input.name)?;
        if self.categories.find_category_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Service category already exists"));
        }

        let category = self
            .categories
            .insert_category(NewCategory {
                name,
                description: input.description,
            })
            .await?;

        log::info!("Service category {} ({}) created", category.id, category.name);
        Ok(category)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<ServiceCategory>> {
        self.categories.list_categories(true).await
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<ServiceCategory> {
        self.categories
            .find_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service category not found"))
    }

    pub async fn update_category(
        &self,
        claims: &Claims,
        id: Uuid,
        mut input: CategoryInput,
    ) -> AppResult<ServiceCategory> {
        ensure_admin(claims)?;

        if let Some(name) = input.name.take() {
            let name = require_text("name", Some(name))?;
            if let Some(existing) = self.categories.find_category_by_name(&name).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Service category already exists"));
                }
            }
            input.name = Some(name);
        }

        let category = self
            .categories
            .update_category(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Service category not found"))?;

        log::info!("Service category {} updated", id);
        Ok(category)
    }

    /// Soft delete: the category stays referenced but is hidden and unusable.
    pub async fn deactivate_category(
        &self,
        claims: &Claims,
        id: Uuid,
    ) -> AppResult<ServiceCategory> {
        ensure_admin(claims)?;

        let category = self
            .categories
            .deactivate_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service category not found"))?;

        log::info!("Service category {} deactivated", id);
        Ok(category)
    }

    pub async fn list_users(&self, claims: &Claims) -> AppResult<Vec<User>> {
        ensure_admin(claims)?;
        self.users.list_users().await
    }

    pub async fn set_user_blocked(
        &self,
        claims: &Claims,
        id: Uuid,
        is_blocked: bool,
    ) -> AppResult<User> {
        ensure_admin(claims)?;

        let user = self
            .users
            .set_user_blocked(id, is_blocked)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        log::info!(
            "User {} {}",
            id,
            if is_blocked { "blocked" } else { "unblocked" }
        );
        Ok(user)
    }

    /// Hard delete; the user's leaves, availabilities and needs go with it.
    pub async fn delete_user(&self, claims: &Claims, id: Uuid) -> AppResult<User> {
        ensure_admin(claims)?;

        let user = self
            .users
            .delete_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        log::info!("User {} ({}) deleted", id, user.registration_id);
        Ok(user)
    }

    /// Providers taking same-day work. Public.
    pub async fn list_tatkal_providers(&self, query: TatkalQuery) -> AppResult<Vec<User>> {
        self.users
            .find_tatkal_providers(query.service_category_id, query.pincode)
            .await
    }

    pub async fn create_main_category(
        &self,
        claims: &Claims,
        input: MainCategoryInput,
    ) -> AppResult<MainCategoryView> {
        ensure_admin(claims)?;

        let name = require_text("name", input.name)?;
        if self.find_main_category_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Main category already exists"));
        }

        let ids = dedup_ids(input.service_category_ids.unwrap_or_default());
        let linked = self.categories.find_categories(&ids).await?;
        if linked.len() != ids.len() || linked.iter().any(|c| !c.is_active) {
            return Err(AppError::validation(
                "serviceCategoryIds must reference active service categories",
            ));
        }

        let main = self
            .main_categories
            .insert_main_category(NewMainCategory {
                name,
                description: input.description,
                service_category_ids: ids,
            })
            .await?;

        log::info!("Main category {} ({}) created", main.id, main.name);
        Ok(MainCategoryView::resolve(main, &linked))
    }

    /// Active main categories, each showing only its active service categories.
    pub async fn list_main_categories(&self) -> AppResult<Vec<MainCategoryView>> {
        self.main_category_views(true).await
    }

    pub async fn list_all_main_categories(
        &self,
        claims: &Claims,
    ) -> AppResult<Vec<MainCategoryView>> {
        ensure_admin(claims)?;
        self.main_category_views(false).await
    }

    pub async fn get_main_category(&self, id: Uuid) -> AppResult<MainCategoryView> {
        let main = self
            .main_categories
            .find_main_category(id)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| AppError::not_found("Main category not found"))?;

        let linked = self.linked_categories(&main.service_category_ids, true).await?;
        Ok(MainCategoryView::resolve(main, &linked))
    }

    pub async fn get_main_category_admin(
        &self,
        claims: &Claims,
        id: Uuid,
    ) -> AppResult<MainCategoryView> {
        ensure_admin(claims)?;

        let main = self
            .main_categories
            .find_main_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Main category not found"))?;

        let linked = self.linked_categories(&main.service_category_ids, false).await?;
        Ok(MainCategoryView::resolve(main, &linked))
    }

    pub async fn update_main_category(
        &self,
        claims: &Claims,
        id: Uuid,
        mut input: MainCategoryInput,
    ) -> AppResult<MainCategoryView> {
        ensure_admin(claims)?;

        if let Some(name) = input.name.take() {
            let name = require_text("name", Some(name))?;
            if let Some(existing) = self.find_main_category_by_name(&name).await? {
                if existing != id {
                    return Err(AppError::conflict("Main category already exists"));
                }
            }
            input.name = Some(name);
        }

        // Inactive categories may stay linked on update, unknown ids may not
        if let Some(ids) = input.service_category_ids.take() {
            let ids = dedup_ids(ids);
            let found = self.categories.find_categories(&ids).await?;
            if found.len() != ids.len() {
                return Err(AppError::validation(
                    "serviceCategoryIds must reference existing service categories",
                ));
            }
            input.service_category_ids = Some(ids);
        }

        let main = self
            .main_categories
            .update_main_category(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Main category not found"))?;

        log::info!("Main category {} updated", id);
        let linked = self.linked_categories(&main.service_category_ids, false).await?;
        Ok(MainCategoryView::resolve(main, &linked))
    }

    pub async fn deactivate_main_category(
        &self,
        claims: &Claims,
        id: Uuid,
    ) -> AppResult<MainCategoryView> {
        ensure_admin(claims)?;

        let main = self
            .main_categories
            .deactivate_main_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Main category not found"))?;

        log::info!("Main category {} deactivated", id);
        let linked = self.linked_categories(&main.service_category_ids, false).await?;
        Ok(MainCategoryView::resolve(main, &linked))
    }

    async fn find_main_category_by_name(&self, name: &str) -> AppResult<Option<Uuid>> {
        let mains = self.main_categories.list_main_categories(false).await?;
        Ok(mains.into_iter().find(|m| m.has_name(name)).map(|m| m.id))
    }

    async fn linked_categories(
        &self,
        ids: &[Uuid],
        active_only: bool,
    ) -> AppResult<Vec<ServiceCategory>> {
        let mut categories = self.categories.find_categories(ids).await?;
        if active_only {
            categories.retain(|c| c.is_active);
        }
        Ok(categories)
    }

    async fn main_category_views(&self, active_only: bool) -> AppResult<Vec<MainCategoryView>> {
        let mains = self.main_categories.list_main_categories(active_only).await?;
        let categories = self.categories.list_categories(active_only).await?;

        Ok(mains
            .into_iter()
            .map(|main| MainCategoryView::resolve(main, &categories))
            .collect())
    }
}
