use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{
    CategorySummary, ColonySummary, Need, NeedFilter, NeedInput, NeedMatchResult, NeedStatus,
    NeedView, NewNeed, UserSummary,
};
use crate::database::repositories::{AvailabilityStore, CategoryStore, ColonyStore, NeedStore, UserStore};
use crate::error::{AppError, AppResult};
use crate::services::{
    access::{ensure_owner_or_admin, resolve_subject},
    auth::Claims,
    clock::SharedClock,
    validation::require_text,
};

pub const NO_AVAILABILITY_HINT: &str =
    "No current or upcoming availability found. Add availability with colonies to see needs.";

/// Zone ids across `colony_sets`, first occurrence wins.
pub fn union_zones<'a, I>(colony_sets: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = &'a Vec<Uuid>>,
{
    let mut zones = Vec::new();
    for id in colony_sets.into_iter().flatten() {
        if !zones.contains(id) {
            zones.push(*id);
        }
    }
    zones
}

#[derive(Clone)]
pub struct NeedService {
    needs: Arc<dyn NeedStore>,
    users: Arc<dyn UserStore>,
    categories: Arc<dyn CategoryStore>,
    colonies: Arc<dyn ColonyStore>,
    availabilities: Arc<dyn AvailabilityStore>,
    clock: SharedClock,
}

impl NeedService {
    pub fn new(
        needs: Arc<dyn NeedStore>,
        users: Arc<dyn UserStore>,
        categories: Arc<dyn CategoryStore>,
        colonies: Arc<dyn ColonyStore>,
        availabilities: Arc<dyn AvailabilityStore>,
        clock: SharedClock,
    ) -> Self {
        Self {
            needs,
            users,
            categories,
            colonies,
            availabilities,
            clock,
        }
    }

    pub async fn create(&self, claims: &Claims, input: NeedInput) -> AppResult<NeedView> {
        let member_id = resolve_subject(claims, input.user_id)?;

        let (Some(service_category_id), Some(colony_id)) =
            (input.service_category_id, input.colony_id)
        else {
            return Err(AppError::validation(
                "serviceCategoryId, colonyId and description are required",
            ));
        };
        let description = require_text("description", input.description)?;

        let member = self
            .users
            .find_user(member_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if !member.is_member() {
            return Err(AppError::validation(
                "Only society members can post needs",
            ));
        }

        match self.categories.find_category(service_category_id).await? {
            Some(category) if category.is_active => {}
            _ => return Err(AppError::not_found("Service category not found or inactive")),
        }
        match self.colonies.find_colony(colony_id).await? {
            Some(colony) if colony.is_active => {}
            _ => return Err(AppError::not_found("Colony not found or inactive")),
        }

        let need = self
            .needs
            .insert_need(NewNeed {
                user_id: member_id,
                service_category_id,
                colony_id,
                description,
            })
            .await?;

        log::info!("Need {} posted by member {}", need.id, member_id);
        self.view(need).await
    }

    pub async fn list(&self, filter: &NeedFilter) -> AppResult<Vec<NeedView>> {
        let needs = self.needs.list_needs(filter).await?;
        self.views(needs).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<NeedView> {
        let need = self.find(id).await?;
        self.view(need).await
    }

    pub async fn delete(&self, claims: &Claims, id: Uuid) -> AppResult<NeedView> {
        let need = self.find(id).await?;
        ensure_owner_or_admin(claims, need.user_id)?;

        let deleted = self
            .needs
            .delete_need(id)
            .await?
            .ok_or_else(|| AppError::not_found("Need not found"))?;

        log::info!("Need {} deleted by {}", id, claims.user_id());
        self.view(deleted).await
    }

    /// Open needs a provider can serve: those in colonies where the provider
    /// has current or future availability, for the provider's own category.
    pub async fn matching(
        &self,
        claims: &Claims,
        provider_id: Uuid,
        category_name: Option<&str>,
    ) -> AppResult<NeedMatchResult> {
        ensure_owner_or_admin(claims, provider_id)?;

        let category_name = category_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::validation("serviceCategory is required"))?;

        let provider = self
            .users
            .find_user(provider_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if !provider.is_provider() {
            return Err(AppError::validation(
                "Only society service users can view matching needs",
            ));
        }

        let declared = match provider.service_category_id {
            Some(id) => self.categories.find_category(id).await?,
            None => None,
        };
        if !declared.as_ref().is_some_and(|c| c.has_name(category_name)) {
            return Err(AppError::validation(
                "serviceCategory does not match the provider's service category",
            ));
        }

        let today = self.clock.today();
        let availabilities = self
            .availabilities
            .find_open_availabilities(provider_id, today)
            .await?;
        let zones = union_zones(availabilities.iter().map(|a| &a.colony_ids));

        if zones.is_empty() {
            log::info!(
                "Provider {} has no availability from {}; no needs matched",
                provider_id,
                today
            );
            return Ok(NeedMatchResult {
                needs: Vec::new(),
                colonies: Vec::new(),
                total_needs: 0,
                available_colonies_count: 0,
                availability_records_count: availabilities.len(),
                message: NO_AVAILABILITY_HINT.to_string(),
            });
        }

        let category = self
            .categories
            .find_category_by_name(category_name)
            .await?
            .ok_or_else(|| AppError::not_found("Service category not found"))?;

        let needs = self
            .needs
            .list_needs(&NeedFilter {
                service_category_id: Some(category.id),
                colony_ids: Some(zones.clone()),
                status: Some(NeedStatus::Open),
                ..Default::default()
            })
            .await?;

        let colonies: Vec<ColonySummary> = self
            .colonies
            .find_colonies(&zones)
            .await?
            .iter()
            .map(ColonySummary::from)
            .collect();
        let needs = self.views(needs).await?;

        log::info!(
            "Matched {} needs for provider {} across {} colonies",
            needs.len(),
            provider_id,
            zones.len()
        );

        Ok(NeedMatchResult {
            total_needs: needs.len(),
            available_colonies_count: zones.len(),
            availability_records_count: availabilities.len(),
            message: format!("Found {} matching needs", needs.len()),
            needs,
            colonies,
        })
    }

    async fn find(&self, id: Uuid) -> AppResult<Need> {
        self.needs
            .find_need(id)
            .await?
            .ok_or_else(|| AppError::not_found("Need not found"))
    }

    async fn view(&self, need: Need) -> AppResult<NeedView> {
        let mut views = self.views(vec![need]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::internal_server_error_message("Empty need view"))
    }

    async fn views(&self, needs: Vec<Need>) -> AppResult<Vec<NeedView>> {
        let user_ids: Vec<Uuid> = union_ids(needs.iter().map(|n| n.user_id));
        let category_ids: Vec<Uuid> = union_ids(needs.iter().map(|n| n.service_category_id));
        let colony_ids: Vec<Uuid> = union_ids(needs.iter().map(|n| n.colony_id));

        let users: HashMap<Uuid, UserSummary> = self
            .users
            .find_users(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();
        let categories: HashMap<Uuid, CategorySummary> = self
            .categories
            .find_categories(&category_ids)
            .await?
            .iter()
            .map(|c| (c.id, CategorySummary::from(c)))
            .collect();
        let colonies: HashMap<Uuid, ColonySummary> = self
            .colonies
            .find_colonies(&colony_ids)
            .await?
            .iter()
            .map(|c| (c.id, ColonySummary::from(c)))
            .collect();

        Ok(needs
            .into_iter()
            .map(|need| {
                let user = users.get(&need.user_id).cloned();
                let category = categories.get(&need.service_category_id).cloned();
                let colony = colonies.get(&need.colony_id).cloned();
                NeedView::new(need, user, category, colony)
            })
            .collect())
    }
}

fn union_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_union_zones_dedupes_keeping_first_seen_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let sets = vec![vec![b, a], vec![a, c], vec![]];
        assert_eq!(union_zones(sets.iter()), vec![b, a, c]);
    }

    #[test]
    fn test_union_zones_of_nothing_is_empty() {
        let sets: Vec<Vec<Uuid>> = vec![vec![], vec![]];
        assert!(union_zones(sets.iter()).is_empty());
    }
}
