use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{
    Availability, AvailabilityChanges, AvailabilityInput, AvailabilityView, ColonyIds,
    ColonySummary, NewAvailability, UserSummary,
};
use crate::database::repositories::{AvailabilityStore, ColonyStore, UserStore};
use crate::error::{AppError, AppResult};
use crate::services::{
    access::{ensure_owner_or_admin, resolve_subject},
    auth::Claims,
    validation::{parse_calendar_date, require_date, require_time},
};

#[derive(Clone)]
pub struct AvailabilityService {
    availabilities: Arc<dyn AvailabilityStore>,
    users: Arc<dyn UserStore>,
    colonies: Arc<dyn ColonyStore>,
}

impl AvailabilityService {
    pub fn new(
        availabilities: Arc<dyn AvailabilityStore>,
        users: Arc<dyn UserStore>,
        colonies: Arc<dyn ColonyStore>,
    ) -> Self {
        Self {
            availabilities,
            users,
            colonies,
        }
    }

    pub async fn create(
        &self,
        claims: &Claims,
        input: AvailabilityInput,
    ) -> AppResult<AvailabilityView> {
        let provider_id = resolve_subject(claims, input.user_id)?;

        if input.date.is_none() || input.start_time.is_none() || input.end_time.is_none() {
            return Err(AppError::validation("date, startTime, endTime are required"));
        }
        let start_time = require_time("startTime", input.start_time.as_deref())?;
        let end_time = require_time("endTime", input.end_time.as_deref())?;

        let provider = self
            .users
            .find_user(provider_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if !provider.is_provider() {
            return Err(AppError::validation(
                "Only society service users can set availability",
            ));
        }

        let date = require_date("date", input.date.as_deref())?;
        let colony_ids = match &input.colony_ids {
            Some(ids) => self.resolve_colonies(ids).await?,
            None => Vec::new(),
        };

        let availability = self
            .availabilities
            .insert_availability(NewAvailability {
                user_id: provider_id,
                date,
                start_time,
                end_time,
                is_available: input.is_available.unwrap_or(true),
                notes: input.notes,
                colony_ids,
            })
            .await?;

        log::info!(
            "Availability {} added for provider {} on {}",
            availability.id,
            provider_id,
            availability.date
        );
        self.view(availability).await
    }

    /// Partial update. Each present field is validated like on create.
    pub async fn update(
        &self,
        claims: &Claims,
        id: Uuid,
        input: AvailabilityInput,
    ) -> AppResult<AvailabilityView> {
        let existing = self.find(id).await?;
        ensure_owner_or_admin(claims, existing.user_id)?;

        let mut changes = AvailabilityChanges::default();
        if let Some(date) = input.date.as_deref() {
            changes.date = Some(parse_calendar_date("date", date)?);
        }
        if input.start_time.is_some() {
            changes.start_time = Some(require_time("startTime", input.start_time.as_deref())?);
        }
        if input.end_time.is_some() {
            changes.end_time = Some(require_time("endTime", input.end_time.as_deref())?);
        }
        changes.is_available = input.is_available;
        changes.notes = input.notes;
        if let Some(ids) = &input.colony_ids {
            changes.colony_ids = Some(self.resolve_colonies(ids).await?);
        }

        let updated = self
            .availabilities
            .update_availability(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Availability not found"))?;

        log::info!("Availability {} updated by {}", id, claims.user_id());
        self.view(updated).await
    }

    /// Hard delete. Returns the removed record.
    pub async fn delete(&self, claims: &Claims, id: Uuid) -> AppResult<AvailabilityView> {
        let existing = self.find(id).await?;
        ensure_owner_or_admin(claims, existing.user_id)?;

        let deleted = self
            .availabilities
            .delete_availability(id)
            .await?
            .ok_or_else(|| AppError::not_found("Availability not found"))?;

        log::info!("Availability {} deleted by {}", id, claims.user_id());
        self.view(deleted).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<AvailabilityView> {
        let availability = self.find(id).await?;
        self.view(availability).await
    }

    pub async fn list(&self, user_id: Option<Uuid>) -> AppResult<Vec<AvailabilityView>> {
        let availabilities = self.availabilities.list_availabilities(user_id).await?;
        self.views(availabilities).await
    }

    async fn find(&self, id: Uuid) -> AppResult<Availability> {
        self.availabilities
            .find_availability(id)
            .await?
            .ok_or_else(|| AppError::not_found("Availability not found"))
    }

    /// Keeps the ids naming existing colonies, in the order given. Anything
    /// else is dropped rather than rejected.
    async fn resolve_colonies(&self, ids: &ColonyIds) -> AppResult<Vec<Uuid>> {
        let mut parsed = Vec::new();
        for entry in ids.entries() {
            match Uuid::parse_str(&entry) {
                Ok(id) if !parsed.contains(&id) => parsed.push(id),
                Ok(_) => {}
                Err(_) => log::warn!("Dropping malformed colony id {:?}", entry),
            }
        }

        if parsed.is_empty() {
            return Ok(parsed);
        }

        let known: Vec<Uuid> = self
            .colonies
            .find_colonies(&parsed)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        parsed.retain(|id| {
            let exists = known.contains(id);
            if !exists {
                log::warn!("Dropping unknown colony id {}", id);
            }
            exists
        });
        Ok(parsed)
    }

    async fn view(&self, availability: Availability) -> AppResult<AvailabilityView> {
        let mut views = self.views(vec![availability]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::internal_server_error_message("Empty availability view"))
    }

    async fn views(&self, availabilities: Vec<Availability>) -> AppResult<Vec<AvailabilityView>> {
        let mut user_ids: Vec<Uuid> = availabilities.iter().map(|a| a.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let mut colony_ids: Vec<Uuid> = availabilities
            .iter()
            .flat_map(|a| a.colony_ids.iter().copied())
            .collect();
        colony_ids.sort();
        colony_ids.dedup();

        let users: HashMap<Uuid, UserSummary> = self
            .users
            .find_users(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();
        let colonies: HashMap<Uuid, ColonySummary> = self
            .colonies
            .find_colonies(&colony_ids)
            .await?
            .iter()
            .map(|c| (c.id, ColonySummary::from(c)))
            .collect();

        Ok(availabilities
            .into_iter()
            .map(|availability| {
                let user = users.get(&availability.user_id).cloned();
                let zone_list = availability
                    .colony_ids
                    .iter()
                    .filter_map(|id| colonies.get(id).cloned())
                    .collect();
                AvailabilityView::new(availability, user, zone_list)
            })
            .collect())
    }
}
