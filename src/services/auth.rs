use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{
    Admin, AdminAuthResponse, AdminLoginInput, AdminUpdateUserInput, AuthResponse,
    CreateAdminInput, LoginInput, NewAdmin, NewUser, RegisterUserInput, TatkalInput,
    UpdateProfileInput, User, UserChanges, UserRole, macros::string_enum,
};
use crate::database::repositories::{AdminStore, CategoryStore, UserStore};
use crate::error::{AppError, AppResult};
use crate::services::access::ensure_admin;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Role {
        Admin => "admin",
        SocietyMember => "society member",
        SocietyService => "society service",
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::SocietyMember => Role::SocietyMember,
            UserRole::SocietyService => Role::SocietyService,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user or admin id
    pub role: Role,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
    pub fn is_provider(&self) -> bool {
        self.role == Role::SocietyService
    }
    pub fn is_member(&self) -> bool {
        self.role == Role::SocietyMember
    }
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            return ready(Err(AppError::Unauthorized));
        };

        ready(decode_token(&config.jwt_secret, token).map_err(|_| AppError::Unauthorized))
    }
}

fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

/// `USR-` followed by six uppercase hex characters.
fn random_registration_id() -> String {
    let value: u32 = rand::rng().random_range(0..0x0100_0000);
    format!("USR-{:06X}", value)
}

fn non_blank(field: &str, value: String) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}

const MAX_REGISTRATION_ID_ATTEMPTS: usize = 16;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    admins: Arc<dyn AdminStore>,
    categories: Arc<dyn CategoryStore>,
    config: Config,
}

impl AuthService {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        admins: Arc<dyn AdminStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            users,
            admins,
            categories,
            config,
        }
    }

    pub async fn register_user(&self, input: RegisterUserInput) -> AppResult<AuthResponse> {
        let mobile_number = input.mobile_number.trim().to_string();
        if input.full_name.trim().is_empty()
            || mobile_number.is_empty()
            || input.password.is_empty()
            || input.address.trim().is_empty()
        {
            return Err(AppError::validation(
                "fullName, mobileNumber, password, address, pincode, role are required",
            ));
        }

        if self.users.find_user_by_mobile(&mobile_number).await?.is_some() {
            return Err(AppError::conflict(
                "User with this mobileNumber already exists",
            ));
        }

        let service_category_id = match input.role {
            UserRole::SocietyService => {
                let category_id = input.service_category_id.ok_or_else(|| {
                    AppError::validation("serviceCategoryId is required for service providers")
                })?;
                match self.categories.find_category(category_id).await? {
                    Some(category) if category.is_active => Some(category.id),
                    _ => return Err(AppError::not_found("Service category not found")),
                }
            }
            UserRole::SocietyMember => input.service_category_id,
        };

        let password_hash = hash(&input.password, self.config.bcrypt_cost)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;
        let registration_id = self.unique_registration_id().await?;

        let user = self
            .users
            .insert_user(NewUser {
                registration_id,
                full_name: input.full_name.trim().to_string(),
                mobile_number,
                whatsapp_number: input.whatsapp_number,
                email: input.email,
                password_hash,
                address: input.address.trim().to_string(),
                pincode: input.pincode,
                role: input.role,
                service_category_id,
                experience: input.experience,
                service_charge: input.service_charge,
            })
            .await?;

        log::info!(
            "Registered {} {} as {}",
            user.role,
            user.id,
            user.registration_id
        );

        let token = self.generate_token(user.id, user.role.into())?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login_user(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let user = self
            .users
            .find_user_by_mobile(input.mobile_number.trim())
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.is_blocked {
            return Err(AppError::PermissionDenied("User is blocked".to_string()));
        }

        if !verify(&input.password, &user.password_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(user.id, user.role.into())?;
        Ok(AuthResponse { token, user })
    }

    /// The first admin may be created without credentials. Afterwards only
    /// an authenticated admin may add more.
    pub async fn create_admin(
        &self,
        caller: Option<&Claims>,
        input: CreateAdminInput,
    ) -> AppResult<Admin> {
        let bootstrap = self.admins.count_admins().await? == 0;
        if !bootstrap && !caller.is_some_and(Claims::is_admin) {
            return Err(AppError::PermissionDenied(
                "Only an admin can create admins".to_string(),
            ));
        }

        let admin_id = input.admin_id.trim().to_string();
        if admin_id.is_empty() || input.password.is_empty() {
            return Err(AppError::validation("adminId and password are required"));
        }

        if self.admins.find_admin_by_login(&admin_id).await?.is_some() {
            return Err(AppError::conflict("Admin already exists"));
        }

        let password_hash = hash(&input.password, self.config.bcrypt_cost)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let admin = self
            .admins
            .insert_admin(NewAdmin {
                name: input.name.unwrap_or_else(|| admin_id.clone()),
                admin_id,
                password_hash,
            })
            .await?;

        log::info!("Admin {} created (bootstrap: {})", admin.admin_id, bootstrap);
        Ok(admin)
    }

    pub async fn login_admin(&self, input: AdminLoginInput) -> AppResult<AdminAuthResponse> {
        let admin = self
            .admins
            .find_admin_by_login(input.admin_id.trim())
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify(&input.password, &admin.password_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(admin.id, Role::Admin)?;
        Ok(AdminAuthResponse { token, admin })
    }

    /// Profile behind a token: the admin record for admins, the user otherwise.
    pub async fn me(&self, claims: &Claims) -> AppResult<serde_json::Value> {
        let profile = if claims.is_admin() {
            let admin = self
                .admins
                .find_admin(claims.user_id())
                .await?
                .ok_or_else(|| AppError::not_found("Admin not found"))?;
            serde_json::to_value(admin)
        } else {
            let user = self.current_user(claims).await?;
            serde_json::to_value(user)
        };

        profile.map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }

    /// Self-service edit of profile text, contact details and password.
    pub async fn update_profile(
        &self,
        claims: &Claims,
        input: UpdateProfileInput,
    ) -> AppResult<User> {
        let user = self.current_user(claims).await?;
        let changes = self.profile_changes(&user, input, user.role).await?;

        let updated = self
            .users
            .update_user(user.id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        log::info!("User {} updated their profile", updated.id);
        Ok(updated)
    }

    /// Admin edit of any user, including role and moderation flags.
    pub async fn admin_update_user(
        &self,
        claims: &Claims,
        id: Uuid,
        input: AdminUpdateUserInput,
    ) -> AppResult<User> {
        ensure_admin(claims)?;

        let user = self
            .users
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let role = input.role.unwrap_or(user.role);
        let mut changes = self.profile_changes(&user, input.profile, role).await?;
        changes.role = input.role;
        changes.is_blocked = input.is_blocked;
        changes.tatkal_enabled = match (role, input.tatkal_enabled) {
            (UserRole::SocietyMember, Some(true)) => {
                return Err(AppError::validation(
                    "Tatkal is only available to service providers",
                ));
            }
            // Members never keep tatkal on
            (UserRole::SocietyMember, _) if user.tatkal_enabled => Some(false),
            (_, requested) => requested,
        };

        let updated = self
            .users
            .update_user(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        log::info!("User {} updated by admin {}", id, claims.user_id());
        Ok(updated)
    }

    /// Providers switch same-day ("tatkal") availability on or off.
    pub async fn set_tatkal_status(&self, claims: &Claims, input: TatkalInput) -> AppResult<User> {
        let tatkal_enabled = input
            .tatkal_enabled
            .ok_or_else(|| AppError::validation("tatkalEnabled is required"))?;

        let user = self.current_user(claims).await?;
        if !user.is_provider() {
            return Err(AppError::validation(
                "Tatkal is only available to service providers",
            ));
        }

        let updated = self
            .users
            .update_user(
                user.id,
                UserChanges {
                    tatkal_enabled: Some(tatkal_enabled),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        log::info!("User {} set tatkal to {}", updated.id, tatkal_enabled);
        Ok(updated)
    }

    pub async fn list_admins(&self, claims: &Claims) -> AppResult<Vec<Admin>> {
        ensure_admin(claims)?;
        self.admins.list_admins().await
    }

    pub async fn current_user(&self, claims: &Claims) -> AppResult<User> {
        self.users
            .find_user(claims.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(&self.config.jwt_secret, token).map_err(|_| AppError::Unauthorized)
    }

    pub fn generate_token(&self, subject: Uuid, role: Role) -> AppResult<String> {
        // Wall clock, since verification checks `exp` against it too.
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| AppError::internal_server_error_message("Invalid token expiry"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: subject,
            role,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }

    /// Validates the shared profile fields against `user` as it will look
    /// with `role`. An empty password means "keep the current one".
    async fn profile_changes(
        &self,
        user: &User,
        input: UpdateProfileInput,
        role: UserRole,
    ) -> AppResult<UserChanges> {
        let full_name = input.full_name.map(|v| non_blank("fullName", v)).transpose()?;
        let address = input.address.map(|v| non_blank("address", v)).transpose()?;

        let mobile_number = match input.mobile_number {
            Some(mobile) => {
                let mobile = non_blank("mobileNumber", mobile)?;
                if mobile != user.mobile_number
                    && self.users.find_user_by_mobile(&mobile).await?.is_some()
                {
                    return Err(AppError::conflict(
                        "User with this mobileNumber already exists",
                    ));
                }
                Some(mobile)
            }
            None => None,
        };

        let password_hash = match input.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(
                hash(&password, self.config.bcrypt_cost)
                    .map_err(|e| AppError::internal_server_error_message(e.to_string()))?,
            ),
            None => None,
        };

        if let Some(category_id) = input.service_category_id {
            match self.categories.find_category(category_id).await? {
                Some(category) if category.is_active => {}
                _ => return Err(AppError::not_found("Service category not found")),
            }
        }
        if role == UserRole::SocietyService
            && input.service_category_id.or(user.service_category_id).is_none()
        {
            return Err(AppError::validation(
                "serviceCategoryId is required for service providers",
            ));
        }

        Ok(UserChanges {
            full_name,
            mobile_number,
            whatsapp_number: input.whatsapp_number,
            email: input.email,
            password_hash,
            address,
            pincode: input.pincode,
            service_category_id: input.service_category_id,
            experience: input.experience,
            service_charge: input.service_charge,
            ..Default::default()
        })
    }

    async fn unique_registration_id(&self) -> AppResult<String> {
        for _ in 0..MAX_REGISTRATION_ID_ATTEMPTS {
            let candidate = random_registration_id();
            if !self.users.registration_id_taken(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::internal_server_error_message(
            "Could not allocate a registration id",
        ))
    }
}
