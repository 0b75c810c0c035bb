use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum UserRole {
        SocietyMember => "society member",
        SocietyService => "society service",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub registration_id: String, // USR-XXXXXX
    pub full_name: String,
    pub mobile_number: String,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub address: String,
    pub pincode: i32,
    pub is_blocked: bool,
    pub role: UserRole,
    pub service_category_id: Option<Uuid>,
    pub experience: Option<String>,
    pub service_charge: Option<String>,
    pub tatkal_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_provider(&self) -> bool {
        self.role == UserRole::SocietyService
    }

    pub fn is_member(&self) -> bool {
        self.role == UserRole::SocietyMember
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub registration_id: String,
    pub full_name: String,
    pub mobile_number: String,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub address: String,
    pub pincode: i32,
    pub role: UserRole,
    pub service_category_id: Option<Uuid>,
    pub experience: Option<String>,
    pub service_charge: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserInput {
    pub full_name: String,
    pub mobile_number: String,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub password: String,
    pub address: String,
    pub pincode: i32,
    pub role: UserRole,
    pub service_category_id: Option<Uuid>,
    pub experience: Option<String>,
    pub service_charge: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub mobile_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUserInput {
    pub is_blocked: bool,
}

/// Text fields a user may change on their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<i32>,
    pub service_category_id: Option<Uuid>,
    pub experience: Option<String>,
    pub service_charge: Option<String>,
}

/// Profile fields plus the moderation flags only an admin may set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserInput {
    #[serde(flatten)]
    pub profile: UpdateProfileInput,
    pub role: Option<UserRole>,
    pub is_blocked: Option<bool>,
    pub tatkal_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TatkalInput {
    pub tatkal_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TatkalQuery {
    pub service_category_id: Option<Uuid>,
    pub pincode: Option<i32>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<i32>,
    pub role: Option<UserRole>,
    pub service_category_id: Option<Uuid>,
    pub experience: Option<String>,
    pub service_charge: Option<String>,
    pub is_blocked: Option<bool>,
    pub tatkal_enabled: Option<bool>,
}

impl UserChanges {
    pub fn apply_to(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(mobile_number) = self.mobile_number {
            user.mobile_number = mobile_number;
        }
        if self.whatsapp_number.is_some() {
            user.whatsapp_number = self.whatsapp_number;
        }
        if self.email.is_some() {
            user.email = self.email;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(address) = self.address {
            user.address = address;
        }
        if let Some(pincode) = self.pincode {
            user.pincode = pincode;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if self.service_category_id.is_some() {
            user.service_category_id = self.service_category_id;
        }
        if self.experience.is_some() {
            user.experience = self.experience;
        }
        if self.service_charge.is_some() {
            user.service_charge = self.service_charge;
        }
        if let Some(is_blocked) = self.is_blocked {
            user.is_blocked = is_blocked;
        }
        if let Some(tatkal_enabled) = self.tatkal_enabled {
            user.tatkal_enabled = tatkal_enabled;
        }
    }
}

/// Display fields used when a user is embedded in another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub registration_id: String,
    pub full_name: String,
    pub mobile_number: String,
    pub role: UserRole,
    pub service_category_id: Option<Uuid>,
    pub tatkal_enabled: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            registration_id: user.registration_id.clone(),
            full_name: user.full_name.clone(),
            mobile_number: user.mobile_number.clone(),
            role: user.role,
            service_category_id: user.service_category_id,
            tatkal_enabled: user.tatkal_enabled,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
