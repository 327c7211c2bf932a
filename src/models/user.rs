use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";

/// Document in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default = "default_not_selected")]
    pub dob: String,
    #[serde(default = "default_not_selected")]
    pub gender: String,
}

fn default_phone() -> String {
    "000000000".to_string()
}

fn default_not_selected() -> String {
    "Not Selected".to_string()
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        User {
            id: None,
            name,
            email,
            password: password_hash,
            image: String::new(),
            phone: default_phone(),
            dob: default_not_selected(),
            gender: default_not_selected(),
        }
    }
}

/// User without credentials. Returned by the profile endpoint and embedded
/// in every consultation as `userData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(default = "default_not_selected")]
    pub dob: String,
    #[serde(default = "default_not_selected")]
    pub gender: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            image: user.image,
            phone: user.phone,
            dob: user.dob,
            gender: user.gender,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    /// Already-hosted image URL
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_gets_profile_defaults() {
        let user = User::new("Jane".into(), "jane@example.com".into(), "hash".into());
        assert_eq!(user.phone, "000000000");
        assert_eq!(user.dob, "Not Selected");
        assert_eq!(user.gender, "Not Selected");
        assert!(user.image.is_empty());
    }

    #[test]
    fn profile_drops_password() {
        let id = ObjectId::new();
        let mut user = User::new("Jane".into(), "jane@example.com".into(), "hash".into());
        user.id = Some(id);

        let profile = UserProfile::from(user);
        assert_eq!(profile.id, id.to_hex());

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], id.to_hex());
    }

    #[test]
    fn legacy_document_without_gender_deserializes() {
        let doc = mongodb::bson::doc! {
            "_id": ObjectId::new(),
            "name": "Old",
            "email": "old@example.com",
            "password": "hash",
        };
        let user: User = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(user.gender, "Not Selected");
        assert_eq!(user.phone, "000000000");
    }
}
