use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::influencer::{ConsultationMode, InfluencerProfile};
use super::user::UserProfile;

pub const CONSULTATIONS_COLLECTION: &str = "consultations";

/// Document in the `consultations` collection.
///
/// `userData` and `infData` are copies of both parties taken at booking
/// time; later profile edits do not touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub inf_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: UserProfile,
    pub inf_data: InfluencerProfile,
    pub amount: f64,
    pub mode: ConsultationMode,
    /// Booking time, epoch millis
    pub date: i64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub payment: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl Consultation {
    /// Fresh booking with all status flags cleared.
    pub fn book(
        user: UserProfile,
        influencer: InfluencerProfile,
        slot_date: &str,
        slot_time: &str,
        mode: ConsultationMode,
        amount: f64,
        booked_at: i64,
    ) -> Self {
        Consultation {
            id: None,
            user_id: user.id.clone(),
            inf_id: influencer.id.clone(),
            slot_date: slot_date.to_string(),
            slot_time: slot_time.to_string(),
            user_data: user,
            inf_data: influencer,
            amount,
            mode,
            date: booked_at,
            cancelled: false,
            payment: false,
            is_completed: false,
        }
    }

    /// Counts towards influencer earnings.
    pub fn is_settled(&self) -> bool {
        self.is_completed || self.payment
    }
}

/// API view of a consultation (`_id` as hex string).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub inf_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub user_data: UserProfile,
    pub inf_data: InfluencerProfile,
    pub amount: f64,
    pub mode: ConsultationMode,
    pub date: i64,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
}

impl From<Consultation> for ConsultationResponse {
    fn from(c: Consultation) -> Self {
        ConsultationResponse {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: c.user_id,
            inf_id: c.inf_id,
            slot_date: c.slot_date,
            slot_time: c.slot_time,
            user_data: c.user_data,
            inf_data: c.inf_data,
            amount: c.amount,
            mode: c.mode,
            date: c.date,
            cancelled: c.cancelled,
            payment: c.payment,
            is_completed: c.is_completed,
        }
    }
}

pub fn to_responses(consultations: Vec<Consultation>) -> Vec<ConsultationResponse> {
    consultations.into_iter().map(ConsultationResponse::from).collect()
}

// ==================== REQUESTS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookConsultationRequest {
    pub inf_id: Option<String>,
    pub slot_date: Option<String>,
    pub slot_time: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationActionRequest {
    pub consultation_id: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::{Rates, SocialLinks};

    pub fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: format!("user-{}", id),
            email: format!("{}@example.com", id),
            image: String::new(),
            phone: "000000000".into(),
            dob: "Not Selected".into(),
            gender: "Not Selected".into(),
        }
    }

    pub fn influencer(id: &str) -> InfluencerProfile {
        InfluencerProfile {
            id: id.to_string(),
            name: format!("inf-{}", id),
            email: Some(format!("{}@creators.example.com", id)),
            image: String::new(),
            category: "Tech".into(),
            followers: 100,
            social_links: SocialLinks::default(),
            about: String::new(),
            available: true,
            rates: Rates { chat: Some(10.0), call: Some(20.0), video: Some(30.0) },
            modes: vec![],
            slots_booked: None,
            date: 0,
        }
    }

    pub fn consultation(
        inf_id: &str,
        user_id: &str,
        mode: ConsultationMode,
        amount: f64,
        slot_date: &str,
    ) -> Consultation {
        Consultation::book(
            user(user_id),
            influencer(inf_id),
            slot_date,
            "10:00 AM",
            mode,
            amount,
            0,
        )
    }
}
