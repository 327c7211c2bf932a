use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::slots::SlotsBooked;

pub const INFLUENCERS_COLLECTION: &str = "influencers";

/// Channel a consultation happens over. Each one has its own rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationMode {
    Chat,
    Call,
    Video,
}

impl ConsultationMode {
    pub const ALL: [ConsultationMode; 3] = [
        ConsultationMode::Chat,
        ConsultationMode::Call,
        ConsultationMode::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationMode::Chat => "chat",
            ConsultationMode::Call => "call",
            ConsultationMode::Video => "video",
        }
    }
}

impl fmt::Display for ConsultationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConsultationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(ConsultationMode::Chat),
            "call" => Ok(ConsultationMode::Call),
            "video" => Ok(ConsultationMode::Video),
            other => Err(format!("Invalid consultation mode: '{}'", other)),
        }
    }
}

/// Price per consultation for each mode. `None` means the mode is not offered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Rates {
    #[serde(default)]
    pub chat: Option<f64>,
    #[serde(default)]
    pub call: Option<f64>,
    #[serde(default)]
    pub video: Option<f64>,
}

impl Rates {
    /// Only strictly positive rates are bookable.
    pub fn rate_for(&self, mode: ConsultationMode) -> Option<f64> {
        self.raw(mode).filter(|r| r.is_finite() && *r > 0.0)
    }

    fn raw(&self, mode: ConsultationMode) -> Option<f64> {
        match mode {
            ConsultationMode::Chat => self.chat,
            ConsultationMode::Call => self.call,
            ConsultationMode::Video => self.video,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chat.is_none() && self.call.is_none() && self.video.is_none()
    }

    /// Rejects negative, zero or non-finite rates that were explicitly set.
    pub fn validate(&self) -> Result<(), String> {
        for mode in ConsultationMode::ALL {
            if let Some(r) = self.raw(mode) {
                if !r.is_finite() || r <= 0.0 {
                    return Err(format!("Rate for {} must be a positive number", mode));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

impl SocialLinks {
    pub fn has_any(&self) -> bool {
        [
            &self.instagram,
            &self.youtube,
            &self.facebook,
            &self.twitter,
            &self.tiktok,
        ]
        .iter()
        .any(|link| link.as_deref().map(|l| !l.trim().is_empty()).unwrap_or(false))
    }
}

/// Document in the `influencers` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub about: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub rates: Rates,
    #[serde(default)]
    pub modes: Vec<ConsultationMode>,
    #[serde(rename = "slots_booked", default)]
    pub slots_booked: SlotsBooked,
    /// Creation time, epoch millis
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

fn default_available() -> bool {
    true
}

impl Influencer {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Influencer without credentials.
///
/// `email` is left out of the public listing and `slots_booked` out of the
/// `infData` snapshot stored on consultations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub about: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub rates: Rates,
    #[serde(default)]
    pub modes: Vec<ConsultationMode>,
    #[serde(rename = "slots_booked", default, skip_serializing_if = "Option::is_none")]
    pub slots_booked: Option<SlotsBooked>,
    #[serde(default)]
    pub date: i64,
}

impl InfluencerProfile {
    /// Full profile for the influencer themself and the admin console.
    pub fn full(influencer: Influencer) -> Self {
        Self::build(influencer, true, true)
    }

    /// Public listing: no email.
    pub fn public(influencer: Influencer) -> Self {
        Self::build(influencer, false, true)
    }

    /// Snapshot embedded in a consultation: no booked slots.
    pub fn snapshot(influencer: &Influencer) -> Self {
        Self::build(influencer.clone(), true, false)
    }

    fn build(influencer: Influencer, with_email: bool, with_slots: bool) -> Self {
        InfluencerProfile {
            id: influencer.id_hex(),
            name: influencer.name,
            email: with_email.then_some(influencer.email),
            image: influencer.image,
            category: influencer.category,
            followers: influencer.followers,
            social_links: influencer.social_links,
            about: influencer.about,
            available: influencer.available,
            rates: influencer.rates,
            modes: influencer.modes,
            slots_booked: with_slots.then_some(influencer.slots_booked),
            date: influencer.date,
        }
    }
}

/// Result row of the name search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerSearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub followers: i64,
}

impl From<Influencer> for InfluencerSearchHit {
    fn from(influencer: Influencer) -> Self {
        InfluencerSearchHit {
            id: influencer.id_hex(),
            name: influencer.name,
            image: influencer.image,
            category: influencer.category,
            followers: influencer.followers,
        }
    }
}

// ==================== REQUESTS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddInfluencerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub category: Option<String>,
    pub followers: Option<i64>,
    pub about: Option<String>,
    /// Already-hosted image URL
    pub image: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    pub rates: Option<Rates>,
    #[serde(default)]
    pub modes: Vec<ConsultationMode>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfluencerRequest {
    pub inf_id: String,
    pub rates: Option<Rates>,
    pub modes: Option<Vec<ConsultationMode>>,
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfluencerProfileRequest {
    pub about: Option<String>,
    pub available: Option<bool>,
    pub category: Option<String>,
    pub followers: Option<i64>,
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAvailabilityRequest {
    pub inf_id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}
