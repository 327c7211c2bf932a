use futures::TryStreamExt;
use mongodb::bson::{doc, Document, Regex};
use mongodb::options::ReturnDocument;

use crate::{
    database::{parse_object_id, MongoDB},
    models::{
        Consultation, Influencer, InfluencerProfile, InfluencerSearchHit, LoginRequest,
        SocialLinks, UpdateInfluencerProfileRequest,
    },
    services::{
        auth_service::{verify_password, AuthKeys, Role},
        booking_service,
        stats_service::{self, InfluencerDashboard},
    },
    utils::{
        validation::{escape_regex, normalize_email},
        AppError, AppResult,
    },
};

const NOT_OWNED: &str = "Consultation not found or unauthorized";

pub async fn login(db: &MongoDB, keys: &AuthKeys, request: &LoginRequest) -> AppResult<String> {
    let email = normalize_email(&request.email);

    let influencer = db
        .influencers()
        .find_one(doc! { "email": &email })
        .await?
        .filter(|inf| verify_password(&request.password, &inf.password))
        .ok_or_else(|| {
            log::warn!("⚠️ Failed login for influencer {}", email);
            AppError::unauthorized("Invalid credentials")
        })?;

    log::info!("✅ Influencer login: {}", email);
    keys.issue(&influencer.id_hex(), Role::Influencer)
}

async fn load(db: &MongoDB, inf_id: &str) -> AppResult<Influencer> {
    let id = parse_object_id(inf_id, "influencer")?;
    db.influencers()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::not_found("Influencer not found"))
}

pub async fn profile(db: &MongoDB, inf_id: &str) -> AppResult<InfluencerProfile> {
    Ok(InfluencerProfile::full(load(db, inf_id).await?))
}

/// Builds the `$set` for a self-service profile edit. Only provided fields
/// are written; `None` means nothing to change.
pub fn profile_update(
    current: &Influencer,
    request: &UpdateInfluencerProfileRequest,
) -> AppResult<Option<Document>> {
    let mut set = Document::new();

    if let Some(about) = &request.about {
        set.insert("about", about.trim());
    }
    if let Some(category) = request.category.as_deref().map(str::trim) {
        if category.is_empty() {
            return Err(AppError::validation("Category cannot be empty"));
        }
        set.insert("category", category);
    }
    if let Some(available) = request.available {
        set.insert("available", available);
    }
    if let Some(followers) = request.followers {
        if followers < 0 {
            return Err(AppError::validation("Followers must be a non-negative number"));
        }
        set.insert("followers", followers);
    }
    if let Some(links) = &request.social_links {
        // merged over the stored links; the result must keep one
        let merged = SocialLinks {
            instagram: links.instagram.clone().or_else(|| current.social_links.instagram.clone()),
            youtube: links.youtube.clone().or_else(|| current.social_links.youtube.clone()),
            facebook: links.facebook.clone().or_else(|| current.social_links.facebook.clone()),
            twitter: links.twitter.clone().or_else(|| current.social_links.twitter.clone()),
            tiktok: links.tiktok.clone().or_else(|| current.social_links.tiktok.clone()),
        };
        if !merged.has_any() {
            return Err(AppError::validation("At least one social media link is required"));
        }
        set.insert("socialLinks", mongodb::bson::to_bson(&merged)?);
    }

    Ok((!set.is_empty()).then_some(set))
}

pub async fn update_profile(
    db: &MongoDB,
    inf_id: &str,
    request: &UpdateInfluencerProfileRequest,
) -> AppResult<InfluencerProfile> {
    let current = load(db, inf_id).await?;

    let Some(set) = profile_update(&current, request)? else {
        return Err(AppError::validation("No profile fields to update"));
    };

    let id = parse_object_id(inf_id, "influencer")?;
    db.influencers()
        .update_one(
            doc! { "_id": id },
            doc! { "$set": set, "$currentDate": { "updatedAt": true } },
        )
        .await?;

    log::info!("✅ Profile updated for influencer {}", inf_id);
    profile(db, inf_id).await
}

/// Aggregation-pipeline update that negates `available` on the server.
pub fn availability_toggle() -> Vec<Document> {
    vec![doc! {
        "$set": {
            "available": { "$not": "$available" },
            "updatedAt": "$$NOW",
        }
    }]
}

/// Flips `available` and returns the new value. Shared with the admin route.
pub async fn change_availability(db: &MongoDB, inf_id: &str) -> AppResult<bool> {
    let id = parse_object_id(inf_id, "influencer")?;

    let updated = db
        .influencers()
        .find_one_and_update(doc! { "_id": id }, availability_toggle())
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::not_found("Influencer not found"))?;

    log::info!("🔁 Influencer {} availability -> {}", inf_id, updated.available);
    Ok(updated.available)
}

/// Public listing for the booking pages.
pub async fn list(db: &MongoDB) -> AppResult<Vec<InfluencerProfile>> {
    let influencers = db
        .influencers()
        .find(doc! {})
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    Ok(influencers.into_iter().map(InfluencerProfile::public).collect())
}

pub async fn search(db: &MongoDB, query: &str) -> AppResult<Vec<InfluencerSearchHit>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::validation("No search query provided"));
    }

    let pattern = Regex {
        pattern: escape_regex(query),
        options: "i".to_string(),
    };

    let hits = db
        .influencers()
        .find(doc! { "name": { "$regex": pattern } })
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    log::info!("🔎 Search '{}' matched {} influencers", query, hits.len());
    Ok(hits.into_iter().map(InfluencerSearchHit::from).collect())
}

/// Non-cancelled consultations, furthest slot date first.
pub async fn consultations(db: &MongoDB, inf_id: &str) -> AppResult<Vec<Consultation>> {
    let mut consultations = db
        .consultations()
        .find(doc! { "infId": inf_id, "cancelled": { "$ne": true } })
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    stats_service::sort_by_slot_date_desc(&mut consultations);
    Ok(consultations)
}

async fn owned_consultation(db: &MongoDB, inf_id: &str, consultation_id: &str) -> AppResult<Consultation> {
    let id = parse_object_id(consultation_id, "consultation")?;
    db.consultations()
        .find_one(doc! { "_id": id })
        .await?
        .filter(|c| c.inf_id == inf_id)
        .ok_or_else(|| AppError::not_found(NOT_OWNED))
}

pub async fn cancel_consultation(db: &MongoDB, inf_id: &str, consultation_id: &str) -> AppResult<()> {
    let consultation = owned_consultation(db, inf_id, consultation_id).await?;
    booking_service::cancel(db, &consultation).await
}

pub async fn complete_consultation(db: &MongoDB, inf_id: &str, consultation_id: &str) -> AppResult<()> {
    let consultation = owned_consultation(db, inf_id, consultation_id).await?;
    if consultation.cancelled {
        return Err(AppError::conflict("Cancelled consultation cannot be completed"));
    }

    db.consultations()
        .update_one(
            doc! { "_id": consultation.id },
            doc! { "$set": { "isCompleted": true } },
        )
        .await?;

    log::info!("✅ Consultation {} completed", consultation_id);
    Ok(())
}

pub async fn dashboard(db: &MongoDB, inf_id: &str) -> AppResult<InfluencerDashboard> {
    let consultations = db
        .consultations()
        .find(doc! { "infId": inf_id })
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    Ok(stats_service::influencer_dashboard(consultations))
}
