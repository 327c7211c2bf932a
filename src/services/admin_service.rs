use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::ReturnDocument;

use crate::{
    database::{parse_object_id, MongoDB},
    models::{
        AddInfluencerRequest, Consultation, Influencer, InfluencerProfile, Rates, SlotsBooked,
        UpdateInfluencerRequest,
    },
    services::{
        auth_service::hash_password,
        booking_service, influencer_service,
        stats_service::{self, AdminDashboard, InfluencerStats},
    },
    utils::{
        validation::{is_present, is_strong_password, is_valid_email, normalize_email},
        AppError, AppResult,
    },
};

/// Checks an add-influencer form and builds the document to insert.
/// The password is still plain text here; `add_influencer` hashes it.
pub fn new_influencer(request: &AddInfluencerRequest, now_millis: i64) -> AppResult<Influencer> {
    let required = [
        &request.name,
        &request.email,
        &request.password,
        &request.category,
        &request.about,
    ];
    if !required.iter().all(|field| is_present(field))
        || request.followers.is_none()
        || request.rates.as_ref().map(Rates::is_empty).unwrap_or(true)
    {
        return Err(AppError::validation("Missing required details"));
    }

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    let password = request.password.clone().unwrap_or_default();
    let followers = request.followers.unwrap_or_default();
    let rates = request.rates.clone().unwrap_or_default();

    if !is_valid_email(&email) {
        return Err(AppError::validation("Please enter a valid email"));
    }
    if !is_strong_password(&password) {
        return Err(AppError::validation("Please enter a strong password"));
    }
    if followers < 0 {
        return Err(AppError::validation("Followers must be a non-negative number"));
    }
    if !request.social_links.has_any() {
        return Err(AppError::validation("At least one social media link is required"));
    }
    rates.validate().map_err(AppError::Validation)?;

    let trimmed = |field: &Option<String>| field.as_deref().unwrap_or_default().trim().to_string();

    Ok(Influencer {
        id: None,
        name: trimmed(&request.name),
        email,
        password,
        image: trimmed(&request.image),
        category: trimmed(&request.category),
        followers,
        social_links: request.social_links.clone(),
        about: trimmed(&request.about),
        available: true,
        rates,
        modes: request.modes.clone(),
        slots_booked: SlotsBooked::new(),
        date: now_millis,
        created_at: None,
        updated_at: None,
    })
}

pub async fn add_influencer(db: &MongoDB, request: &AddInfluencerRequest) -> AppResult<InfluencerProfile> {
    let mut influencer = new_influencer(request, Utc::now().timestamp_millis())?;

    if db
        .influencers()
        .find_one(doc! { "email": &influencer.email })
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Influencer with this email already exists"));
    }

    influencer.password = hash_password(&influencer.password)?;
    let now = mongodb::bson::DateTime::now();
    influencer.created_at = Some(now);
    influencer.updated_at = Some(now);

    let result = db.influencers().insert_one(&influencer).await.map_err(|e| {
        let err = AppError::from(e);
        if err.is_duplicate_key() {
            AppError::conflict("Influencer with this email already exists")
        } else {
            err
        }
    })?;
    influencer.id = result.inserted_id.as_object_id();

    log::info!("✅ Influencer added: {} ({})", influencer.email, influencer.id_hex());
    Ok(InfluencerProfile::full(influencer))
}

pub async fn all_influencers(db: &MongoDB) -> AppResult<Vec<InfluencerProfile>> {
    Ok(load_influencers(db)
        .await?
        .into_iter()
        .map(InfluencerProfile::full)
        .collect())
}

async fn load_influencers(db: &MongoDB) -> AppResult<Vec<Influencer>> {
    let influencers = db
        .influencers()
        .find(doc! {})
        .sort(doc! { "date": 1 })
        .await?
        .try_collect::<Vec<_>>()
        .await?;
    Ok(influencers)
}

pub async fn consultations(db: &MongoDB) -> AppResult<Vec<Consultation>> {
    let consultations = db
        .consultations()
        .find(doc! {})
        .sort(doc! { "date": -1 })
        .await?
        .try_collect::<Vec<_>>()
        .await?;
    Ok(consultations)
}

pub async fn cancel_consultation(db: &MongoDB, consultation_id: &str) -> AppResult<()> {
    let id = parse_object_id(consultation_id, "consultation")?;

    let consultation = db
        .consultations()
        .find_one(doc! { "_id": id })
        .await?
        .ok_or_else(|| AppError::not_found("Consultation not found"))?;

    booking_service::cancel(db, &consultation).await
}

pub async fn change_availability(db: &MongoDB, inf_id: &str) -> AppResult<bool> {
    influencer_service::change_availability(db, inf_id).await
}

pub async fn dashboard(db: &MongoDB) -> AppResult<AdminDashboard> {
    let influencer_count = db.influencers().count_documents(doc! {}).await?;
    let user_count = db.users().count_documents(doc! {}).await?;
    let consultations = consultations(db).await?;

    Ok(stats_service::admin_dashboard(influencer_count, user_count, consultations))
}

/// `$set` for the admin edit. Empty parts of the request are skipped.
pub fn influencer_update(request: &UpdateInfluencerRequest) -> AppResult<Document> {
    let mut set = Document::new();

    if let Some(rates) = request.rates.as_ref().filter(|r| !r.is_empty()) {
        rates.validate().map_err(AppError::Validation)?;
        set.insert("rates", to_bson(rates)?);
    }
    if let Some(modes) = request.modes.as_ref().filter(|m| !m.is_empty()) {
        set.insert("modes", to_bson(modes)?);
    }
    if let Some(links) = request.social_links.as_ref().filter(|l| l.has_any()) {
        set.insert("socialLinks", to_bson(links)?);
    }

    if set.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }
    Ok(set)
}

pub async fn update_influencer(db: &MongoDB, request: &UpdateInfluencerRequest) -> AppResult<InfluencerProfile> {
    let id = parse_object_id(&request.inf_id, "influencer")?;
    let set = influencer_update(request)?;

    let updated = db
        .influencers()
        .find_one_and_update(
            doc! { "_id": id },
            doc! { "$set": set, "$currentDate": { "updatedAt": true } },
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::not_found("Influencer not found"))?;

    log::info!("✅ Influencer {} updated by admin", request.inf_id);
    Ok(InfluencerProfile::full(updated))
}

pub async fn influencers_stats(db: &MongoDB) -> AppResult<Vec<InfluencerStats>> {
    let influencers = load_influencers(db).await?;
    let consultations = db
        .consultations()
        .find(doc! {})
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    Ok(stats_service::aggregate_influencer_stats(&influencers, &consultations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsultationMode, SocialLinks};

    fn request() -> AddInfluencerRequest {
        AddInfluencerRequest {
            name: Some(" Kabir ".into()),
            email: Some("Kabir@Example.com".into()),
            password: Some("supersecret".into()),
            category: Some("Music".into()),
            followers: Some(42_000),
            about: Some("Producer".into()),
            image: None,
            social_links: SocialLinks {
                instagram: Some("https://instagram.com/kabir".into()),
                ..Default::default()
            },
            rates: Some(Rates { chat: Some(5.0), call: Some(12.5), video: None }),
            modes: vec![ConsultationMode::Chat, ConsultationMode::Call],
        }
    }

    #[test]
    fn new_influencer_starts_available_with_no_slots() {
        let inf = new_influencer(&request(), 1_760_000_000_000).unwrap();
        assert_eq!(inf.name, "Kabir");
        assert_eq!(inf.email, "kabir@example.com");
        assert!(inf.available);
        assert_eq!(inf.slots_booked, SlotsBooked::new());
        assert_eq!(inf.date, 1_760_000_000_000);
        assert_eq!(inf.rates.rate_for(ConsultationMode::Call), Some(12.5));
    }

    #[test]
    fn missing_details_are_rejected() {
        let mut no_rates = request();
        no_rates.rates = Some(Rates::default());
        assert_eq!(
            new_influencer(&no_rates, 0).unwrap_err().to_string(),
            "Missing required details"
        );

        let mut no_followers = request();
        no_followers.followers = None;
        assert!(new_influencer(&no_followers, 0).is_err());

        let mut blank_about = request();
        blank_about.about = Some(" ".into());
        assert!(new_influencer(&blank_about, 0).is_err());
    }

    #[test]
    fn form_rules_are_checked() {
        let mut bad_email = request();
        bad_email.email = Some("kabir".into());
        assert_eq!(
            new_influencer(&bad_email, 0).unwrap_err().to_string(),
            "Please enter a valid email"
        );

        let mut no_links = request();
        no_links.social_links = SocialLinks::default();
        assert_eq!(
            new_influencer(&no_links, 0).unwrap_err().to_string(),
            "At least one social media link is required"
        );

        let mut negative_rate = request();
        negative_rate.rates = Some(Rates { chat: Some(-3.0), ..Default::default() });
        assert!(matches!(new_influencer(&negative_rate, 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn update_skips_empty_parts() {
        let request = UpdateInfluencerRequest {
            inf_id: "x".into(),
            rates: Some(Rates { video: Some(50.0), ..Default::default() }),
            modes: Some(vec![]),
            social_links: Some(SocialLinks::default()),
        };
        let set = influencer_update(&request).unwrap();
        assert!(set.contains_key("rates"));
        assert!(!set.contains_key("modes"));
        assert!(!set.contains_key("socialLinks"));
    }

    #[test]
    fn update_with_nothing_is_rejected() {
        let request = UpdateInfluencerRequest {
            inf_id: "x".into(),
            rates: None,
            modes: None,
            social_links: None,
        };
        assert!(matches!(influencer_update(&request), Err(AppError::Validation(_))));
    }
}
