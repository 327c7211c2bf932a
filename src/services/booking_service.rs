// ==================== SLOT BOOKING ====================
// A slot is reserved on the influencer document with a single conditional
// update, so two identical requests can never both get it. The consultation
// record is written afterwards; if that fails the slot is handed back.

use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::{
    database::{parse_object_id, MongoDB},
    models::{
        slot_field_path, validate_slot, BookConsultationRequest, Consultation, ConsultationMode,
        Influencer, InfluencerProfile, SlotError, UserProfile,
    },
    utils::{validation::is_present, AppError, AppResult},
};

/// Validated booking input.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub user_id: ObjectId,
    pub inf_id: ObjectId,
    pub slot_date: String,
    pub slot_time: String,
    pub mode: ConsultationMode,
}

impl BookingRequest {
    pub fn parse(user_id: &str, request: &BookConsultationRequest) -> AppResult<Self> {
        if !(is_present(&request.inf_id)
            && is_present(&request.slot_date)
            && is_present(&request.slot_time)
            && is_present(&request.mode))
        {
            return Err(AppError::validation(
                "Missing required consultation details (infId, slotDate, slotTime, mode).",
            ));
        }

        // presence checked above
        let inf_id = request.inf_id.as_deref().unwrap_or_default();
        let slot_date = request.slot_date.as_deref().unwrap_or_default().trim();
        let slot_time = request.slot_time.as_deref().unwrap_or_default().trim();
        let mode = request.mode.as_deref().unwrap_or_default();

        validate_slot(slot_date, slot_time)?;

        Ok(BookingRequest {
            user_id: parse_object_id(user_id, "user")?,
            inf_id: parse_object_id(inf_id, "influencer")?,
            slot_date: slot_date.to_string(),
            slot_time: slot_time.to_string(),
            mode: mode.parse::<ConsultationMode>().map_err(AppError::Validation)?,
        })
    }
}

/// Checks the influencer can take this booking and returns its price.
///
/// Same order as the booking flow reports errors in: rate, availability,
/// then the slot itself.
pub fn quote(influencer: &Influencer, request: &BookingRequest) -> AppResult<f64> {
    let amount = influencer.rates.rate_for(request.mode).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid or missing consultation rate for mode: {}",
            request.mode
        ))
    })?;

    if !influencer.available {
        return Err(AppError::conflict("Influencer Not Available"));
    }

    if influencer
        .slots_booked
        .is_booked(&request.slot_date, &request.slot_time)
    {
        return Err(SlotError::AlreadyBooked.into());
    }

    Ok(amount)
}

pub async fn book_consultation(db: &MongoDB, request: BookingRequest) -> AppResult<Consultation> {
    log::info!(
        "📅 Booking {} slot {} {} with influencer {} for user {}",
        request.mode,
        request.slot_date,
        request.slot_time,
        request.inf_id,
        request.user_id
    );

    let user = db
        .users()
        .find_one(doc! { "_id": request.user_id })
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    let influencer = db
        .influencers()
        .find_one(doc! { "_id": request.inf_id })
        .await?
        .ok_or_else(|| AppError::not_found("Influencer not found."))?;

    let amount = quote(&influencer, &request)?;

    if !reserve_slot(db, request.inf_id, &request.slot_date, &request.slot_time).await? {
        // lost the race, or availability flipped since the read
        log::warn!(
            "⚠️ Slot {} {} of influencer {} was taken concurrently",
            request.slot_date,
            request.slot_time,
            request.inf_id
        );
        return Err(SlotError::AlreadyBooked.into());
    }

    let mut consultation = Consultation::book(
        UserProfile::from(user),
        InfluencerProfile::snapshot(&influencer),
        &request.slot_date,
        &request.slot_time,
        request.mode,
        amount,
        Utc::now().timestamp_millis(),
    );

    match db.consultations().insert_one(&consultation).await {
        Ok(result) => {
            consultation.id = result.inserted_id.as_object_id();
        }
        Err(e) => {
            log::error!("❌ Failed to save consultation, releasing slot: {}", e);
            if let Err(release_err) =
                release_slot(db, &request.inf_id.to_hex(), &request.slot_date, &request.slot_time).await
            {
                log::error!("❌ Slot release after failed booking also failed: {}", release_err);
            }
            return Err(e.into());
        }
    }

    log::info!(
        "✅ Consultation booked: {} ({} {})",
        consultation.id.map(|id| id.to_hex()).unwrap_or_default(),
        request.slot_date,
        request.slot_time
    );

    Ok(consultation)
}

/// Matches the influencer only while it is available and the time is still
/// free on that date.
pub fn reserve_filter(inf_id: ObjectId, slot_date: &str, slot_time: &str) -> Document {
    let path = slot_field_path(slot_date);
    doc! {
        "_id": inf_id,
        "available": true,
        &path: { "$ne": slot_time },
    }
}

pub fn reserve_update(slot_date: &str, slot_time: &str) -> Document {
    let path = slot_field_path(slot_date);
    doc! {
        "$push": { &path: slot_time },
        "$currentDate": { "updatedAt": true },
    }
}

pub fn release_update(slot_date: &str, slot_time: &str) -> Document {
    let path = slot_field_path(slot_date);
    doc! {
        "$pull": { &path: slot_time },
        "$currentDate": { "updatedAt": true },
    }
}

/// Matches the consultation only while it is still active.
pub fn cancel_filter(id: ObjectId) -> Document {
    doc! { "_id": id, "cancelled": false }
}

pub fn cancelled_update(cancelled: bool) -> Document {
    doc! { "$set": { "cancelled": cancelled } }
}

/// Pushes the time onto `slots_booked.<date>` only if the influencer is
/// available and the time is not already there. Returns whether it won.
pub async fn reserve_slot(
    db: &MongoDB,
    inf_id: ObjectId,
    slot_date: &str,
    slot_time: &str,
) -> AppResult<bool> {
    let result = db
        .influencers()
        .update_one(
            reserve_filter(inf_id, slot_date, slot_time),
            reserve_update(slot_date, slot_time),
        )
        .await?;

    Ok(result.modified_count == 1)
}

/// Removes the time from `slots_booked.<date>`. Missing slots are ignored.
pub async fn release_slot(db: &MongoDB, inf_id: &str, slot_date: &str, slot_time: &str) -> AppResult<()> {
    let inf_oid = parse_object_id(inf_id, "influencer")?;
    if validate_slot(slot_date, slot_time).is_err() {
        log::warn!("⚠️ Not releasing malformed slot '{}' '{}'", slot_date, slot_time);
        return Ok(());
    }

    let result = db
        .influencers()
        .update_one(doc! { "_id": inf_oid }, release_update(slot_date, slot_time))
        .await?;

    if result.matched_count == 0 {
        log::warn!("⚠️ Influencer {} not found while releasing slot", inf_id);
    } else {
        log::info!("🔓 Released slot {} {} of influencer {}", slot_date, slot_time, inf_id);
    }

    Ok(())
}

/// Flags a consultation cancelled and frees its slot.
///
/// If the slot cannot be freed the flag is set back, so the cancel can be
/// retried instead of leaving the slot taken for good.
pub async fn cancel(db: &MongoDB, consultation: &Consultation) -> AppResult<()> {
    let id = consultation
        .id
        .ok_or_else(|| AppError::internal("Consultation without _id"))?;

    // only the request that flips the flag hands the slot back
    let result = db
        .consultations()
        .update_one(cancel_filter(id), cancelled_update(true))
        .await?;

    if result.modified_count == 1 {
        if let Err(e) =
            release_slot(db, &consultation.inf_id, &consultation.slot_date, &consultation.slot_time).await
        {
            log::error!("❌ Failed to release slot of consultation {}, restoring it: {}", id.to_hex(), e);
            if let Err(revert_err) = db
                .consultations()
                .update_one(doc! { "_id": id, "cancelled": true }, cancelled_update(false))
                .await
            {
                log::error!("❌ Could not restore consultation {}: {}", id.to_hex(), revert_err);
            }
            return Err(e);
        }
    }

    log::info!("🚫 Consultation {} cancelled", id.to_hex());
    Ok(())
}
