use futures::TryStreamExt;
use mongodb::bson::doc;

use crate::{
    database::{parse_object_id, MongoDB},
    models::{
        BookConsultationRequest, Consultation, LoginRequest, RegisterUserRequest,
        UpdateUserProfileRequest, User, UserProfile,
    },
    services::{
        auth_service::{hash_password, verify_password, AuthKeys, Role},
        booking_service::{self, BookingRequest},
    },
    utils::{
        validation::{is_present, is_strong_password, is_valid_email, normalize_email},
        AppError, AppResult,
    },
};

/// Fields a new account needs, already trimmed and checked.
#[derive(Debug, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(request: &RegisterUserRequest) -> AppResult<NewAccount> {
    if !(is_present(&request.name) && is_present(&request.email) && is_present(&request.password)) {
        return Err(AppError::validation("Missing Details"));
    }

    let name = request.name.as_deref().unwrap_or_default().trim().to_string();
    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    let password = request.password.clone().unwrap_or_default();

    if !is_valid_email(&email) {
        return Err(AppError::validation("Please enter a valid email"));
    }
    if !is_strong_password(&password) {
        return Err(AppError::validation("Please enter a strong password"));
    }

    Ok(NewAccount { name, email, password })
}

pub async fn register(db: &MongoDB, keys: &AuthKeys, request: &RegisterUserRequest) -> AppResult<String> {
    let account = validate_registration(request)?;

    if db.users().find_one(doc! { "email": &account.email }).await?.is_some() {
        return Err(AppError::conflict("User already exists"));
    }

    let user = User::new(account.name, account.email, hash_password(&account.password)?);

    let result = db.users().insert_one(&user).await.map_err(|e| {
        let err = AppError::from(e);
        // lost a race against the unique index
        if err.is_duplicate_key() {
            AppError::conflict("User already exists")
        } else {
            err
        }
    })?;

    let id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::internal("Inserted user has no ObjectId"))?;

    log::info!("✅ User registered: {} ({})", user.email, id.to_hex());
    keys.issue(&id.to_hex(), Role::User)
}

pub async fn login(db: &MongoDB, keys: &AuthKeys, request: &LoginRequest) -> AppResult<String> {
    let email = normalize_email(&request.email);

    let user = db
        .users()
        .find_one(doc! { "email": &email })
        .await?
        .ok_or_else(|| AppError::unauthorized("User does not exist"))?;

    if !verify_password(&request.password, &user.password) {
        log::warn!("⚠️ Failed login for user {}", email);
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let id = user
        .id
        .ok_or_else(|| AppError::internal("Stored user has no _id"))?;

    log::info!("✅ User login: {}", email);
    keys.issue(&id.to_hex(), Role::User)
}

pub async fn get_profile(db: &MongoDB, user_id: &str) -> AppResult<UserProfile> {
    let id = parse_object_id(user_id, "user")?;

    db.users()
        .find_one(doc! { "_id": id })
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::not_found("User not found."))
}

pub async fn update_profile(db: &MongoDB, user_id: &str, request: &UpdateUserProfileRequest) -> AppResult<()> {
    if !(is_present(&request.name)
        && is_present(&request.phone)
        && is_present(&request.dob)
        && is_present(&request.gender))
    {
        return Err(AppError::validation("Data Missing"));
    }

    let id = parse_object_id(user_id, "user")?;

    let mut set = doc! {
        "name": request.name.as_deref().unwrap_or_default().trim(),
        "phone": request.phone.as_deref().unwrap_or_default().trim(),
        "dob": request.dob.as_deref().unwrap_or_default().trim(),
        "gender": request.gender.as_deref().unwrap_or_default().trim(),
    };
    if let Some(image) = request.image.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        set.insert("image", image);
    }

    let result = db.users().update_one(doc! { "_id": id }, doc! { "$set": set }).await?;
    if result.matched_count == 0 {
        return Err(AppError::not_found("User not found."));
    }

    log::info!("✅ Profile updated for user {}", user_id);
    Ok(())
}

pub async fn book_consultation(
    db: &MongoDB,
    user_id: &str,
    request: &BookConsultationRequest,
) -> AppResult<Consultation> {
    let booking = BookingRequest::parse(user_id, request)?;
    booking_service::book_consultation(db, booking).await
}

pub async fn list_consultations(db: &MongoDB, user_id: &str) -> AppResult<Vec<Consultation>> {
    let consultations = db
        .consultations()
        .find(doc! { "userId": user_id })
        .sort(doc! { "date": -1 })
        .await?
        .try_collect::<Vec<_>>()
        .await?;

    Ok(consultations)
}

pub async fn cancel_consultation(db: &MongoDB, user_id: &str, consultation_id: &str) -> AppResult<()> {
    let id = parse_object_id(consultation_id, "consultation")?;

    let consultation = db
        .consultations()
        .find_one(doc! { "_id": id })
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or_else(|| AppError::unauthorized("Unauthorized action or Consultation not found"))?;

    booking_service::cancel(db, &consultation).await
}
