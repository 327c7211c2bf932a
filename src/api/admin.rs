use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    database::MongoDB,
    middleware::RoleAuth,
    models::{
        to_responses, AddInfluencerRequest, ChangeAvailabilityRequest, ConsultationActionRequest,
        LoginRequest, UpdateInfluencerRequest,
    },
    services::{admin_service, stats_service::InfluencerStats, AuthKeys, Role},
    utils::AppResult,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .route("/login", web::post().to(login))
            // everything below needs an admin token
            .service(
                web::scope("")
                    .wrap(RoleAuth::new(Role::Admin))
                    .route("/add-influencer", web::post().to(add_influencer))
                    .route("/consultations", web::get().to(consultations))
                    .route("/cancel-consultation", web::post().to(cancel_consultation))
                    .route("/all-influencers", web::get().to(all_influencers))
                    .route("/change-availability", web::post().to(change_availability))
                    .route("/dashboard", web::get().to(dashboard))
                    .route("/update-influencer", web::post().to(update_influencer))
                    .route("/influencers-stats", web::get().to(influencers_stats)),
            ),
    );
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token returned"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(keys: web::Data<AuthKeys>, request: web::Json<LoginRequest>) -> AppResult<HttpResponse> {
    log::info!("🔐 POST /api/admin/login - email: {}", request.email);

    let token = keys.admin_login(&request)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[utoipa::path(
    post,
    path = "/api/admin/add-influencer",
    tag = "Admin",
    request_body = AddInfluencerRequest,
    responses(
        (status = 200, description = "Influencer added"),
        (status = 400, description = "Missing or invalid details"),
        (status = 409, description = "Email already registered")
    ),
    security(("admin_token" = []))
)]
pub async fn add_influencer(
    db: web::Data<MongoDB>,
    request: web::Json<AddInfluencerRequest>,
) -> AppResult<HttpResponse> {
    log::info!("➕ POST /api/admin/add-influencer - email: {}", request.email.as_deref().unwrap_or("N/A"));

    admin_service::add_influencer(&db, &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Influencer added successfully" })))
}

#[utoipa::path(
    get,
    path = "/api/admin/consultations",
    tag = "Admin",
    responses((status = 200, description = "Every consultation, newest booking first")),
    security(("admin_token" = []))
)]
pub async fn consultations(db: web::Data<MongoDB>) -> AppResult<HttpResponse> {
    let consultations = admin_service::consultations(&db).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "consultations": to_responses(consultations),
    })))
}

#[utoipa::path(
    post,
    path = "/api/admin/cancel-consultation",
    tag = "Admin",
    request_body = ConsultationActionRequest,
    responses(
        (status = 200, description = "Consultation cancelled, slot released"),
        (status = 404, description = "Consultation not found")
    ),
    security(("admin_token" = []))
)]
pub async fn cancel_consultation(
    db: web::Data<MongoDB>,
    request: web::Json<ConsultationActionRequest>,
) -> AppResult<HttpResponse> {
    log::info!("🚫 POST /api/admin/cancel-consultation - {}", request.consultation_id);

    admin_service::cancel_consultation(&db, &request.consultation_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Consultation Cancelled" })))
}

#[utoipa::path(
    get,
    path = "/api/admin/all-influencers",
    tag = "Admin",
    responses((status = 200, description = "Every influencer with email, no password")),
    security(("admin_token" = []))
)]
pub async fn all_influencers(db: web::Data<MongoDB>) -> AppResult<HttpResponse> {
    let influencers = admin_service::all_influencers(&db).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "influencers": influencers })))
}

#[utoipa::path(
    post,
    path = "/api/admin/change-availability",
    tag = "Admin",
    request_body = ChangeAvailabilityRequest,
    responses(
        (status = 200, description = "Availability toggled, new value returned"),
        (status = 404, description = "Influencer not found")
    ),
    security(("admin_token" = []))
)]
pub async fn change_availability(
    db: web::Data<MongoDB>,
    request: web::Json<ChangeAvailabilityRequest>,
) -> AppResult<HttpResponse> {
    let available = admin_service::change_availability(&db, &request.inf_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Availability updated",
        "available": available,
    })))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    responses((status = 200, description = "Platform totals and latest bookings")),
    security(("admin_token" = []))
)]
pub async fn dashboard(db: web::Data<MongoDB>) -> AppResult<HttpResponse> {
    let dash_data = admin_service::dashboard(&db).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "dashData": dash_data })))
}

#[utoipa::path(
    post,
    path = "/api/admin/update-influencer",
    tag = "Admin",
    request_body = UpdateInfluencerRequest,
    responses(
        (status = 200, description = "Updated influencer returned"),
        (status = 400, description = "Nothing to update or invalid rates"),
        (status = 404, description = "Influencer not found")
    ),
    security(("admin_token" = []))
)]
pub async fn update_influencer(
    db: web::Data<MongoDB>,
    request: web::Json<UpdateInfluencerRequest>,
) -> AppResult<HttpResponse> {
    let influencer = admin_service::update_influencer(&db, &request).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Influencer updated successfully",
        "influencer": influencer,
    })))
}

#[utoipa::path(
    get,
    path = "/api/admin/influencers-stats",
    tag = "Admin",
    responses((status = 200, description = "Per-influencer totals", body = [InfluencerStats])),
    security(("admin_token" = []))
)]
pub async fn influencers_stats(db: web::Data<MongoDB>) -> AppResult<HttpResponse> {
    let stats = admin_service::influencers_stats(&db).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats })))
}
