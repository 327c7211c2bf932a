use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    database::MongoDB,
    middleware::RoleAuth,
    models::{
        to_responses, ConsultationActionRequest, LoginRequest, SearchRequest,
        UpdateInfluencerProfileRequest,
    },
    services::{influencer_service, AuthKeys, Claims, Role},
    utils::AppResult,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/influencer")
            .route("/login", web::post().to(login))
            .route("/list", web::get().to(list))
            .route("/search", web::post().to(search))
            .service(
                web::resource("/cancel-consultation")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::post().to(cancel_consultation)),
            )
            .service(
                web::resource("/consultations")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::get().to(consultations)),
            )
            .service(
                web::resource("/change-availability")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::post().to(change_availability)),
            )
            .service(
                web::resource("/complete-consultation")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::post().to(complete_consultation)),
            )
            .service(
                web::resource("/dashboard")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::get().to(dashboard)),
            )
            .service(
                web::resource("/profile")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::get().to(profile)),
            )
            .service(
                web::resource("/update-profile")
                    .wrap(RoleAuth::new(Role::Influencer))
                    .route(web::post().to(update_profile)),
            ),
    );
}

#[utoipa::path(
    post,
    path = "/api/influencer/login",
    tag = "Influencer",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token returned"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    keys: web::Data<AuthKeys>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    log::info!("🔐 POST /api/influencer/login - email: {}", request.email);

    let token = influencer_service::login(&db, &keys, &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[utoipa::path(
    get,
    path = "/api/influencer/list",
    tag = "Influencer",
    responses((status = 200, description = "Public influencer listing"))
)]
pub async fn list(db: web::Data<MongoDB>) -> AppResult<HttpResponse> {
    let influencers = influencer_service::list(&db).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "influencers": influencers })))
}

#[utoipa::path(
    post,
    path = "/api/influencer/search",
    tag = "Influencer",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Influencers whose name contains the query"),
        (status = 400, description = "No search query provided")
    )
)]
pub async fn search(db: web::Data<MongoDB>, request: web::Json<SearchRequest>) -> AppResult<HttpResponse> {
    let influencers = influencer_service::search(&db, &request.query).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "influencers": influencers })))
}

#[utoipa::path(
    get,
    path = "/api/influencer/consultations",
    tag = "Influencer",
    responses((status = 200, description = "Active consultations, latest slot first")),
    security(("influencer_token" = []))
)]
pub async fn consultations(db: web::Data<MongoDB>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let consultations = influencer_service::consultations(&db, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "consultations": to_responses(consultations),
    })))
}

#[utoipa::path(
    post,
    path = "/api/influencer/cancel-consultation",
    tag = "Influencer",
    request_body = ConsultationActionRequest,
    responses(
        (status = 200, description = "Consultation cancelled, slot released"),
        (status = 404, description = "Consultation not found or unauthorized")
    ),
    security(("influencer_token" = []))
)]
pub async fn cancel_consultation(
    db: web::Data<MongoDB>,
    claims: web::ReqData<Claims>,
    request: web::Json<ConsultationActionRequest>,
) -> AppResult<HttpResponse> {
    log::info!("🚫 POST /api/influencer/cancel-consultation - {}", request.consultation_id);

    influencer_service::cancel_consultation(&db, &claims.sub, &request.consultation_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Consultation cancelled" })))
}

#[utoipa::path(
    post,
    path = "/api/influencer/complete-consultation",
    tag = "Influencer",
    request_body = ConsultationActionRequest,
    responses(
        (status = 200, description = "Consultation marked completed"),
        (status = 404, description = "Consultation not found or unauthorized"),
        (status = 409, description = "Consultation was cancelled")
    ),
    security(("influencer_token" = []))
)]
pub async fn complete_consultation(
    db: web::Data<MongoDB>,
    claims: web::ReqData<Claims>,
    request: web::Json<ConsultationActionRequest>,
) -> AppResult<HttpResponse> {
    influencer_service::complete_consultation(&db, &claims.sub, &request.consultation_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Consultation completed" })))
}

#[utoipa::path(
    post,
    path = "/api/influencer/change-availability",
    tag = "Influencer",
    responses((status = 200, description = "Availability toggled, new value returned")),
    security(("influencer_token" = []))
)]
pub async fn change_availability(db: web::Data<MongoDB>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let available = influencer_service::change_availability(&db, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Availability updated",
        "available": available,
    })))
}

#[utoipa::path(
    get,
    path = "/api/influencer/dashboard",
    tag = "Influencer",
    responses((status = 200, description = "Earnings, counts and latest consultations")),
    security(("influencer_token" = []))
)]
pub async fn dashboard(db: web::Data<MongoDB>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let dash_data = influencer_service::dashboard(&db, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "dashData": dash_data })))
}

#[utoipa::path(
    get,
    path = "/api/influencer/profile",
    tag = "Influencer",
    responses((status = 200, description = "Own profile, email included")),
    security(("influencer_token" = []))
)]
pub async fn profile(db: web::Data<MongoDB>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let profile_data = influencer_service::profile(&db, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "profileData": profile_data })))
}

#[utoipa::path(
    post,
    path = "/api/influencer/update-profile",
    tag = "Influencer",
    request_body = UpdateInfluencerProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Invalid or empty update")
    ),
    security(("influencer_token" = []))
)]
pub async fn update_profile(
    db: web::Data<MongoDB>,
    claims: web::ReqData<Claims>,
    request: web::Json<UpdateInfluencerProfileRequest>,
) -> AppResult<HttpResponse> {
    let profile_data = influencer_service::update_profile(&db, &claims.sub, &request).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "profileData": profile_data,
    })))
}
