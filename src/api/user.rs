use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    database::MongoDB,
    middleware::RoleAuth,
    models::{
        to_responses, BookConsultationRequest, ConsultationActionRequest, LoginRequest,
        RegisterUserRequest, UpdateUserProfileRequest,
    },
    services::{user_service, AuthKeys, Claims, Role},
    utils::AppResult,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/user")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/get-profile")
                    .wrap(RoleAuth::new(Role::User))
                    .route(web::get().to(get_profile)),
            )
            .service(
                web::resource("/update-profile")
                    .wrap(RoleAuth::new(Role::User))
                    .route(web::post().to(update_profile)),
            )
            .service(
                web::resource("/book-consultation")
                    .wrap(RoleAuth::new(Role::User))
                    .route(web::post().to(book_consultation)),
            )
            .service(
                web::resource("/consultations")
                    .wrap(RoleAuth::new(Role::User))
                    .route(web::get().to(list_consultations)),
            )
            .service(
                web::resource("/cancel-consultation")
                    .wrap(RoleAuth::new(Role::User))
                    .route(web::post().to(cancel_consultation)),
            ),
    );
}

#[utoipa::path(
    post,
    path = "/api/user/register",
    tag = "User",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Account created, token returned"),
        (status = 400, description = "Missing or invalid details"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    keys: web::Data<AuthKeys>,
    request: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    log::info!("📝 POST /api/user/register - email: {}", request.email.as_deref().unwrap_or("N/A"));

    let token = user_service::register(&db, &keys, &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = "User",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token returned"),
        (status = 401, description = "Unknown user or wrong password")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    keys: web::Data<AuthKeys>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    log::info!("🔐 POST /api/user/login - email: {}", request.email);

    let token = user_service::login(&db, &keys, &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[utoipa::path(
    get,
    path = "/api/user/get-profile",
    tag = "User",
    responses(
        (status = 200, description = "Profile of the logged-in user"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("user_token" = []))
)]
pub async fn get_profile(db: web::Data<MongoDB>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let user_data = user_service::get_profile(&db, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "userData": user_data })))
}

#[utoipa::path(
    post,
    path = "/api/user/update-profile",
    tag = "User",
    request_body = UpdateUserProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Data Missing")
    ),
    security(("user_token" = []))
)]
pub async fn update_profile(
    db: web::Data<MongoDB>,
    claims: web::ReqData<Claims>,
    request: web::Json<UpdateUserProfileRequest>,
) -> AppResult<HttpResponse> {
    user_service::update_profile(&db, &claims.sub, &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Profile Updated" })))
}

#[utoipa::path(
    post,
    path = "/api/user/book-consultation",
    tag = "User",
    request_body = BookConsultationRequest,
    responses(
        (status = 200, description = "Consultation booked"),
        (status = 400, description = "Missing details, bad id or no rate for the mode"),
        (status = 404, description = "User or influencer not found"),
        (status = 409, description = "Influencer or slot not available")
    ),
    security(("user_token" = []))
)]
pub async fn book_consultation(
    db: web::Data<MongoDB>,
    claims: web::ReqData<Claims>,
    request: web::Json<BookConsultationRequest>,
) -> AppResult<HttpResponse> {
    log::info!("📅 POST /api/user/book-consultation - user: {}", claims.sub);

    user_service::book_consultation(&db, &claims.sub, &request).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Consultation Booked" })))
}

#[utoipa::path(
    get,
    path = "/api/user/consultations",
    tag = "User",
    responses((status = 200, description = "Consultations of the logged-in user")),
    security(("user_token" = []))
)]
pub async fn list_consultations(db: web::Data<MongoDB>, claims: web::ReqData<Claims>) -> AppResult<HttpResponse> {
    let consultations = user_service::list_consultations(&db, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "consultations": to_responses(consultations),
    })))
}

#[utoipa::path(
    post,
    path = "/api/user/cancel-consultation",
    tag = "User",
    request_body = ConsultationActionRequest,
    responses(
        (status = 200, description = "Consultation cancelled, slot released"),
        (status = 401, description = "Not the owner, or no such consultation")
    ),
    security(("user_token" = []))
)]
pub async fn cancel_consultation(
    db: web::Data<MongoDB>,
    claims: web::ReqData<Claims>,
    request: web::Json<ConsultationActionRequest>,
) -> AppResult<HttpResponse> {
    log::info!("🚫 POST /api/user/cancel-consultation - {}", request.consultation_id);

    user_service::cancel_consultation(&db, &claims.sub, &request.consultation_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Consultation Cancelled" })))
}
