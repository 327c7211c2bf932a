use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Connecto API",
        version = "1.0.0",
        description = "Paid consultations (chat, call, video) between users and influencers.\n\n**Authentication:** protected routes take the JWT from the role header (`token`, `itoken`, `aToken`) or `Authorization: Bearer`.",
        contact(
            name = "Connecto Team",
            email = "support@connecto.dev"
        )
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // User
        crate::api::user::register,
        crate::api::user::login,
        crate::api::user::get_profile,
        crate::api::user::update_profile,
        crate::api::user::book_consultation,
        crate::api::user::list_consultations,
        crate::api::user::cancel_consultation,

        // Influencer
        crate::api::influencer::login,
        crate::api::influencer::list,
        crate::api::influencer::search,
        crate::api::influencer::consultations,
        crate::api::influencer::cancel_consultation,
        crate::api::influencer::complete_consultation,
        crate::api::influencer::change_availability,
        crate::api::influencer::dashboard,
        crate::api::influencer::profile,
        crate::api::influencer::update_profile,

        // Admin
        crate::api::admin::login,
        crate::api::admin::add_influencer,
        crate::api::admin::consultations,
        crate::api::admin::cancel_consultation,
        crate::api::admin::all_influencers,
        crate::api::admin::change_availability,
        crate::api::admin::dashboard,
        crate::api::admin::update_influencer,
        crate::api::admin::influencers_stats,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::RegisterUserRequest,
            crate::models::LoginRequest,
            crate::models::UpdateUserProfileRequest,
            crate::models::BookConsultationRequest,
            crate::models::ConsultationActionRequest,
            crate::models::AddInfluencerRequest,
            crate::models::UpdateInfluencerRequest,
            crate::models::UpdateInfluencerProfileRequest,
            crate::models::ChangeAvailabilityRequest,
            crate::models::SearchRequest,
            crate::models::ConsultationMode,
            crate::models::Rates,
            crate::models::SocialLinks,
            crate::services::stats_service::InfluencerStats,
            crate::services::stats_service::ModeShare,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database connectivity."),
        (name = "User", description = "Registration, profile, booking and cancelling consultations."),
        (name = "Influencer", description = "Influencer login, public listing and search, own consultations and dashboard."),
        (name = "Admin", description = "Admin console: influencer onboarding, platform consultations, dashboard and statistics."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            for (name, header) in [
                ("user_token", "token"),
                ("influencer_token", "itoken"),
                ("admin_token", "aToken"),
            ] {
                components.add_security_scheme(
                    name,
                    SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(header))),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/user/book-consultation",
            "/api/influencer/search",
            "/api/admin/influencers-stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn role_headers_are_documented() {
        let doc = ApiDoc::openapi();
        let schemes = &doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("user_token"));
        assert!(schemes.contains_key("influencer_token"));
        assert!(schemes.contains_key("admin_token"));
    }
}
