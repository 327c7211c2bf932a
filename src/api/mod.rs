pub mod admin;
pub mod health;
pub mod influencer;
pub mod swagger;
pub mod user;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AuthKeys, Role};
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::json;

    fn keys() -> AuthKeys {
        AuthKeys::new("routes-secret", 1, "admin@connecto.dev", "admin-pass")
    }

    // no database registered: guarded routes must answer 401 before any handler runs
    macro_rules! routes_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(keys()))
                    .configure(user::configure)
                    .configure(influencer::configure)
                    .configure(admin::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn guarded_routes_require_a_token() {
        let app = routes_app!();

        let guarded = [
            test::TestRequest::get().uri("/api/user/get-profile"),
            test::TestRequest::post().uri("/api/user/update-profile"),
            test::TestRequest::post().uri("/api/user/book-consultation"),
            test::TestRequest::get().uri("/api/user/consultations"),
            test::TestRequest::post().uri("/api/user/cancel-consultation"),
            test::TestRequest::get().uri("/api/influencer/dashboard"),
            test::TestRequest::get().uri("/api/influencer/consultations"),
            test::TestRequest::post().uri("/api/influencer/cancel-consultation"),
            test::TestRequest::post().uri("/api/influencer/complete-consultation"),
            test::TestRequest::post().uri("/api/influencer/change-availability"),
            test::TestRequest::get().uri("/api/influencer/profile"),
            test::TestRequest::post().uri("/api/influencer/update-profile"),
            test::TestRequest::post().uri("/api/admin/add-influencer"),
            test::TestRequest::get().uri("/api/admin/consultations"),
            test::TestRequest::post().uri("/api/admin/cancel-consultation"),
            test::TestRequest::get().uri("/api/admin/all-influencers"),
            test::TestRequest::post().uri("/api/admin/change-availability"),
            test::TestRequest::get().uri("/api/admin/dashboard"),
            test::TestRequest::post().uri("/api/admin/update-influencer"),
            test::TestRequest::get().uri("/api/admin/influencers-stats"),
        ];

        for req in guarded {
            let req = req.to_request();
            let path = req.uri().path().to_string();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} is not guarded", path);
        }
    }

    #[actix_web::test]
    async fn public_routes_skip_the_guard() {
        let app = routes_app!();

        let public = [
            test::TestRequest::post().uri("/api/user/register"),
            test::TestRequest::post().uri("/api/user/login"),
            test::TestRequest::post().uri("/api/influencer/login"),
            test::TestRequest::get().uri("/api/influencer/list"),
            test::TestRequest::post().uri("/api/influencer/search"),
        ];

        // these fail later for lack of a body or database, never with 401
        for req in public {
            let req = req.to_request();
            let path = req.uri().path().to_string();
            let res = test::call_service(&app, req).await;
            assert_ne!(res.status(), StatusCode::UNAUTHORIZED, "{} is guarded", path);
            assert_ne!(res.status(), StatusCode::NOT_FOUND, "{} is not routed", path);
        }
    }

    #[actix_web::test]
    async fn admin_login_issues_admin_token() {
        let app = routes_app!();

        let req = test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "email": "admin@connecto.dev", "password": "admin-pass" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        let token = body["token"].as_str().expect("token");
        assert!(keys().verify(token, Role::Admin).is_ok());

        let req = test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "email": "admin@connecto.dev", "password": "wrong" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tokens_only_open_their_own_scope() {
        let app = routes_app!();
        let user_token = keys().issue("user-1", Role::User).unwrap();
        let influencer_token = keys().issue("inf-1", Role::Influencer).unwrap();

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(("Authorization", format!("Bearer {}", user_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/user/consultations")
            .insert_header(("token", influencer_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}
