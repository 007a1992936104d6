//! Actix-web request extractor for the session user
//!
//! The session token only carries identity; the extractor re-fetches the
//! user from the division's backend on every request, so handlers always
//! operate on backend truth and nothing stale survives between requests.

use crate::claims::Claims;
use crate::jwt::JwtService;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::{debug, warn};
use usersuite_core::models::{Catalog, Division, PortalUser};
use usersuite_core::traits::UserBackend;
use usersuite_core::AppError;

/// Extract the session token from a request
///
/// Checks for the token in the following order:
/// 1. Authorization header (Bearer token)
/// 2. Cookie named "token"
fn extract_token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie) = req.cookie("token") {
        return Some(cookie.value().to_string());
    }

    None
}

/// The authenticated user of the current request
///
/// Holds the freshly resolved [`PortalUser`], the owning division, and the
/// raw session claims.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: PortalUser,
    pub division: Arc<Division>,
    pub claims: Claims,
}

impl CurrentUser {
    async fn resolve(req: HttpRequest) -> Result<Self, AppError> {
        let jwt_service = req
            .app_data::<web::Data<Arc<JwtService>>>()
            .ok_or_else(|| {
                warn!("JwtService not found in app data");
                AppError::Unauthorized("Authentication service not configured".to_string())
            })?
            .get_ref()
            .clone();

        let catalog = req
            .app_data::<web::Data<Arc<Catalog>>>()
            .ok_or_else(|| {
                warn!("Catalog not found in app data");
                AppError::Unauthorized("Catalog not configured".to_string())
            })?
            .get_ref()
            .clone();

        let token = extract_token_from_request(&req).ok_or_else(|| {
            debug!("No session token found in request");
            AppError::Unauthorized("No session token provided".to_string())
        })?;

        let claims = jwt_service.validate_token(&token)?;

        let division = catalog
            .division(&claims.division)
            .cloned()
            .ok_or_else(|| {
                warn!(division = %claims.division, "Session names an unknown division");
                AppError::Unauthorized("Unknown division".to_string())
            })?;

        // Reconstruct the user from backend truth; a vanished account ends
        // the session rather than serving cached data.
        let user = match division.backend().get(&claims.sub).await {
            Ok(user) => user,
            Err(AppError::UserNotFound(_)) => {
                warn!(uid = %claims.sub, "Session account no longer exists");
                return Err(AppError::Unauthorized("Account no longer exists".to_string()));
            }
            Err(e) => return Err(e),
        };

        debug!(uid = %user.uid, division = %division.name, "Session user resolved");

        Ok(CurrentUser {
            user,
            division,
            claims,
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Self::resolve(req).await.map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App, HttpResponse};
    use usersuite_backend::SampleBackend;
    use usersuite_core::config::SampleAccountConfig;
    use usersuite_core::models::Dormitory;
    use usersuite_core::models::SubnetCollection;

    fn demo_catalog() -> Arc<Catalog> {
        let backend = Arc::new(
            SampleBackend::from_config(
                "lab",
                "lab.example.org",
                &[SampleAccountConfig {
                    uid: "demo".to_string(),
                    id: 1,
                    name: "Demo User".to_string(),
                    password: "demo".to_string(),
                    mail: None,
                    ip: None,
                    mac: None,
                    address: None,
                }],
            )
            .unwrap(),
        );

        let division = Arc::new(Division::new(
            "lab",
            "Testbed",
            "lab.example.org",
            None,
            true,
            backend,
        ));
        let dormitory = Dormitory {
            name: "testbed".to_string(),
            display_name: "Testbed".to_string(),
            division: division.clone(),
            subnets: SubnetCollection::default(),
        };

        Arc::new(Catalog::new(vec![division], vec![dormitory]).unwrap())
    }

    fn demo_user() -> PortalUser {
        PortalUser {
            uid: "demo".to_string(),
            id: 1,
            name: "Demo User".to_string(),
            mail: None,
            ip: None,
            division: "lab".to_string(),
        }
    }

    macro_rules! spawn_app {
        ($jwt:expr, $catalog:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($jwt))
                    .app_data(web::Data::new($catalog))
                    .route(
                        "/whoami",
                        web::get().to(|current: CurrentUser| async move {
                            HttpResponse::Ok().json(serde_json::json!({
                                "uid": current.user.uid,
                                "name": current.user.name,
                                "division": current.division.name,
                            }))
                        }),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_session_user_is_resolved_from_backend() {
        let jwt_service = Arc::new(JwtService::new("test-secret", 3600));
        let token = jwt_service.create_session(&demo_user()).unwrap();

        let app = spawn_app!(jwt_service, demo_catalog());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["uid"], "demo");
        // The display name comes from the backend, not from the token.
        assert_eq!(body["name"], "Demo User");
        assert_eq!(body["division"], "lab");
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let jwt_service = Arc::new(JwtService::new("test-secret", 3600));
        let app = spawn_app!(jwt_service, demo_catalog());

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_unknown_division_is_unauthorized() {
        let jwt_service = Arc::new(JwtService::new("test-secret", 3600));
        let mut stranger = demo_user();
        stranger.division = "gone".to_string();
        let token = jwt_service.create_session(&stranger).unwrap();

        let app = spawn_app!(jwt_service, demo_catalog());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_vanished_account_is_unauthorized() {
        let jwt_service = Arc::new(JwtService::new("test-secret", 3600));
        let mut ghost = demo_user();
        ghost.uid = "ghost".to_string();
        let token = jwt_service.create_session(&ghost).unwrap();

        let app = spawn_app!(jwt_service, demo_catalog());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_token_via_cookie() {
        let jwt_service = Arc::new(JwtService::new("test-secret", 3600));
        let token = jwt_service.create_session(&demo_user()).unwrap();

        let app = spawn_app!(jwt_service, demo_catalog());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(actix_web::cookie::Cookie::new("token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
