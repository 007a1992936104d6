//! Account handlers
//!
//! The account overview, traffic data, and the feature-gated mutators.
//! Every mutator checks the division's feature set before the backend is
//! asked to do anything.

use crate::dto::account::{
    AckResponse, ChangeMacRequest, ChangeMailRequest, ChangePasswordRequest, CreditResponse,
    HostingRequest, HostingStatusResponse,
};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};
use usersuite_auth::CurrentUser;
use usersuite_core::models::{Division, Feature};
use usersuite_core::traits::UserBackend;
use usersuite_core::AppError;
use validator::Validate;

/// Reject the request before any backend call when `feature` is missing
fn require_feature(division: &Division, feature: Feature) -> Result<(), AppError> {
    if division.backend().features().contains(feature) {
        Ok(())
    } else {
        warn!(
            division = %division.name,
            feature = %feature,
            "Rejected unsupported feature"
        );
        Err(AppError::NotSupported(feature))
    }
}

/// Account overview
///
/// GET /api/v1/account
#[instrument(skip(current))]
pub async fn account_info(current: CurrentUser) -> Result<HttpResponse, AppError> {
    let backend = current.division.backend();

    let mut info = backend.info(&current.user).await?;
    info.mark_unsupported(backend.features());

    Ok(HttpResponse::Ok().json(ApiResponse::success(info)))
}

/// Traffic history of the trailing week
///
/// GET /api/v1/account/traffic
#[instrument(skip(current))]
pub async fn traffic(current: CurrentUser) -> Result<HttpResponse, AppError> {
    let record = current.division.backend().traffic(&current.user).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

/// Current credit
///
/// GET /api/v1/account/credit
#[instrument(skip(current))]
pub async fn credit(current: CurrentUser) -> Result<HttpResponse, AppError> {
    let credit = current
        .division
        .backend()
        .current_credit(&current.user)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(CreditResponse { credit })))
}

/// Change the mail forwarding address
///
/// PUT /api/v1/account/mail
#[instrument(skip(current, req))]
pub async fn change_mail(
    current: CurrentUser,
    req: web::Json<ChangeMailRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    require_feature(&current.division, Feature::MailChange)?;

    current
        .division
        .backend()
        .change_mail(&current.user, Some(&req.mail))
        .await?;

    info!(uid = %current.user.uid, "Mail forwarding changed");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AckResponse::new(
        "Mail forwarding updated",
    ))))
}

/// Delete the mail forwarding address
///
/// DELETE /api/v1/account/mail
#[instrument(skip(current))]
pub async fn delete_mail(current: CurrentUser) -> Result<HttpResponse, AppError> {
    require_feature(&current.division, Feature::MailChange)?;

    current
        .division
        .backend()
        .change_mail(&current.user, None)
        .await?;

    info!(uid = %current.user.uid, "Mail forwarding deleted");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AckResponse::new(
        "Mail forwarding deleted",
    ))))
}

/// Re-register the device MAC address
///
/// PUT /api/v1/account/mac
#[instrument(skip(current, req))]
pub async fn change_mac(
    current: CurrentUser,
    req: web::Json<ChangeMacRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    require_feature(&current.division, Feature::MacChange)?;

    current
        .division
        .backend()
        .change_mac(&current.user, &req.mac)
        .await?;

    info!(uid = %current.user.uid, "MAC address changed");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AckResponse::new("MAC address updated"))))
}

/// Change the account password
///
/// PUT /api/v1/account/password
#[instrument(skip(current, req))]
pub async fn change_password(
    current: CurrentUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    require_feature(&current.division, Feature::PasswordChange)?;

    current
        .division
        .backend()
        .change_password(&current.user, &req.current_password, &req.new_password)
        .await?;

    info!(uid = %current.user.uid, "Password changed");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AckResponse::new("Password changed"))))
}

/// Hosting database status
///
/// GET /api/v1/account/hosting
#[instrument(skip(current))]
pub async fn hosting_status(current: CurrentUser) -> Result<HttpResponse, AppError> {
    require_feature(&current.division, Feature::HostingDb)?;

    let exists = current
        .division
        .backend()
        .has_hosting_db(&current.user)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(HostingStatusResponse { exists })))
}

/// Provision the hosting database
///
/// POST /api/v1/account/hosting
#[instrument(skip(current, req))]
pub async fn create_hosting(
    current: CurrentUser,
    req: web::Json<HostingRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    require_feature(&current.division, Feature::HostingDb)?;

    current
        .division
        .backend()
        .create_hosting_db(&current.user, &req.password)
        .await?;

    info!(uid = %current.user.uid, "Hosting database created");
    Ok(HttpResponse::Created().json(ApiResponse::success(AckResponse::new(
        "Hosting database created",
    ))))
}

/// Rotate the hosting database password
///
/// PUT /api/v1/account/hosting
#[instrument(skip(current, req))]
pub async fn change_hosting_password(
    current: CurrentUser,
    req: web::Json<HostingRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    require_feature(&current.division, Feature::HostingDb)?;

    current
        .division
        .backend()
        .change_hosting_password(&current.user, &req.password)
        .await?;

    info!(uid = %current.user.uid, "Hosting database password changed");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AckResponse::new(
        "Hosting database password changed",
    ))))
}

/// Drop the hosting database
///
/// DELETE /api/v1/account/hosting
#[instrument(skip(current))]
pub async fn drop_hosting(current: CurrentUser) -> Result<HttpResponse, AppError> {
    require_feature(&current.division, Feature::HostingDb)?;

    current
        .division
        .backend()
        .drop_hosting_db(&current.user)
        .await?;

    info!(uid = %current.user.uid, "Hosting database dropped");
    Ok(HttpResponse::Ok().json(ApiResponse::success(AckResponse::new(
        "Hosting database dropped",
    ))))
}

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/account")
            .route("", web::get().to(account_info))
            .route("/traffic", web::get().to(traffic))
            .route("/credit", web::get().to(credit))
            .route("/mail", web::put().to(change_mail))
            .route("/mail", web::delete().to(delete_mail))
            .route("/mac", web::put().to(change_mac))
            .route("/password", web::put().to(change_password))
            .route("/hosting", web::get().to(hosting_status))
            .route("/hosting", web::post().to(create_hosting))
            .route("/hosting", web::put().to(change_hosting_password))
            .route("/hosting", web::delete().to(drop_hosting)),
    );
}
