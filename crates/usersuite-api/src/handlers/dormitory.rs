//! Dormitory selection handlers

use crate::dto::dormitory::DormitoryView;
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::instrument;
use usersuite_core::models::Catalog;
use usersuite_core::{AppConfig, AppError};

/// Dormitories selectable on the login page
///
/// GET /api/v1/dormitories
///
/// Debug-only divisions stay hidden unless the server runs in debug mode.
#[instrument(skip(catalog, config))]
pub async fn list_dormitories(
    catalog: web::Data<Arc<Catalog>>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let dormitories: Vec<DormitoryView> = catalog
        .selectable(config.server.debug)
        .map(DormitoryView::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(dormitories)))
}

/// Configure dormitory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dormitories", web::get().to(list_dormitories));
}
