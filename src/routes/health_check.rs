use actix_web::HttpResponse;

/// `GET /health_check`
///
/// Liveness probe; touches neither the tab registry nor the waitlist service.
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
