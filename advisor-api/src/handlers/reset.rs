use actix_web::{post, web, HttpResponse, Responder};
use tracing::info;

use crate::models::{ResetRequest, ResetResponse};
use crate::AppState;

#[post("/api/reset")]
pub async fn reset(req: web::Json<ResetRequest>, state: web::Data<AppState>) -> impl Responder {
    state.advisor.sessions().reset(&req.session_id).await;
    info!(session_id = %req.session_id, "Session reset");
    HttpResponse::Ok().json(ResetResponse {
        message: "Conversation reset successfully".to_string(),
    })
}
