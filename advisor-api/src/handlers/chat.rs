use actix_web::{post, web, HttpResponse, Responder};
use tracing::info;

use crate::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::AppState;

#[post("/api/chat")]
pub async fn chat(req: web::Json<ChatRequest>, state: web::Data<AppState>) -> impl Responder {
    let message = req.message.trim();
    if message.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "No message provided".to_string(),
        });
    }

    info!(session_id = %req.session_id, "Processing chat turn");
    let turn = state.advisor.handle_message(&req.session_id, message).await;

    HttpResponse::Ok().json(ChatResponse {
        response: turn.reply,
        completed_steps: turn.completed_steps,
        business_plan_progress: turn.progress,
        initial_form_complete: turn.initial_form_complete,
        form_data: turn.answers,
        email_collected: turn.email_collected,
        report_sent: turn.report_sent,
        points: turn.points,
        current_tier: turn.tier_id,
        tiers: state.advisor.tiers().to_vec(),
    })
}
