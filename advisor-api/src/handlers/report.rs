use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, post, web, HttpResponse, Responder};
use advisor_core::{is_valid_email, render_document, render_text_report};
use tracing::{error, info};

use crate::models::{DownloadReportQuery, ErrorResponse, SendReportRequest, SendReportResponse};
use crate::AppState;

const REPORT_SUBJECT: &str = "Business Information Form Report";

#[post("/api/send-report")]
pub async fn send_report(
    req: web::Json<SendReportRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let session_arc = state.advisor.sessions().session(&req.session_id);
    let mut session = session_arc.lock().await;

    let email = match req.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        Some(given) => given.to_string(),
        None => match session.answers.email.clone() {
            Some(stored) => stored,
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "No email address provided".to_string(),
                });
            }
        },
    };

    // A stored address may be a best-effort capture; the strict shape is
    // required before anything reaches the transport
    if !is_valid_email(&email) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid email address".to_string(),
        });
    }

    let body = render_text_report(&session.answers);
    match state.transport.send(&email, REPORT_SUBJECT, &body).await {
        Ok(()) => {
            if session.answers.email.is_none() {
                session.answers.email = Some(email.clone());
            }
            session.answers.report_sent = true;
            info!(session_id = %req.session_id, "Report sent on request");
            HttpResponse::Ok().json(SendReportResponse {
                message: "Report sent successfully".to_string(),
                email,
            })
        }
        Err(e) => {
            error!(error = %e, session_id = %req.session_id, "Report delivery failed");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Failed to send report: {}", e),
            })
        }
    }
}

#[get("/api/download-report")]
pub async fn download_report(
    query: web::Query<DownloadReportQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let session_arc = state.advisor.sessions().session(&query.session_id);
    let session = session_arc.lock().await;

    match render_document(&session.answers, state.advisor.bank()) {
        Ok(document) => HttpResponse::Ok()
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("business_plan.md".to_string())],
            })
            .content_type("text/markdown; charset=utf-8")
            .body(document),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: e.to_string(),
        }),
    }
}
