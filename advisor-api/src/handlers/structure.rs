use actix_web::{get, web, HttpResponse, Responder};
use advisor_core::{business_plan_progress, AnswerStore};

use crate::models::StructureResponse;
use crate::AppState;

/// Bank structure as a progress view over an empty store
#[get("/api/business-plan-structure")]
pub async fn business_plan_structure(state: web::Data<AppState>) -> impl Responder {
    let empty = AnswerStore::new();
    HttpResponse::Ok().json(StructureResponse {
        business_plan_progress: business_plan_progress(&empty, state.advisor.bank()),
        tiers: state.advisor.tiers().to_vec(),
    })
}
