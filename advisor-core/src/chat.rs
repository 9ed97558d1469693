use advisor_llm::client::LlmClient;
use advisor_llm::types::{CompletionRequest, Message};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::bank::QuestionBank;
use crate::fields::{default_tiers, FixedField, Tier};
use crate::progression::process_turn;
use crate::prompt;
use crate::report::{render_text_report, ReportTransport};
use crate::score::{business_plan_progress, calculate_points, current_tier, SectionProgress};
use crate::session::{ChatTurn, SessionManager};
use crate::validate::AnswerJudge;

/// Reply substituted when the conversational collaborator fails; slot and
/// stored answers are unaffected.
pub const APOLOGY_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

const REPORT_SUBJECT: &str = "Business Information Form Report";
const REPLY_MAX_TOKENS: u32 = 200;
const REPLY_TEMPERATURE: f32 = 0.7;

/// Everything the caller needs to render one completed turn
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub reply: String,
    pub completed_steps: Vec<String>,
    pub progress: Vec<SectionProgress>,
    pub initial_form_complete: bool,
    pub answers: BTreeMap<String, serde_json::Value>,
    pub email_collected: bool,
    /// True only on the turn the report was actually dispatched
    pub report_sent: bool,
    pub points: u32,
    pub tier_id: String,
}

/// Turn orchestrator: owns the question bank, the sessions, and the
/// external collaborators, and runs one full conversational turn.
pub struct Advisor {
    bank: Arc<QuestionBank>,
    tiers: Vec<Tier>,
    llm: Arc<dyn LlmClient>,
    judge: Arc<dyn AnswerJudge>,
    transport: Arc<dyn ReportTransport>,
    sessions: SessionManager,
}

impl Advisor {
    pub fn new(
        bank: Arc<QuestionBank>,
        llm: Arc<dyn LlmClient>,
        judge: Arc<dyn AnswerJudge>,
        transport: Arc<dyn ReportTransport>,
    ) -> Self {
        Self {
            bank,
            tiers: default_tiers(),
            llm,
            judge,
            transport,
            sessions: SessionManager::new(),
        }
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Run one user turn: progress the state machine, get a conversational
    /// reply, and fire the one-shot report dispatch when the session is
    /// complete. Extraction and storage happen before the reply call, so a
    /// collaborator failure never loses this turn's data.
    pub async fn handle_message(&self, session_id: &str, message: &str) -> TurnReport {
        let message = message.trim();
        let session_arc = self.sessions.session(session_id);
        let mut session = session_arc.lock().await;

        let outcome = process_turn(&mut session, &self.bank, self.judge.as_ref(), message).await;
        let system = prompt::system_prompt(&outcome, &session.answers, &self.bank);

        let mut messages: Vec<Message> = session
            .recent_history()
            .iter()
            .map(|turn| Message::new(turn.role, turn.text.clone()))
            .collect();
        messages.push(Message::user(message));

        let request = CompletionRequest {
            messages,
            max_tokens: REPLY_MAX_TOKENS,
            model: self.llm.model_name().to_string(),
            system: Some(system),
            temperature: Some(REPLY_TEMPERATURE),
        };

        let reply = match self.llm.complete(request).await {
            Ok(response) => {
                session.history.push(ChatTurn::user(message));
                session.history.push(ChatTurn::assistant(response.content.clone()));
                response.content
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Conversational collaborator failed");
                APOLOGY_REPLY.to_string()
            }
        };

        // One-shot report dispatch once everything is resolved and an
        // address is known
        let mut report_sent_now = false;
        if outcome.next_slot.is_complete() && !session.answers.report_sent {
            if let Some(email) = session.answers.email.clone() {
                let body = render_text_report(&session.answers);
                match self.transport.send(&email, REPORT_SUBJECT, &body).await {
                    Ok(()) => {
                        session.answers.report_sent = true;
                        report_sent_now = true;
                        info!(session_id = %session_id, "Report dispatched");
                    }
                    Err(e) => {
                        warn!(session_id = %session_id, error = %e, "Report dispatch failed");
                    }
                }
            }
        }

        let completed_steps: Vec<String> = FixedField::ALL
            .iter()
            .filter(|f| session.answers.fixed_field(**f).is_some())
            .map(|f| f.id().to_string())
            .collect();

        let points = calculate_points(&session.answers, &self.bank);
        let tier_id = current_tier(points, &self.tiers)
            .map(|tier| tier.id.clone())
            .unwrap_or_default();

        TurnReport {
            reply,
            completed_steps,
            progress: business_plan_progress(&session.answers, &self.bank),
            initial_form_complete: session.answers.fixed_fields_complete(),
            answers: session.answers.snapshot(),
            email_collected: session.answers.email.is_some(),
            report_sent: report_sent_now,
            points,
            tier_id,
        }
    }
}
