use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answer::AnswerStore;
use crate::bank::QuestionBank;
use crate::extract::{extract_email, extract_fixed_field, is_nonsensical};
use crate::fields::FixedField;
use crate::session::Session;
use crate::validate::{validate_answer, AnswerJudge};

/// Whether a section question belongs to the core or optional list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Core,
    Optional,
}

/// The currently active question awaiting an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// One of the six intake fields
    FixedField(FixedField),
    /// A business-plan question within a section
    SectionQuestion {
        section_index: usize,
        question_id: String,
        kind: QuestionKind,
    },
    /// Every question is resolved (answered or skipped)
    Complete,
}

impl Slot {
    pub fn is_complete(&self) -> bool {
        matches!(self, Slot::Complete)
    }
}

/// What the turn did to the active slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDisposition {
    /// An answer was stored and the slot pointer moved on
    Advanced,
    /// The same slot will be re-asked
    Retry,
    /// The slot was permanently skipped after exhausting retries
    Skipped,
    /// The message did not interact with the slot (too short, below
    /// minimum shape, or nothing left to ask)
    Ignored,
}

/// Result of feeding one user message through the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The slot that was active when the message arrived
    pub pre_slot: Slot,
    /// The slot that is active after storage
    pub next_slot: Slot,
    pub disposition: TurnDisposition,
}

/// Derive the current slot purely from the answer store: the first unset
/// fixed field in declaration order, else the first section question with
/// no store entry (core before optional, sections in load order), else
/// complete. Skipped entries are present in the store and therefore never
/// offered again.
pub fn current_slot(store: &AnswerStore, bank: &QuestionBank) -> Slot {
    for field in FixedField::ALL {
        if store.fixed_field(field).is_none() {
            return Slot::FixedField(field);
        }
    }

    for (section_index, section) in bank.sections.iter().enumerate() {
        for question in &section.core_questions {
            if store.is_unanswered(&question.id) {
                return Slot::SectionQuestion {
                    section_index,
                    question_id: question.id.clone(),
                    kind: QuestionKind::Core,
                };
            }
        }
        for question in &section.optional_questions {
            if store.is_unanswered(&question.id) {
                return Slot::SectionQuestion {
                    section_index,
                    question_id: question.id.clone(),
                    kind: QuestionKind::Optional,
                };
            }
        }
    }

    Slot::Complete
}

/// Apply one user message to the session: extract or validate against the
/// active slot, update the store and retry counters, and scan for an email
/// address regardless of the slot. The conversational reply happens
/// elsewhere; this only decides storage and progression.
pub async fn process_turn(
    session: &mut Session,
    bank: &QuestionBank,
    judge: &dyn AnswerJudge,
    message: &str,
) -> TurnOutcome {
    let pre_slot = current_slot(&session.answers, bank);
    let mut disposition = TurnDisposition::Ignored;

    match &pre_slot {
        Slot::FixedField(field) => {
            if is_nonsensical(message) {
                disposition = TurnDisposition::Retry;
            } else if let Some(value) = extract_fixed_field(*field, message) {
                session.answers.set_answered(field.id(), value);
                disposition = TurnDisposition::Advanced;
            }
        }
        Slot::SectionQuestion { question_id, .. } => {
            // Messages of three characters or more engage validation;
            // anything shorter is ignored for storage but still replied to.
            if message.trim().chars().count() > 2 {
                if let Some(question) = bank.question(question_id) {
                    if validate_answer(judge, question, message).await {
                        session.answers.set_answered(question_id, message.trim());
                        session.retries.remove(question_id);
                        disposition = TurnDisposition::Advanced;
                    } else {
                        let count = session.retries.get(question_id).copied().unwrap_or(0);
                        if count < 1 {
                            session.retries.insert(question_id.clone(), count + 1);
                            disposition = TurnDisposition::Retry;
                        } else {
                            session.retries.remove(question_id);
                            session.answers.set_skipped(question_id);
                            disposition = TurnDisposition::Skipped;
                            debug!(question_id = %question_id, "Question skipped after two attempts");
                        }
                    }
                }
            }
        }
        Slot::Complete => {}
    }

    // Email extraction runs unconditionally every turn
    if session.answers.email.is_none() {
        if let Some(email) = extract_email(message) {
            session.answers.email = Some(email);
        }
    }

    let next_slot = current_slot(&session.answers, bank);
    TurnOutcome {
        pre_slot,
        next_slot,
        disposition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::parse_question_bank;
    use crate::validate::AnswerJudge;
    use advisor_llm::error::LlmError;
    use async_trait::async_trait;

    const BANK: &str = r#"
# ---
# Section 1: Executive Summary
# ---
# Overview of the business

# --- Core Questions ---

"Business Idea":
  fill: "Describe your business idea."
  answer:

"Target Market":
  fill: "Who are your customers?"
  answer:

# --- Optional Deeper Dive ---

"Vision Statement":
  fill: "Where will you be in five years?"
  answer:

# ---
# Section 2: Market Analysis
# ---
# The competitive landscape

# --- Core Questions ---

"Main Competitors":
  fill: "List your competitors."
  answer:
"#;

    fn bank() -> QuestionBank {
        parse_question_bank(BANK).unwrap()
    }

    struct YesJudge;

    #[async_trait]
    impl AnswerJudge for YesJudge {
        async fn judge(
            &self,
            _q: &crate::bank::Question,
            _a: &str,
        ) -> Result<bool, LlmError> {
            Ok(true)
        }
    }

    struct NoJudge;

    #[async_trait]
    impl AnswerJudge for NoJudge {
        async fn judge(
            &self,
            _q: &crate::bank::Question,
            _a: &str,
        ) -> Result<bool, LlmError> {
            Ok(false)
        }
    }

    fn fill_fixed_fields(session: &mut Session) {
        for field in FixedField::ALL {
            session.answers.set_answered(field.id(), "placeholder");
        }
    }

    #[tokio::test]
    async fn fixed_fields_come_first_in_order() {
        let bank = bank();
        let mut session = Session::new();

        assert_eq!(
            current_slot(&session.answers, &bank),
            Slot::FixedField(FixedField::CompanyName)
        );

        let outcome = process_turn(&mut session, &bank, &YesJudge, "Acme Corp").await;
        assert_eq!(outcome.disposition, TurnDisposition::Advanced);
        assert_eq!(outcome.pre_slot, Slot::FixedField(FixedField::CompanyName));
        assert_eq!(outcome.next_slot, Slot::FixedField(FixedField::Language));
        assert_eq!(session.answers.fixed_field(FixedField::CompanyName), Some("Acme Corp"));
    }

    #[tokio::test]
    async fn language_turn_normalizes() {
        let bank = bank();
        let mut session = Session::new();
        session.answers.set_answered(FixedField::CompanyName.id(), "Acme");

        let outcome =
            process_turn(&mut session, &bank, &YesJudge, "I prefer SPANISH please").await;
        assert_eq!(outcome.disposition, TurnDisposition::Advanced);
        assert_eq!(session.answers.fixed_field(FixedField::Language), Some("Spanish"));
    }

    #[tokio::test]
    async fn nonsense_in_fixed_phase_is_a_retry() {
        let bank = bank();
        let mut session = Session::new();

        let outcome = process_turn(&mut session, &bank, &YesJudge, "123456").await;
        assert_eq!(outcome.disposition, TurnDisposition::Retry);
        assert_eq!(outcome.next_slot, Slot::FixedField(FixedField::CompanyName));
        assert!(session.answers.fixed_field(FixedField::CompanyName).is_none());
    }

    #[tokio::test]
    async fn below_minimum_fixed_input_is_ignored_not_stored() {
        let bank = bank();
        let mut session = Session::new();

        let outcome = process_turn(&mut session, &bank, &YesJudge, "A").await;
        assert_eq!(outcome.disposition, TurnDisposition::Ignored);
        assert_eq!(outcome.next_slot, Slot::FixedField(FixedField::CompanyName));
    }

    #[tokio::test]
    async fn sections_follow_fixed_fields_core_before_optional() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        match current_slot(&session.answers, &bank) {
            Slot::SectionQuestion {
                section_index,
                question_id,
                kind,
            } => {
                assert_eq!(section_index, 0);
                assert_eq!(question_id, "business_idea");
                assert_eq!(kind, QuestionKind::Core);
            }
            other => panic!("expected first core question, got {:?}", other),
        }

        session.answers.set_answered("business_idea", "Coffee roastery");
        session.answers.set_answered("target_market", "Local cafes");

        match current_slot(&session.answers, &bank) {
            Slot::SectionQuestion { question_id, kind, .. } => {
                assert_eq!(question_id, "vision_statement");
                assert_eq!(kind, QuestionKind::Optional);
            }
            other => panic!("expected optional question, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn structural_failure_retries_once_then_skips() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        // "aaaaaa": one distinct character over six, structurally rejected
        let outcome = process_turn(&mut session, &bank, &YesJudge, "aaaaaa").await;
        assert_eq!(outcome.disposition, TurnDisposition::Retry);
        assert_eq!(session.retries.get("business_idea"), Some(&1));
        assert!(session.answers.is_unanswered("business_idea"));

        // Second consecutive failure: permanent skip, counter removed
        let outcome = process_turn(&mut session, &bank, &YesJudge, "aaaaaa").await;
        assert_eq!(outcome.disposition, TurnDisposition::Skipped);
        assert!(!session.retries.contains_key("business_idea"));
        assert_eq!(
            session.answers.value("business_idea"),
            Some(&crate::answer::AnswerValue::Skipped)
        );

        // The skipped question is never the current slot again
        match outcome.next_slot {
            Slot::SectionQuestion { question_id, .. } => {
                assert_eq!(question_id, "target_market")
            }
            other => panic!("expected next core question, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn semantic_rejection_also_counts_toward_skip() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        let outcome =
            process_turn(&mut session, &bank, &NoJudge, "that is an interesting question").await;
        assert_eq!(outcome.disposition, TurnDisposition::Retry);

        let outcome = process_turn(&mut session, &bank, &NoJudge, "ask me another one").await;
        assert_eq!(outcome.disposition, TurnDisposition::Skipped);
    }

    #[tokio::test]
    async fn successful_answer_clears_retry_counter() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        process_turn(&mut session, &bank, &YesJudge, "aaaaaa").await;
        assert_eq!(session.retries.get("business_idea"), Some(&1));

        let outcome =
            process_turn(&mut session, &bank, &YesJudge, "A subscription coffee service").await;
        assert_eq!(outcome.disposition, TurnDisposition::Advanced);
        assert!(session.retries.is_empty());
        assert_eq!(
            session.answers.answered_text("business_idea"),
            Some("A subscription coffee service")
        );
    }

    #[tokio::test]
    async fn short_section_message_is_ignored() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        let outcome = process_turn(&mut session, &bank, &YesJudge, "ok").await;
        assert_eq!(outcome.disposition, TurnDisposition::Ignored);
        assert!(session.answers.is_unanswered("business_idea"));
        assert!(session.retries.is_empty());
    }

    #[tokio::test]
    async fn email_extraction_is_independent_of_slot() {
        let bank = bank();
        let mut session = Session::new();

        // Still on company name, but the message carries an address
        let outcome =
            process_turn(&mut session, &bank, &YesJudge, "reach me at jane@example.com").await;
        assert_eq!(session.answers.email.as_deref(), Some("jane@example.com"));
        // The message also satisfied the company-name minimum
        assert_eq!(outcome.disposition, TurnDisposition::Advanced);
    }

    #[tokio::test]
    async fn email_is_never_overwritten() {
        let bank = bank();
        let mut session = Session::new();
        session.answers.email = Some("first@example.com".to_string());

        process_turn(&mut session, &bank, &YesJudge, "use second@example.com instead").await;
        assert_eq!(session.answers.email.as_deref(), Some("first@example.com"));
    }

    #[tokio::test]
    async fn empty_bank_completes_after_fixed_fields() {
        let bank = QuestionBank::default();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        assert_eq!(current_slot(&session.answers, &bank), Slot::Complete);

        let outcome = process_turn(&mut session, &bank, &YesJudge, "anything").await;
        assert_eq!(outcome.disposition, TurnDisposition::Ignored);
        assert_eq!(outcome.next_slot, Slot::Complete);
    }

    #[tokio::test]
    async fn slot_recomputation_is_idempotent() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);
        session.answers.set_answered("business_idea", "Coffee");
        session.answers.set_skipped("target_market");

        let a = current_slot(&session.answers, &bank);
        let b = current_slot(&session.answers, &bank);
        assert_eq!(a, b);
        match a {
            Slot::SectionQuestion { question_id, .. } => {
                assert_eq!(question_id, "vision_statement")
            }
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[tokio::test]
    async fn answered_question_is_never_reoffered() {
        let bank = bank();
        let mut session = Session::new();
        fill_fixed_fields(&mut session);

        process_turn(&mut session, &bank, &YesJudge, "A coffee roastery in Helsinki").await;
        let stored = session.answers.answered_text("business_idea").map(String::from);

        // Later turns target the next question, not the answered one
        process_turn(&mut session, &bank, &YesJudge, "Cafes and restaurants nearby").await;
        assert_eq!(
            session.answers.answered_text("business_idea").map(String::from),
            stored
        );
    }
}
