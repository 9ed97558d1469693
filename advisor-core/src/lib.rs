//! Conversational business-plan intake: a fixed intake form followed by a
//! sectioned question bank, driven one slot at a time with answer
//! validation, retry-then-skip handling, and a scored progress model.

pub mod answer;
pub mod bank;
pub mod chat;
pub mod extract;
pub mod fields;
pub mod progression;
pub mod prompt;
pub mod report;
pub mod score;
pub mod session;
pub mod validate;

pub use answer::{AnswerStore, AnswerValue};
pub use bank::{load_question_bank, parse_question_bank, BankError, Question, QuestionBank, Section};
pub use chat::{Advisor, TurnReport, APOLOGY_REPLY};
pub use extract::{extract_email, is_valid_email};
pub use fields::{default_tiers, FixedField, Tier};
pub use progression::{current_slot, process_turn, QuestionKind, Slot, TurnDisposition, TurnOutcome};
pub use report::{render_document, render_text_report, DocumentError, ReportTransport};
pub use score::{business_plan_progress, calculate_points, current_tier, SectionProgress};
pub use session::{ChatTurn, Session, SessionManager};
pub use validate::{structurally_valid, validate_answer, AnswerJudge, LlmJudge};
