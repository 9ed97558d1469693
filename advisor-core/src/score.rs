use serde::{Deserialize, Serialize};

use crate::answer::{AnswerStore, AnswerValue};
use crate::bank::{Question, QuestionBank};
use crate::fields::{FixedField, Tier};

/// Points awarded per answered slot, by category
const FIXED_FIELD_POINTS: u32 = 1;
const CORE_QUESTION_POINTS: u32 = 3;
const OPTIONAL_QUESTION_POINTS: u32 = 5;

/// Per-section completion view, one entry per question list. The implicit
/// "Section 0" covers the fixed intake fields (core-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section_id: String,
    pub title: String,
    pub description: String,
    pub core_completed: Vec<String>,
    pub core_total: usize,
    pub optional_completed: Vec<String>,
    pub optional_total: usize,
    pub core_questions: Vec<Question>,
    pub optional_questions: Vec<Question>,
    pub core_skipped: Vec<String>,
    pub optional_skipped: Vec<String>,
}

fn split_statuses(store: &AnswerStore, questions: &[Question]) -> (Vec<String>, Vec<String>) {
    let mut completed = Vec::new();
    let mut skipped = Vec::new();
    for question in questions {
        match store.value(&question.id) {
            Some(AnswerValue::Answered(_)) => completed.push(question.id.clone()),
            Some(AnswerValue::Skipped) => skipped.push(question.id.clone()),
            None => {}
        }
    }
    (completed, skipped)
}

/// Pure progress report over the store and bank: Section 0 for the fixed
/// fields, then one entry per bank section with completed/skipped ids.
pub fn business_plan_progress(store: &AnswerStore, bank: &QuestionBank) -> Vec<SectionProgress> {
    let mut progress = Vec::with_capacity(bank.sections.len() + 1);

    let fixed_completed: Vec<String> = FixedField::ALL
        .iter()
        .filter(|f| store.fixed_field(**f).is_some())
        .map(|f| f.id().to_string())
        .collect();

    progress.push(SectionProgress {
        section_id: "section_0".to_string(),
        title: "Section 0: Basic Information".to_string(),
        description: "Your company and background details".to_string(),
        core_completed: fixed_completed,
        core_total: FixedField::ALL.len(),
        optional_completed: Vec::new(),
        optional_total: 0,
        core_questions: Vec::new(),
        optional_questions: Vec::new(),
        core_skipped: Vec::new(),
        optional_skipped: Vec::new(),
    });

    for section in &bank.sections {
        let (core_completed, core_skipped) = split_statuses(store, &section.core_questions);
        let (optional_completed, optional_skipped) =
            split_statuses(store, &section.optional_questions);

        progress.push(SectionProgress {
            section_id: section.id.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
            core_completed,
            core_total: section.core_questions.len(),
            optional_completed,
            optional_total: section.optional_questions.len(),
            core_questions: section.core_questions.clone(),
            optional_questions: section.optional_questions.clone(),
            core_skipped,
            optional_skipped,
        });
    }

    progress
}

/// Monotonic point total: 1 per answered fixed field, 3 per answered core
/// question, 5 per answered optional question. Skips score nothing.
pub fn calculate_points(store: &AnswerStore, bank: &QuestionBank) -> u32 {
    let mut points = 0;

    for field in FixedField::ALL {
        if store.fixed_field(field).is_some() {
            points += FIXED_FIELD_POINTS;
        }
    }

    for section in &bank.sections {
        for question in &section.core_questions {
            if store.answered_text(&question.id).is_some() {
                points += CORE_QUESTION_POINTS;
            }
        }
        for question in &section.optional_questions {
            if store.answered_text(&question.id).is_some() {
                points += OPTIONAL_QUESTION_POINTS;
            }
        }
    }

    points
}

/// The highest tier whose requirement does not exceed `points`, falling
/// back to the lowest tier; `None` only for an empty table.
pub fn current_tier(points: u32, tiers: &[Tier]) -> Option<&Tier> {
    tiers
        .iter()
        .rev()
        .find(|tier| points >= tier.points_required)
        .or_else(|| tiers.first())
}
