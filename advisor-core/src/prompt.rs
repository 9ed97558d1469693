//! System-instruction construction for the conversational collaborator.
//!
//! The wording steers an external model; only the slot selection logic here
//! carries invariants. Texts are kept short and directive.

use crate::answer::AnswerStore;
use crate::bank::QuestionBank;
use crate::fields::FixedField;
use crate::progression::{QuestionKind, Slot, TurnDisposition, TurnOutcome};

fn field_task(field: FixedField) -> &'static str {
    match field {
        FixedField::CompanyName => "Ask for the company name. Be friendly and welcoming.",
        FixedField::Language => {
            "Ask for the preferred language (e.g., English, Spanish, French, German)."
        }
        FixedField::Sphere => "Ask what industry or business sphere the company operates in.",
        FixedField::Education => {
            "Ask about the educational background (e.g., Bachelor's in Business, MBA, etc.)."
        }
        FixedField::Experience => "Ask how many years of business experience they have.",
        FixedField::Location => "Ask where the business is located.",
    }
}

fn collected_context(store: &AnswerStore) -> String {
    let collected: Vec<String> = FixedField::ALL
        .iter()
        .filter_map(|f| {
            store
                .fixed_field(*f)
                .map(|value| format!("{}: {}", f.label(), value))
        })
        .collect();

    if collected.is_empty() {
        String::new()
    } else {
        format!("Information collected so far: {}. ", collected.join(", "))
    }
}

const FIXED_RETRY_NOTE: &str = " The user's previous answer was unclear or didn't make sense \
(it might have been random numbers, gibberish, or unrelated text). Please politely let them \
know you didn't understand their answer and ask the same question again. Be encouraging and \
supportive.";

const SECTION_RETRY_NOTE: &str = " The user's previous answer didn't seem to address the \
question properly or was unclear (it might have been random numbers, gibberish, or unrelated \
text). Please politely let them know you didn't understand their answer and ask the same \
question again. Be encouraging and supportive. If they don't answer properly this time, we'll \
move on to the next question.";

const SECTION_SKIP_NOTE: &str = " The user didn't provide a clear answer to the previous \
question after two attempts, so we're moving on. Please ask the next question naturally and \
encouragingly.";

fn fixed_field_prompt(
    field: FixedField,
    next_slot: &Slot,
    store: &AnswerStore,
    bank: &QuestionBank,
    is_retry: bool,
) -> String {
    let context = collected_context(store);
    let task = field_task(field);

    if field == FixedField::Location && !matches!(next_slot, Slot::FixedField(_)) {
        // Intake handoff: congratulate and bridge into the question bank
        return match next_slot {
            Slot::SectionQuestion { question_id, .. } => {
                let question = bank.question(question_id);
                let (label, fill) = question
                    .map(|q| (q.label.as_str(), q.fill.as_str()))
                    .unwrap_or(("the first business plan question", ""));
                format!(
                    "You are a friendly business form assistant helping to collect information. {context}\
                     Current task: {task}\n\
                     After collecting the location, congratulate them on completing the initial form. \
                     Then immediately ask them the first business plan question: \"{label}\". {fill}\n\
                     Keep responses concise (1-2 sentences) and conversational."
                )
            }
            _ => format!(
                "You are a friendly business form assistant helping to collect information. {context}\
                 Current task: {task}\n\
                 After collecting the location, congratulate them on completing the initial form and \
                 introduce the business plan checklist.\n\
                 Keep responses concise (1-2 sentences) and conversational."
            ),
        };
    }

    let next_hint = match field.next() {
        Some(next) => format!(
            " After collecting this information, you'll ask about: {}",
            field_task(next)
        ),
        None => String::new(),
    };
    let retry_note = if is_retry { FIXED_RETRY_NOTE } else { "" };

    format!(
        "You are a friendly business form assistant helping to collect information. {context}\
         Current task: {task}{retry_note}{next_hint}\n\
         Keep responses concise (1-2 sentences) and conversational.\n\
         Acknowledge their input and naturally move to the next question."
    )
}

fn section_question_prompt(
    section_index: usize,
    question_id: &str,
    kind: QuestionKind,
    store: &AnswerStore,
    bank: &QuestionBank,
    disposition: TurnDisposition,
) -> String {
    let mut context_parts = Vec::new();
    if let Some(name) = store.fixed_field(FixedField::CompanyName) {
        context_parts.push(format!("Company: {}", name));
    }
    if let Some(sphere) = store.fixed_field(FixedField::Sphere) {
        context_parts.push(format!("Business Sphere: {}", sphere));
    }
    let context = if context_parts.is_empty() {
        String::new()
    } else {
        format!("Context: {}. ", context_parts.join(", "))
    };

    let section = bank.sections.get(section_index);
    let section_info = section
        .map(|s| format!("We're working on {} - {}.", s.title, s.description))
        .unwrap_or_default();

    let (label, fill) = bank
        .question(question_id)
        .map(|q| (q.label.clone(), q.fill.clone()))
        .unwrap_or_default();

    let mut instruction = format!("Now ask them: \"{}\" - {}", label, fill);
    if kind == QuestionKind::Optional {
        instruction.push_str(" (This is an optional deeper dive question - they can skip if they prefer.)");
    }

    let note = match disposition {
        TurnDisposition::Retry => SECTION_RETRY_NOTE,
        TurnDisposition::Skipped => SECTION_SKIP_NOTE,
        _ => "",
    };

    format!(
        "You are a friendly business advisor assistant helping create a comprehensive business plan. {context}\n\
         {section_info}\n\
         {instruction}{note}\n\
         Keep responses concise (1-2 sentences) and conversational. Be encouraging and supportive. \
         Make sure to actually ask the question directly."
    )
}

fn complete_prompt(store: &AnswerStore) -> String {
    let context = collected_context(store);
    if store.email.is_none() {
        format!(
            "You are a friendly business form assistant. All required information has been collected. {context}\n\
             Now, please ask for their email address so we can send them a summary report of the \
             information they provided.\n\
             Keep responses concise and conversational."
        )
    } else {
        "You are a friendly business advisor assistant. All business plan questions have been \
         completed. Thank them for their thorough responses and let them know that a report will \
         be sent to their email address shortly."
            .to_string()
    }
}

/// Build the system instruction for the reply to this turn. Fixed-field
/// turns are prompted from the slot that was active when the message
/// arrived; section turns are prompted from the slot that is active after
/// storage (the question to ask next).
pub fn system_prompt(outcome: &TurnOutcome, store: &AnswerStore, bank: &QuestionBank) -> String {
    match &outcome.pre_slot {
        Slot::FixedField(field) => fixed_field_prompt(
            *field,
            &outcome.next_slot,
            store,
            bank,
            outcome.disposition == TurnDisposition::Retry,
        ),
        _ => match &outcome.next_slot {
            Slot::SectionQuestion {
                section_index,
                question_id,
                kind,
            } => section_question_prompt(
                *section_index,
                question_id,
                *kind,
                store,
                bank,
                outcome.disposition,
            ),
            _ => complete_prompt(store),
        },
    }
}
