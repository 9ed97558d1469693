use async_trait::async_trait;
use thiserror::Error;

use crate::answer::AnswerStore;
use crate::bank::QuestionBank;
use crate::fields::FixedField;

/// Transport for the emailed report. Implementations must only return `Ok`
/// on a confirmed dispatch; the caller uses that to drive the one-shot
/// `report_sent` guard.
#[async_trait]
pub trait ReportTransport: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Errors from the document renderer, each carrying user guidance
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Please complete the initial form first (company name, language, business sphere, education, experience, and location).")]
    NoIntakeAnswers,

    #[error("Please answer some business plan questions first. Complete the initial form, then the system will ask you business plan questions.")]
    NoPlanAnswers,
}

fn field_or_na(store: &AnswerStore, field: FixedField) -> &str {
    store.fixed_field(field).unwrap_or("N/A")
}

/// Plain-text summary report for the email body
pub fn render_text_report(store: &AnswerStore) -> String {
    let rule_heavy = "=".repeat(50);
    let rule_light = "-".repeat(50);
    let date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        "\nBUSINESS INFORMATION FORM REPORT\n{rule_heavy}\n\n\
         Date: {date}\n\n\
         COMPANY INFORMATION\n{rule_light}\n\
         Company Name: {company}\n\
         Business Sphere: {sphere}\n\
         Location: {location}\n\n\
         PERSONAL INFORMATION\n{rule_light}\n\
         Preferred Language: {language}\n\
         Education: {education}\n\
         Experience: {experience}\n\n\
         CONTACT INFORMATION\n{rule_light}\n\
         Email: {email}\n\n\
         {rule_heavy}\n\n\
         This report was generated automatically by the Business Advisory Service.\n\
         Thank you for providing your information!\n",
        company = field_or_na(store, FixedField::CompanyName),
        sphere = field_or_na(store, FixedField::Sphere),
        location = field_or_na(store, FixedField::Location),
        language = field_or_na(store, FixedField::Language),
        education = field_or_na(store, FixedField::Education),
        experience = field_or_na(store, FixedField::Experience),
        email = store.email.as_deref().unwrap_or("N/A"),
    )
}

/// Render the filled business-plan document as markdown, including only
/// answered questions. Empty sections are dropped entirely.
pub fn render_document(store: &AnswerStore, bank: &QuestionBank) -> Result<String, DocumentError> {
    let intake: Vec<(FixedField, &str)> = FixedField::ALL
        .iter()
        .filter(|f| **f != FixedField::Language)
        .filter_map(|f| store.fixed_field(*f).map(|v| (*f, v)))
        .collect();

    if intake.is_empty() {
        return Err(DocumentError::NoIntakeAnswers);
    }

    let mut body = String::new();
    let title = store
        .fixed_field(FixedField::CompanyName)
        .map(|name| format!("# Business Plan: {}\n\n", name))
        .unwrap_or_else(|| "# Business Plan\n\n".to_string());
    body.push_str(&title);

    body.push_str("## Basic Information\n\n");
    for (field, value) in &intake {
        body.push_str(&format!("**{}:** {}\n\n", field.label(), value));
    }

    let mut any_plan_answer = false;
    for section in &bank.sections {
        let answered: Vec<(&str, &str)> = section
            .core_questions
            .iter()
            .chain(section.optional_questions.iter())
            .filter_map(|q| {
                store
                    .answered_text(&q.id)
                    .map(|a| (q.label.as_str(), a))
            })
            .collect();

        if answered.is_empty() {
            continue;
        }
        any_plan_answer = true;

        body.push_str(&format!("## {}\n\n", section.title));
        if !section.description.is_empty() {
            body.push_str(&format!("_{}_\n\n", section.description));
        }
        for (label, answer) in answered {
            body.push_str(&format!("### {}\n\n{}\n\n", label, answer));
        }
    }

    if !any_plan_answer {
        return Err(DocumentError::NoPlanAnswers);
    }

    Ok(body)
}
