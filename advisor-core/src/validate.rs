use advisor_llm::client::LlmClient;
use advisor_llm::error::LlmError;
use advisor_llm::types::{CompletionRequest, Message};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::bank::Question;

/// Structural rejection rules for a candidate section answer: too short,
/// pure digits, or a low-diversity repeated string.
pub fn structurally_valid(answer: &str) -> bool {
    let clean = answer.trim();
    let len = clean.chars().count();

    if len < 2 {
        return false;
    }

    let no_spaces: String = clean.chars().filter(|c| !c.is_whitespace()).collect();
    if no_spaces.chars().all(|c| c.is_ascii_digit()) && no_spaces.chars().count() > 3 {
        return false;
    }

    let distinct = no_spaces.chars().collect::<HashSet<char>>().len();
    if distinct < 3 && len > 5 {
        return false;
    }

    true
}

/// External semantic judgment: does the answer substantively address the
/// question?
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    async fn judge(&self, question: &Question, answer: &str) -> Result<bool, LlmError>;
}

/// Judge backed by an LLM binary classification
pub struct LlmJudge {
    client: Arc<dyn LlmClient>,
}

impl LlmJudge {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    fn validation_prompt(question: &Question, answer: &str) -> String {
        format!(
            r#"You are validating if a user's answer appropriately addresses a business plan question.

Question: "{label}"
Question context: {fill}

User's answer: "{answer}"

Determine if the user's answer:
1. Actually addresses the question being asked
2. Provides meaningful information relevant to the question
3. Is not just random numbers, gibberish, or meaningless text
4. Is not just a generic response, question, or unrelated comment
5. Contains actual words or meaningful content (not just digits or symbols)

Examples of INVALID answers:
- Random numbers like "5645646" or "123456"
- Gibberish like "asdfgh" or "qwerty"
- Single words that don't answer the question
- Unrelated comments or questions

Respond with ONLY "YES" if the answer is appropriate and addresses the question, or "NO" if it does not address the question properly or is nonsensical."#,
            label = question.label,
            fill = question.fill,
            answer = answer,
        )
    }
}

#[async_trait]
impl AnswerJudge for LlmJudge {
    async fn judge(&self, question: &Question, answer: &str) -> Result<bool, LlmError> {
        let request = CompletionRequest {
            messages: vec![Message::user("Validate this answer.")],
            max_tokens: 10,
            model: self.client.model_name().to_string(),
            system: Some(Self::validation_prompt(question, answer)),
            temperature: Some(0.3),
        };

        let response = self.client.complete(request).await?;
        Ok(response.content.trim().to_uppercase().starts_with("YES"))
    }
}

/// Two-tier pass/fail decision for a candidate answer against a section
/// question. Structural rejection is local and cheap; the semantic judgment
/// fails open so a validator outage never blocks the conversation.
pub async fn validate_answer(judge: &dyn AnswerJudge, question: &Question, answer: &str) -> bool {
    if !structurally_valid(answer) {
        return false;
    }

    match judge.judge(question, answer).await {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!(
                question_id = %question.id,
                error = %e,
                "Answer judge unavailable, accepting answer"
            );
            true
        }
    }
}
