use actix_web::{test, web, App};
use advisor_api::{handlers, AppState};
use advisor_core::bank::Question;
use advisor_core::validate::AnswerJudge;
use advisor_core::{parse_question_bank, Advisor, ReportTransport};
use advisor_llm::client::{LlmClient, SpeechClient};
use advisor_llm::error::LlmError;
use advisor_llm::types::{AudioInput, CompletionRequest, CompletionResponse, Role, Usage};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Small bank: one section, one core and one optional question
pub const TEST_BANK: &str = r#"
# ---
# Section 1: Executive Summary
# ---
# A concise overview of the business

# --- Core Questions ---

"Business Idea":
  fill: "Describe your business idea in one or two sentences."
  answer:

# --- Optional Deeper Dive ---

"Vision Statement":
  fill: "Where do you see the business in five years?"
  answer:
"#;

pub struct TestApp<S> {
    pub mock_llm: Arc<MockLlmClient>,
    pub mock_speech: Arc<MockSpeechClient>,
    pub transport: Arc<RecordingTransport>,
    pub app: S,
}

pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<CompletionResponse>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut call_count = self.call_count.lock().unwrap();
        *call_count += 1;
        drop(call_count);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(CompletionResponse {
                content: "Thanks! Let's continue.".to_string(),
                role: Role::Assistant,
                usage: Usage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
                stop_reason: Some("stop".to_string()),
            })
        } else {
            Ok(responses.remove(0))
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Accepts every section answer, so flows progress without a live model
pub struct PassJudge;

#[async_trait]
impl AnswerJudge for PassJudge {
    async fn judge(&self, _question: &Question, _answer: &str) -> Result<bool, LlmError> {
        Ok(true)
    }
}

pub struct MockSpeechClient {
    pub fail: Mutex<bool>,
}

impl MockSpeechClient {
    pub fn new() -> Self {
        MockSpeechClient {
            fail: Mutex::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl Default for MockSpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechClient for MockSpeechClient {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, LlmError> {
        if *self.fail.lock().unwrap() {
            return Err(LlmError::internal("speech offline"));
        }
        Ok(vec![0x49, 0x44, 0x33])
    }

    async fn transcribe(&self, _audio: AudioInput) -> Result<String, LlmError> {
        if *self.fail.lock().unwrap() {
            return Err(LlmError::internal("speech offline"));
        }
        Ok("hello world".to_string())
    }
}

pub struct RecordingTransport {
    pub fail: Mutex<bool>,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        RecordingTransport {
            fail: Mutex::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_recipient(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(to, _, _)| to.clone())
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportTransport for RecordingTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("transport down");
        }
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    let bank = Arc::new(parse_question_bank(TEST_BANK)?);
    let mock_llm = Arc::new(MockLlmClient::new());
    let mock_speech = Arc::new(MockSpeechClient::new());
    let transport = Arc::new(RecordingTransport::new());

    let advisor = Arc::new(Advisor::new(
        bank,
        mock_llm.clone() as Arc<dyn LlmClient>,
        Arc::new(PassJudge),
        transport.clone() as Arc<dyn ReportTransport>,
    ));

    let state = web::Data::new(AppState {
        advisor,
        speech: mock_speech.clone() as Arc<dyn SpeechClient>,
        transport: transport.clone() as Arc<dyn ReportTransport>,
    });

    let app = test::init_service(
        App::new()
            .app_data(state)
            .service(handlers::chat::chat)
            .service(handlers::structure::business_plan_structure)
            .service(handlers::speech::tts)
            .service(handlers::speech::transcribe)
            .service(handlers::report::send_report)
            .service(handlers::report::download_report)
            .service(handlers::reset::reset),
    )
    .await;

    Ok(TestApp {
        mock_llm,
        mock_speech,
        transport,
        app,
    })
}
