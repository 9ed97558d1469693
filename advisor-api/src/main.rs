use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use advisor_api::config::ApiConfig;
use advisor_api::email::{DisabledTransport, SmtpReportTransport};
use advisor_api::{handlers, AppState};
use advisor_core::{load_question_bank, Advisor, LlmJudge, ReportTransport};
use advisor_llm::client::LlmClient;
use advisor_llm::openai::OpenAiClient;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "advisor-api", about = "Conversational business-plan intake API")]
struct Args {
    /// Question bank path, overriding the config file
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Listen port, overriding the config file
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let (mut config, config_path) =
        ApiConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;
    info!(config = %config_path.display(), "Configuration loaded");

    if let Some(port) = args.port {
        config.server.port = port;
    }
    let questions_path = args.questions.unwrap_or_else(|| config.questions.path.clone());

    let bank = Arc::new(
        load_question_bank(&questions_path)
            .with_context(|| format!("Failed to load question bank from {}", questions_path.display()))?,
    );
    info!(sections = bank.sections.len(), path = %questions_path.display(), "Question bank loaded");

    let api_key = config
        .openai_api_key()
        .context("No OpenAI API key: set [openai] api_key or the OPENAI_API_KEY env var")?;
    let mut client = OpenAiClient::new(api_key)?;
    if let Some(model) = config.openai.as_ref().and_then(|o| o.chat_model.clone()) {
        client = client.with_model(model);
    }
    let client = Arc::new(client);

    let transport: Arc<dyn ReportTransport> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpReportTransport::new(smtp)?),
        None => {
            warn!("No [smtp] settings; report emails are disabled");
            Arc::new(DisabledTransport)
        }
    };

    let llm: Arc<dyn LlmClient> = client.clone();
    let judge = Arc::new(LlmJudge::new(llm.clone()));
    let advisor = Arc::new(Advisor::new(bank, llm, judge, transport.clone()));

    let state = web::Data::new(AppState {
        advisor,
        speech: client,
        transport,
    });

    let allowed_origins = config
        .cors
        .map(|c| c.allowed_origins)
        .unwrap_or_default();

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting advisor-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(handlers::chat::chat)
            .service(handlers::structure::business_plan_structure)
            .service(handlers::speech::tts)
            .service(handlers::speech::transcribe)
            .service(handlers::report::send_report)
            .service(handlers::report::download_report)
            .service(handlers::reset::reset)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
