use actix_web::{post, web, HttpResponse, Responder};
use advisor_llm::types::AudioInput;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::error;

use crate::models::{ErrorResponse, TranscribeRequest, TranscribeResponse, TtsRequest, TtsResponse};
use crate::AppState;

#[post("/api/tts")]
pub async fn tts(req: web::Json<TtsRequest>, state: web::Data<AppState>) -> impl Responder {
    let text = req.text.trim();
    if text.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "No text provided".to_string(),
        });
    }

    match state.speech.synthesize(text).await {
        Ok(audio) => HttpResponse::Ok().json(TtsResponse {
            audio: BASE64.encode(audio),
            content_type: "audio/mpeg".to_string(),
        }),
        Err(e) => {
            error!(error = %e, "Speech synthesis failed");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Speech synthesis failed: {}", e),
            })
        }
    }
}

#[post("/api/transcribe")]
pub async fn transcribe(
    req: web::Json<TranscribeRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let data = match BASE64.decode(req.audio.as_bytes()) {
        Ok(data) if !data.is_empty() => data,
        Ok(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "No audio provided".to_string(),
            });
        }
        Err(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Audio payload is not valid base64".to_string(),
            });
        }
    };

    let input = AudioInput::new(data, req.filename.clone(), req.content_type.clone());

    match state.speech.transcribe(input).await {
        Ok(text) => HttpResponse::Ok().json(TranscribeResponse { text }),
        Err(e) => {
            error!(error = %e, "Transcription failed");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Transcription failed: {}", e),
            })
        }
    }
}
