use crate::app_state::AppState;
use crate::config::{CorsConfig, ServerConfig};
use crate::error::ApiError;
use crate::io_struct::{CropFeatures, ModelInfo, N_FEATURES, StatusMessage};
use crate::predictor::predict_crop;
use actix_cors::Cors;
use actix_web::{Error, HttpRequest, HttpResponse, HttpServer, error, get, post, web};

pub const STATUS_MESSAGE: &str = "Crop Recommendation API is running";

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(StatusMessage {
        message: STATUS_MESSAGE.to_string(),
    })
}

#[post("/predict")]
pub async fn predict(
    req: web::Json<CropFeatures>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let artifacts = app_state.artifacts()?;
    let prediction = predict_crop(artifacts, &req.into_inner()).map_err(|e| {
        log::error!("Prediction failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(prediction))
}

#[get("/model_info")]
pub async fn model_info(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let artifacts = app_state.artifacts()?;
    Ok(HttpResponse::Ok().json(ModelInfo {
        kind: artifacts.classifier.kind().to_string(),
        n_features: N_FEATURES,
        probabilistic: artifacts.classifier.is_probabilistic(),
        classes: artifacts.encoder.classes().to_vec(),
    }))
}

/// Maps body extraction failures onto 422, or 413 for oversized bodies.
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> Error {
    log::debug!("Rejected request body: {}", err);
    match &err {
        error::JsonPayloadError::OverflowKnownLength { length, limit } => ApiError::PayloadTooLarge(
            format!("Payload too large: {} bytes exceeds limit of {} bytes", length, limit),
        )
        .into(),
        error::JsonPayloadError::Overflow { limit } => {
            ApiError::PayloadTooLarge(format!("Payload exceeds limit of {} bytes", limit)).into()
        }
        error::JsonPayloadError::Deserialize(e) => {
            ApiError::Validation(format!("Invalid request body: {}", e)).into()
        }
        _ => ApiError::Validation(format!("Invalid request body: {}", err)).into(),
    }
}

pub fn json_config(max_payload_size: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler)
}

pub fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    if config.allow_credentials {
        cors = cors.supports_credentials();
    }
    cors
}

/// Registers every route. Shared by `startup` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(predict).service(model_info);
}

pub async fn startup(config: ServerConfig, app_state: AppState) -> std::io::Result<()> {
    if !app_state.is_ready() {
        log::warn!("Starting without loaded artifacts; every prediction will be rejected");
    }
    log::info!("Starting server at {}:{}", config.host, config.port);
    if config.cors.allows_any_origin() {
        log::info!("CORS allows any origin");
    } else {
        log::info!("CORS allowed origins: {:?}", config.cors.allowed_origins);
    }

    let app_state = web::Data::new(app_state);
    let cors_config = config.cors.clone();
    let max_payload_size = config.max_payload_size;

    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(build_cors(&cors_config))
            .app_data(app_state.clone())
            .app_data(json_config(max_payload_size))
            .configure(configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((config.host, config.port))?.run().await?;

    std::io::Result::Ok(())
}
