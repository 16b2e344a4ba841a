use crate::classifier::ModelError;
use crate::encoder::EncoderError;
use crate::io_struct::ErrorDetail;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Failure anywhere between feature assembly and label decoding.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PredictionError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Decode(#[from] EncoderError),

    #[error("classifier returned no output for a batch of size {0}")]
    MissingOutput(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Model not loaded")]
    NotLoaded,

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotLoaded | ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail {
            detail: self.to_string(),
        })
    }
}
