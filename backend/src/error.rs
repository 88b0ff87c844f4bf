use rocket::http::Status;
use rocket::response::Responder;
use shared::ValidationError;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
    #[error("Poll state is unavailable")]
    LockFailed,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::Store(_) => Status::InternalServerError,
            ApiError::Render(_) => Status::InternalServerError,
            ApiError::LockFailed => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("{} {} failed: {}", req.method(), req.uri(), self);
            return Err(status);
        }

        rocket::Response::build_from(self.to_string().respond_to(req)?)
            .status(status)
            .ok()
    }
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] rocket::figment::Error),
    #[error("Failed to prepare data directory: {0}")]
    DataDir(#[from] std::io::Error),
    #[error("Failed to load templates: {0}")]
    Templates(#[from] minijinja::Error),
}
