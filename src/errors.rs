use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use serde_json::json;
use std::convert::From;

#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),

    #[display(fmt = "Forbidden: {}", _0)]
    Forbidden(String),

    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "NotFound: {}", _0)]
    NotFound(String),
}

// impl ResponseError trait allows to convert our errors into http responses with appropriate data
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError => {
                HttpResponse::InternalServerError().json("Internal Server Error, Please try later")
            }
            ServiceError::BadRequest(ref message) => {
                HttpResponse::BadRequest().json(json!({ "message": message }))
            }
            ServiceError::Conflict(ref message) => {
                HttpResponse::Conflict().json(json!({ "message": message }))
            }
            ServiceError::Forbidden(ref message) => {
                HttpResponse::Forbidden().json(json!({ "message": message }))
            }
            ServiceError::Unauthorized => HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound(ref message) => {
                HttpResponse::NotFound().json(json!({ "message": message }))
            }
        }
    }
}

impl From<DBError> for ServiceError {
    fn from(error: DBError) -> ServiceError {
        match error {
            // the lookup failure's own message ends up in the 404 body
            DBError::NotFound => ServiceError::NotFound(error.to_string()),
            DBError::DatabaseError(kind, info) => {
                error!("db error: {}", info.message());
                if let DatabaseErrorKind::UniqueViolation = kind {
                    let message = info.details().unwrap_or_else(|| info.message()).to_string();
                    return ServiceError::Conflict(message);
                }
                ServiceError::InternalServerError
            }
            _ => {
                error!("db error: {}", error);
                ServiceError::InternalServerError
            }
        }
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(error: r2d2::Error) -> ServiceError {
        error!("r2d2 connection pool error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<actix_threadpool::BlockingError<ServiceError>> for ServiceError {
    fn from(error: actix_threadpool::BlockingError<ServiceError>) -> ServiceError {
        match error {
            // the database outcome has to pass through untouched,
            // a missing event is a 404 and not a 500
            actix_threadpool::BlockingError::Error(error) => error,
            actix_threadpool::BlockingError::Canceled => {
                error!("actix threadpool canceled a blocking operation");
                ServiceError::InternalServerError
            }
        }
    }
}

impl From<redis::RedisError> for ServiceError {
    fn from(error: redis::RedisError) -> ServiceError {
        error!("redis error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<argon2::Error> for ServiceError {
    fn from(error: argon2::Error) -> ServiceError {
        error!("argon2 error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<actix_web::Error> for ServiceError {
    fn from(error: actix_web::Error) -> ServiceError {
        error!("session error: {}", error);
        ServiceError::InternalServerError
    }
}

impl From<minijinja::Error> for ServiceError {
    fn from(error: minijinja::Error) -> ServiceError {
        error!("template error: {}", error);
        ServiceError::InternalServerError
    }
}
