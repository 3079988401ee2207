use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing `{0}` environment variable")]
    MissingEnvVar(String),

    #[error("Invalid contract address: `{0}`")]
    InvalidAddress(String),

    #[error("Redis connection error: {0}")]
    RedisConnection(String),

    #[error("Redis publish error: {0}")]
    RedisPublish(String),

    #[error("Event decode error: {0}")]
    EventDecode(String),

    #[error("Unknown event topic: {0}")]
    UnknownEventTopic(String),

    #[error("Contract call error: {0}")]
    ContractCall(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
