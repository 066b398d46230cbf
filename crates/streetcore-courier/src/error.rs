use thiserror::Error;

#[derive(Debug, Error)]
pub enum CourierError {
    #[error("courier configuration error: {0}")]
    Config(String),
}

pub type CourierResult<T> = Result<T, CourierError>;
