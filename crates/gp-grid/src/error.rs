use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("movement layer id 0 is reserved for the ground plane")]
    ReservedLayerId,

    #[error("duplicate movement layer id {0}")]
    DuplicateLayerId(u8),

    #[error("map dimensions must be positive (got {width}x{height})")]
    EmptyMap { width: i32, height: i32 },
}

pub type GridResult<T> = Result<T, GridError>;
