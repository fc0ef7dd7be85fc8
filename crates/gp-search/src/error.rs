use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("operation on an empty priority queue")]
    QueueEmpty,
}

pub type SearchResult<T> = Result<T, SearchError>;
