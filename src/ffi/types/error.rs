use thiserror::Error;

pub type TypeResult<T> = Result<T, TypeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("member '{name}' is declared twice")]
    DuplicateMember { name: String },
    #[error("type '{name}' is not a struct or union and cannot be embedded")]
    NotAggregate { name: String },
}
