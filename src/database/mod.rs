use thiserror::Error;

pub mod mongodb;
pub mod route_db;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Mongo(#[from] ::mongodb::error::Error),
}
