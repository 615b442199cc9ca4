use memento_graph::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session overview is required")]
    EmptyOverview,

    #[error("store did not return the created session entity '{0}'")]
    NotCreated(String),

    #[error(transparent)]
    Store(#[from] GraphError),
}
