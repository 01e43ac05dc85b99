use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown stage: {name}")]
    UnknownStage { name: String },

    #[error("Unknown limiting parameter: {name}")]
    UnknownParameter { name: String },
}
