pub mod diagnosis;
pub mod enums;
pub mod interview;
pub mod patient;

pub use diagnosis::*;
pub use enums::*;
pub use interview::*;
pub use patient::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },

    #[error("Age {0} is outside the accepted range 0-150")]
    AgeOutOfRange(u16),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}
