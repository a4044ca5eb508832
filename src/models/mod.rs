pub mod enums;
pub mod person;
pub mod record;
pub mod result;

pub use enums::*;
pub use person::*;
pub use record::*;
pub use result::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
