//! Template composition: base templates per structure, family
//! modifiers, grammar agreement and the TTL-cached store.

pub mod composer;
pub mod defaults;
pub mod family;
pub mod grammar;
pub mod store;

pub use composer::Composer;
pub use family::detect_family;
pub use store::TemplateStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("template I/O error: {0}")]
    Io(#[from] std::io::Error),
}
