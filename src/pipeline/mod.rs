//! Pipeline module - the recoding stages applied in order

pub mod classify;
pub mod collapse;
pub mod error;
pub mod frame;
pub mod label;
pub mod loader;
pub mod logit;
pub mod plan;
pub mod sentinel;

pub use classify::*;
pub use collapse::*;
pub use error::RecodeError;
pub use frame::*;
pub use label::*;
pub use loader::*;
pub use logit::*;
pub use plan::*;
pub use sentinel::*;
