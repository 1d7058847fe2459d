//! Report module - presentation output over the recoded table

pub mod charts;
pub mod describe;
pub mod odds;
pub mod summary;

pub use charts::*;
pub use describe::*;
pub use odds::*;
pub use summary::*;
