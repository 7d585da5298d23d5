pub mod budget;
pub mod common;
pub mod device;
pub mod error;
pub mod groups;
pub mod model;
pub mod sanitize;
pub mod service;
pub mod toc;

pub use budget::*;
pub use device::*;
pub use error::*;
pub use groups::*;
pub use model::*;
pub use sanitize::*;
pub use service::*;
pub use toc::*;
