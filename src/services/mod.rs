//! Business logic services.
//!
//! - [`TextService`]: validation, ID assignment, partial updates, default
//!   ordering
//! - [`BackendFactory`]: opens the configured store

mod backend_factory;
mod text_service;

pub use backend_factory::BackendFactory;
pub use text_service::TextService;
