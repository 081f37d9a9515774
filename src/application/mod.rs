//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateless services shared by the use cases.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{MagnetCommand, PreviewSettings};
pub use use_cases::{AutoParseUseCase, MagnetCommandUseCase, PreviewUseCase};
