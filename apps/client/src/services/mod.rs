//! Feature services: one trait per feature, backed by `ApiClient` in production.
//!
//! Components hold an `Arc<dyn ...Api>`; tests drive them with in-memory fakes.

pub mod ats;
pub mod health;
pub mod image;
pub mod resume;

pub use ats::{AtsApi, AtsService};
pub use health::HealthService;
pub use image::{ImageApi, ImageService};
pub use resume::{ResumeApi, ResumeService};
