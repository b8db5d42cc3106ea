pub mod config;
pub mod delivery;
pub mod domain;
pub mod repository;
pub mod telemetry;
pub mod usecase;

pub use domain::session::{Session, SessionPhase};
pub use domain::user::{Role, UserProfile};
pub use usecase::error::{ApiError, SessionError};
pub use usecase::pipeline::{ApiClient, ApiResponse};
pub use usecase::session::SessionStore;
