pub mod contracts;
pub mod error;
pub mod pipeline;
pub mod redirect;
pub mod session;
