pub mod credentials;
pub mod navigation;
pub mod request;
pub mod session;
pub mod user;
