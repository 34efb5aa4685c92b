pub mod catalog;
pub mod condition;
pub mod location;
pub mod request;
pub mod response;
