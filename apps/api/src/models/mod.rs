pub mod question;
pub mod resource;
