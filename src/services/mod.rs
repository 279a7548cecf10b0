pub mod auth;
pub mod image;
pub mod media;
pub mod projects;
pub mod thumbnails;
