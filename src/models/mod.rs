mod media;
mod project;
mod thumbnail;
mod user;

pub use media::*;
pub use project::*;
pub use thumbnail::*;
pub use user::*;
