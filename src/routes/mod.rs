mod health_check;
mod landing;
mod navigation;
mod waitlist;

pub use health_check::*;
pub use landing::*;
pub use navigation::*;
pub use waitlist::*;
