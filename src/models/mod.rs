pub mod appointment;
pub mod enums;
pub mod upcoming;
pub mod user;

pub use appointment::*;
pub use upcoming::*;
pub use user::*;
