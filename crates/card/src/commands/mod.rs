//! Typed command operations for the applet
//!
//! One module per applet operation. Each command type carries its payload
//! layout and knows how to decode its own response.

pub mod card_id;
pub use card_id::*;
pub mod image;
pub use image::*;
pub mod info;
pub use info::*;
pub mod pin;
pub use pin::*;
pub mod points;
pub use points::*;
pub mod register;
pub use register::*;
pub mod sign;
pub use sign::*;
