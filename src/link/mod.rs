//! Radio link plumbing: the line codec and the inbound line channel.
//!
//! The serial radio module is transparent; whatever is written to the UART
//! comes out on the app side and vice versa.  Everything above the byte
//! level lives here so both the UART and console transports share it.

pub mod channels;
pub mod codec;

pub use codec::{Line, LineDecoder, MAX_LINE_LEN, ParseMode};
