//! Inbound commands to the application service.
//!
//! Decoded from link lines by [`decode_command`](crate::link::codec::decode_command)
//! and applied between ticks by the
//! [`CommandHandler`](super::handler::CommandHandler).

/// Commands the companion app can send to the monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `RT:<ml>`: the tank now holds exactly this much.
    RefillTo(f32),

    /// `RW:<ml>`: this much was poured on top of what is left.
    RefillWith(f32),

    /// `RST`: back to the configured start-up volume.
    Reset,
}
