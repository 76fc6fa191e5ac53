//! Applies decoded commands to the tank.

use log::info;

use super::commands::Command;
use super::tank::TankState;

/// Interprets [`Command`]s against a [`TankState`].
#[derive(Debug, Clone, Copy)]
pub struct CommandHandler {
    /// Volume restored by [`Command::Reset`] (mL).
    default_volume_ml: f32,
}

impl CommandHandler {
    pub fn new(default_volume_ml: f32) -> Self {
        Self { default_volume_ml }
    }

    /// Apply `cmd` and return the tank's new volume (mL).
    ///
    /// Must run between ticks; the caller stops the sample scheduler around it.
    pub fn apply(&self, cmd: Command, tank: &mut TankState) -> f32 {
        let target = match cmd {
            Command::RefillTo(amount) => amount,
            // Saturate: an overflow to infinity would read as an empty tank.
            Command::RefillWith(amount) => {
                (tank.current_volume_ml() + amount.max(0.0)).min(f32::MAX)
            }
            Command::Reset => self.default_volume_ml,
        };
        tank.refill_to(target);
        info!("Refilling to {:.2} ml ({:?})", tank.current_volume_ml(), cmd);
        tank.current_volume_ml()
    }
}
