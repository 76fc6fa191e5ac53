//! GPIO / peripheral pin assignments for the TankMon board.
//!
//! Single source of truth; every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Flow sensor
// ---------------------------------------------------------------------------

/// Hall-effect flow sensor pulse output, interrupt on rising edge.
pub const FLOW_PULSE_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// Activity LED
// ---------------------------------------------------------------------------

/// Lit while a telemetry line is being sent (active HIGH).
pub const ACTIVITY_LED_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Serial radio module (transparent UART bridge)
// ---------------------------------------------------------------------------

pub const RADIO_UART_PORT: i32 = 1;
pub const RADIO_UART_TX_GPIO: i32 = 17;
pub const RADIO_UART_RX_GPIO: i32 = 18;
/// Factory default of common HC-05/HM-10 style modules.
pub const RADIO_UART_BAUD: i32 = 9600;
