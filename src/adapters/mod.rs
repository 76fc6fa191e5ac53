//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                   |
//! |------------|---------------|-------------------------------|
//! | `console`  | LineTransport | stdout / stdin (host only)    |
//! | `log_sink` | EventSink     | Serial log output             |
//! | `time`     | (clock)       | ESP32 system timer / Instant  |
//! | `uart`     | LineTransport | Serial radio module (ESP-IDF) |

#[cfg(not(target_os = "espidf"))]
pub mod console;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
