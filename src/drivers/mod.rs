//! Hardware initialisation and the activity LED.

pub mod activity_led;
pub mod hw_init;
