//! Activity LED.
//!
//! The LED is held HIGH for the duration of each telemetry send,
//! acknowledgment wait included, so a stuck link shows as a lit LED.
//!
//! ## Dual-target design
//!
//! [`GpioOutput`] drives a pin through `hw_init` on ESP-IDF and does nothing
//! on the host.  [`IndicatingTransport`] is generic over any
//! `embedded_hal` output pin, so tests substitute a recording pin.

use core::convert::Infallible;
use core::time::Duration;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::debug;

use crate::app::ports::LineTransport;
use crate::drivers::hw_init;
use crate::error::CommsError;
use crate::link::codec::Line;

/// Push-pull output configured by [`hw_init::init_activity_led`].
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true);
        Ok(())
    }
}

/// Wraps a transport and lights `led` while a line is in flight.
pub struct IndicatingTransport<T, P> {
    inner: T,
    led: P,
}

impl<T: LineTransport, P: OutputPin> IndicatingTransport<T, P> {
    pub fn new(inner: T, led: P) -> Self {
        Self { inner, led }
    }

    pub fn into_inner(self) -> (T, P) {
        (self.inner, self.led)
    }

    fn set_led(&mut self, on: bool) {
        let result = if on { self.led.set_high() } else { self.led.set_low() };
        if result.is_err() {
            debug!("activity LED write failed");
        }
    }
}

impl<T: LineTransport, P: OutputPin> LineTransport for IndicatingTransport<T, P> {
    fn send(&mut self, line: &str, ack_timeout: Duration) -> Result<(), CommsError> {
        self.set_led(true);
        let result = self.inner.send(line, ack_timeout);
        self.set_led(false);
        result
    }

    fn try_receive(&mut self) -> Option<Line> {
        self.inner.try_receive()
    }
}
