//! Serial radio transport (ESP-IDF UART driver).
//!
//! The radio module is a transparent UART bridge.  A line counts as
//! acknowledged once the UART has shifted it out completely within the
//! timeout; the module has no end-to-end ack of its own.  Reads are
//! non-blocking and go through a [`LineDecoder`], so a single poll may
//! complete several lines; the extras wait in a small queue.

use core::time::Duration;

use esp_idf_svc::sys::*;
use heapless::Deque;
use log::{debug, info, warn};

use crate::app::ports::LineTransport;
use crate::drivers::hw_init::HwInitError;
use crate::error::CommsError;
use crate::link::channels::INBOUND_DEPTH;
use crate::link::codec::{Line, LineDecoder};

const RX_RING_SIZE: i32 = 256;
const READ_CHUNK: usize = 64;

/// [`LineTransport`] over one ESP-IDF UART port.
pub struct UartLineTransport {
    port: uart_port_t,
    decoder: LineDecoder,
    pending: Deque<Line, INBOUND_DEPTH>,
}

impl UartLineTransport {
    /// Install the UART driver (8N1, no flow control) on `tx`/`rx`.
    pub fn new(port: i32, tx_gpio: i32, rx_gpio: i32, baud: i32) -> Result<Self, HwInitError> {
        let port = port as uart_port_t;
        let cfg = uart_config_t {
            baud_rate: baud,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        // SAFETY: one-shot init from main(); the port is owned by this value.
        unsafe {
            let ret = uart_param_config(port, &cfg);
            if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }
            let ret = uart_set_pin(port, tx_gpio, rx_gpio, UART_PIN_NO_CHANGE, UART_PIN_NO_CHANGE);
            if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }
            let ret = uart_driver_install(port, RX_RING_SIZE, 0, 0, core::ptr::null_mut(), 0);
            if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }
        }
        info!("uart: radio link on UART{} @ {} baud (TX={}, RX={})", port, baud, tx_gpio, rx_gpio);
        Ok(Self {
            port,
            decoder: LineDecoder::new(),
            pending: Deque::new(),
        })
    }

    fn poll_rx(&mut self) {
        let mut buf = [0u8; READ_CHUNK];
        // SAFETY: buf is valid for READ_CHUNK bytes; zero ticks = non-blocking.
        let n = unsafe {
            uart_read_bytes(self.port, buf.as_mut_ptr().cast(), READ_CHUNK as u32, 0)
        };
        if n <= 0 {
            return;
        }
        let pending = &mut self.pending;
        self.decoder.feed(&buf[..n as usize], |line| {
            if let Err(line) = pending.push_back(line) {
                warn!("uart: inbound queue full, dropping {:?}", line.as_str());
            }
        });
    }
}

fn ms_to_ticks(timeout: Duration) -> TickType_t {
    (timeout.as_millis() as u64 * u64::from(configTICK_RATE_HZ) / 1000) as TickType_t
}

impl LineTransport for UartLineTransport {
    fn send(&mut self, line: &str, ack_timeout: Duration) -> Result<(), CommsError> {
        // SAFETY: line is valid for its length; the driver copies into its ring.
        let written = unsafe {
            uart_write_bytes(self.port, line.as_ptr().cast(), line.len())
        };
        if written < 0 || written as usize != line.len() {
            debug!("uart: write returned {}", written);
            return Err(CommsError::Io);
        }
        // SAFETY: driver installed in new().
        let ret = unsafe { uart_wait_tx_done(self.port, ms_to_ticks(ack_timeout)) };
        if ret != ESP_OK as i32 {
            return Err(CommsError::NotAcknowledged);
        }
        Ok(())
    }

    fn try_receive(&mut self) -> Option<Line> {
        if self.pending.is_empty() {
            self.poll_rx();
        }
        self.pending.pop_front()
    }
}
