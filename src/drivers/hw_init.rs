//! One-shot hardware peripheral initialization.
//!
//! Configures the flow-sensor interrupt and the activity LED output using
//! raw ESP-IDF sys calls.  Called once from `main()` before the sample loop
//! starts.  On the host every function is a no-op so the same call sites
//! build for the simulator.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use std::sync::Arc;

#[cfg(target_os = "espidf")]
use log::info;

use crate::sensors::flow::PulseAccumulator;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR install failed (rc={})", rc),
            Self::UartInitFailed(rc)   => write!(f, "UART driver init failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(match e {
            HwInitError::GpioConfigFailed(_) => "gpio config",
            HwInitError::IsrInstallFailed(_) => "flow isr",
            HwInitError::UartInitFailed(_) => "radio uart",
        })
    }
}

// ── Flow sensor ISR ───────────────────────────────────────────

/// GPIO ISR: one rising edge, one pulse.
///
/// `arg` is the `PulseAccumulator` registered by [`init_flow_isr`].
#[cfg(target_os = "espidf")]
unsafe extern "C" fn flow_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: arg came from Arc::into_raw in init_flow_isr and is never
    // released, so the accumulator outlives every interrupt.
    let pulses = unsafe { &*(arg as *const PulseAccumulator) };
    pulses.increment();
}

/// Configure the flow input and hook its rising edge to `pulses`.
#[cfg(target_os = "espidf")]
pub fn init_flow_isr(pulses: Arc<PulseAccumulator>) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::FLOW_PULSE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
    };
    // SAFETY: called once from main() before the sample loop; single-threaded.
    unsafe {
        let ret = gpio_config(&cfg);
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

        // ESP_ERR_INVALID_STATE means the service is already installed.
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // The ISR keeps this reference for the life of the program.
        let arg = Arc::into_raw(pulses) as *mut core::ffi::c_void;
        let ret = gpio_isr_handler_add(pins::FLOW_PULSE_GPIO, Some(flow_gpio_isr), arg);
        if ret != ESP_OK as i32 {
            drop(Arc::from_raw(arg as *const PulseAccumulator));
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        // gpio_config with POSEDGE already enabled the pin interrupt.
    }
    info!("hw_init: flow ISR on GPIO{}", pins::FLOW_PULSE_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_flow_isr(_pulses: Arc<PulseAccumulator>) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): flow ISR skipped, pulses come from the simulator");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

/// Configure the activity LED pin as an output, initially LOW.
#[cfg(target_os = "espidf")]
pub fn init_activity_led() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ACTIVITY_LED_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: one-shot init from main(); pin is not used elsewhere yet.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    // SAFETY: the pin was configured as an output just above.
    unsafe { gpio_set_level(pins::ACTIVITY_LED_GPIO, 0) };
    info!("hw_init: activity LED on GPIO{}", pins::ACTIVITY_LED_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_activity_led() -> Result<(), HwInitError> {
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}
