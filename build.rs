fn main() {
    // Only the device build links against ESP-IDF; host builds (simulator,
    // tests) need no environment from embuild.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
