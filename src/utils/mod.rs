// Tue Jan 13 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;

/// Renders an address the way 8-bit listings do, e.g. `$0810`.
pub fn format_address(address: u16) -> String {
    format!("${:04X}", address)
}
