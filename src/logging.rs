//! Logging macros
//!
//! - With the `defmt` feature the macros forward to `defmt`.
//! - Host tests print to stdout.
//! - Everything else compiles the arguments away.
//!
//! Arguments are limited to primitives, `&str` and types deriving both `Debug`
//! and `defmt::Format`, so the same call site works on every target.

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(all(not(feature = "defmt"), test))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { ::std::println!("[INFO] {}", format_args!($($arg)*)) };
}

#[cfg(all(not(feature = "defmt"), test))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { ::std::println!("[WARN] {}", format_args!($($arg)*)) };
}

#[cfg(all(not(feature = "defmt"), test))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { ::std::println!("[ERROR] {}", format_args!($($arg)*)) };
}

#[cfg(all(not(feature = "defmt"), test))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { ::std::println!("[DEBUG] {}", format_args!($($arg)*)) };
}

#[cfg(all(not(feature = "defmt"), not(test)))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(all(not(feature = "defmt"), not(test)))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(all(not(feature = "defmt"), not(test)))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(all(not(feature = "defmt"), not(test)))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}
