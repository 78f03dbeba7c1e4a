use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

static LOGGER_CONFIG: Lazy<RwLock<LoggingConfig>> =
    Lazy::new(|| RwLock::new(LoggingConfig::default()));

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub enum LogLevel {
    INFO,
    VERBOSE,
}

#[macro_export]
macro_rules! logln {
    ($fmt:literal) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            println!("[{}:{}] {}", file!(), line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            print!("[{}:{}] ", file!(), line!());
            println!($fmt, $($arg)*);
        }
    };
}

#[macro_export]
macro_rules! logvbln {
    ($fmt:literal) => {
        if $crate::util::logging::is_enabled(Self::CC)
            && $crate::util::logging::is_at_level(Self::CC, $crate::util::logging::LogLevel::VERBOSE)
        {
            println!("[{}:{}] {}", file!(), line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_enabled(Self::CC)
            && $crate::util::logging::is_at_level(Self::CC, $crate::util::logging::LogLevel::VERBOSE)
        {
            print!("[{}:{}] ", file!(), line!());
            println!($fmt, $($arg)*);
        }
    };
}

// A poisoned lock only means a panic happened mid-update; the flags are still usable.
fn read<R>(f: impl FnOnce(&LoggingConfig) -> R) -> R {
    match LOGGER_CONFIG.read() {
        Ok(config) => f(&config),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

fn write(f: impl FnOnce(&mut LoggingConfig)) {
    match LOGGER_CONFIG.write() {
        Ok(mut config) => f(&mut config),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

pub fn is_enabled(cc: &'static str) -> bool {
    read(|config| config.cc_enabled(cc))
}

pub fn is_at_level(cc: &'static str, level: LogLevel) -> bool {
    read(|config| config.cc_at_level(cc, level))
}

pub fn disable_cc(cc: &'static str) {
    write(|config| config.disable_cc(cc));
}

pub fn enable_cc(cc: &'static str, level: LogLevel) {
    write(|config| config.enable_cc(cc, level));
}

pub fn set_global_logging(enabled: bool) {
    write(|config| {
        if enabled {
            config.enable_global_tracing()
        } else {
            config.disable_global_tracing()
        }
    });
}

pub fn set_global_level(level: LogLevel) {
    write(|config| config.set_global_level(level));
}

#[derive(Debug)]
pub struct LoggingConfig {
    global_tracing_enabled: bool,
    global_level: LogLevel,
    flags: HashMap<&'static str, (bool, LogLevel)>, // <component, (tracing enabled, trace level)>
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_tracing_enabled: true,
            global_level: LogLevel::INFO,
            flags: Default::default(),
        }
    }
}

impl LoggingConfig {
    pub fn cc_enabled(&self, cc: &str) -> bool {
        if !self.global_tracing_enabled {
            return false;
        }

        self.flags.get(cc).map_or(true, |flag| flag.0)
    }

    pub fn cc_at_level(&self, cc: &str, level: LogLevel) -> bool {
        if self.global_level >= level {
            return true;
        }

        self.flags.get(cc).map_or(LogLevel::INFO, |flag| flag.1) >= level
    }

    pub fn enable_cc(&mut self, cc: &'static str, level: LogLevel) {
        self.flags.insert(cc, (true, level));
    }

    pub fn disable_cc(&mut self, cc: &'static str) {
        let level = self.flags.get(cc).map_or(LogLevel::INFO, |flag| flag.1);
        self.flags.insert(cc, (false, level));
    }

    pub fn enable_global_tracing(&mut self) {
        self.global_tracing_enabled = true;
    }

    pub fn disable_global_tracing(&mut self) {
        self.global_tracing_enabled = false;
    }

    pub fn set_global_level(&mut self, level: LogLevel) {
        self.global_level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_default_to_enabled_at_info() {
        let config = LoggingConfig::default();

        assert!(config.cc_enabled("Planner"));
        assert!(config.cc_at_level("Planner", LogLevel::INFO));
        assert!(!config.cc_at_level("Planner", LogLevel::VERBOSE));
    }

    #[test]
    fn component_flags_override_defaults() {
        let mut config = LoggingConfig::default();
        config.enable_cc("GoogleMaps", LogLevel::VERBOSE);
        config.disable_cc("RouteDB");

        assert!(config.cc_at_level("GoogleMaps", LogLevel::VERBOSE));
        assert!(!config.cc_enabled("RouteDB"));
        assert!(config.cc_enabled("GoogleMaps"));
    }

    #[test]
    fn global_switches_win() {
        let mut config = LoggingConfig::default();
        config.set_global_level(LogLevel::VERBOSE);
        assert!(config.cc_at_level("Anything", LogLevel::VERBOSE));

        config.disable_global_tracing();
        assert!(!config.cc_enabled("Anything"));
    }
}
