//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Metadata, Record};

/// Routes `log` records to `console.error/warn/info/debug`.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    /// Install the console logger. Later calls only adjust the level.
    pub fn init(level: LevelFilter) {
        // Another logger (or an earlier call) may already be installed
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(level);
    }
}

/// Format a record the way it appears in the console.
fn format_record(record: &Record) -> String {
    format!("[flipview] {}", record.args())
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format_record(record);

        #[cfg(target_arch = "wasm32")]
        {
            let message = wasm_bindgen::JsValue::from_str(&message);
            match record.level() {
                Level::Error => web_sys::console::error_1(&message),
                Level::Warn => web_sys::console::warn_1(&message),
                Level::Info => web_sys::console::info_1(&message),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        match record.level() {
            Level::Error | Level::Warn => eprintln!("{message}"),
            Level::Info | Level::Debug | Level::Trace => println!("{message}"),
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        let record = Record::builder()
            .args(format_args!("Flipbook initialized: flipbook-1"))
            .level(Level::Info)
            .build();
        assert_eq!(
            format_record(&record),
            "[flipview] Flipbook initialized: flipbook-1"
        );
    }
}
