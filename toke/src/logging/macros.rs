//! `log_*!` macros
//!
//! Every macro takes a message plus optional `"key" => value` context whose
//! values only need `Display`. `log_error!` and `log_warning!` also take a
//! `Code` and an optional `position = <Position>`.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_event {
    ($event:expr, position = $position:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_event!(($event).with_position($position) $(, $key => $value)*)
    };

    ($event:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::is_initialized() {
            #[allow(unused_mut)]
            let mut event = $event;
            $(
                event = event.with_context($key, &::std::format!("{}", $value));
            )*
            $crate::logging::dispatch(event);
        }
    };
}

/// Log an error, optionally at a source position
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr $(, $($rest:tt)*)?) => {
        $crate::__log_event!($crate::logging::LogEvent::error($code, $message) $(, $($rest)*)?)
    };
}

/// Log a coded warning; inside a file scope it is collected like an error
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr $(, $($rest:tt)*)?) => {
        $crate::__log_event!($crate::logging::LogEvent::warning($code, $message) $(, $($rest)*)?)
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_event!($crate::logging::LogEvent::success($code, $message) $(, $key => $value)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_event!($crate::logging::LogEvent::info($message) $(, $key => $value)*)
    };
}

/// Context is only formatted when debug events would be kept
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::debug_enabled() {
            $crate::__log_event!($crate::logging::LogEvent::debug($message) $(, $key => $value)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::Position;

    #[test]
    fn test_macro_forms_expand() {
        let length: usize = 300;
        let path = std::path::PathBuf::from("page.html");

        log_error!(codes::configuration::INVALID_REGISTRATION, "Empty name");
        log_error!(
            codes::scanning::SOURCE_READ_FAILURE,
            "Read failed",
            position = Position::start()
        );
        log_error!(codes::file_processing::IO_ERROR, "Read failed",
            "path" => path.display(),
            "bytes" => 12
        );
        log_warning!(codes::scanning::LONG_IDENTIFIER, "Long run",
            position = Position::new(3, 1, 4),
            "length" => length
        );
        log_warning!(codes::file_processing::LARGE_FILE, &format!("{} is large", path.display()), "size" => 1024);
        log_success!(codes::success::SCAN_COMPLETE, "Scan complete",
            "tokens" => 12,
            "lines" => 3,
        );
        log_info!("Scanning", "reserved" => 7);
        log_debug!("Token emitted", "type" => "OPEN TAG");
        log_debug!("Plain debug");
    }
}
