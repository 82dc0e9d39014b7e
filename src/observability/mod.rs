//! Observability for diskstore
//!
//! Store operations report typed [`Event`]s through the `log` facade. A
//! line reads `EVENT key=value key=value` with keys in sorted order, so
//! output is stable for the same inputs. Installing a logger (for example
//! `env_logger` in the binary) is the caller's decision; without one the
//! events are dropped.
//!
//! Logging never influences the outcome of an operation.

mod events;

pub use events::Event;

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let level = event.level();
    if log::log_enabled!(target: "diskstore", level) {
        log::log!(target: "diskstore", level, "{}", render(event, fields));
    }
}

/// Render an event line with keys in sorted order
pub fn render(event: Event, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let mut line = String::with_capacity(64);
    line.push_str(event.as_str());
    for (key, value) in sorted {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        if value.is_empty() || value.contains(char::is_whitespace) || value.contains('"') {
            line.push_str(&format!("{:?}", value));
        } else {
            line.push_str(value);
        }
    }
    line
}
