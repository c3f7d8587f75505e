//! Structured, indented logging of SEL records and sensor descriptions.

mod impls;
pub use impls::DescribedEvent;

use std::sync::Arc;

use parking_lot::Mutex;

/// Where [`Logger::log`] sends rendered lines.
#[derive(Debug, Clone)]
pub enum LogOutput {
    Log(log::Level),
    LogTarget(log::Level, String),
    /// Append every line to a shared buffer.
    Lines(Arc<Mutex<Vec<String>>>),
}

impl From<log::Level> for LogOutput {
    fn from(value: log::Level) -> Self {
        Self::Log(value)
    }
}

impl LogOutput {
    /// An empty [`LogOutput::Lines`] buffer, and the output appending to it.
    pub fn lines() -> (Arc<Mutex<Vec<String>>>, Self) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (lines.clone(), Self::Lines(lines))
    }

    fn write_all(&self, lines: Vec<String>) {
        match self {
            LogOutput::Log(level) => lines.iter().for_each(|l| log::log!(*level, "{l}")),
            LogOutput::LogTarget(level, target) => lines
                .iter()
                .for_each(|l| log::log!(target: target, *level, "{l}")),
            // Lines of one item are appended under a single lock.
            LogOutput::Lines(buffer) => buffer.lock().extend(lines),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogItem {
    level: usize,
    title: String,
    value: Option<String>,
}

impl LogItem {
    pub fn new<T: Into<String>, V: Into<String>>(level: usize, title: T, value: Option<V>) -> Self {
        Self {
            level,
            title: title.into(),
            value: value.map(Into::into),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Move this item `by` levels deeper.
    pub fn indent(mut self, by: usize) -> Self {
        self.level += by;
        self
    }
}

impl<T: ToString, V: ToString> From<(usize, T, V)> for LogItem {
    fn from((level, title, value): (usize, T, V)) -> Self {
        Self::new(level, title.to_string(), Some(value.to_string()))
    }
}

impl<T: ToString> From<(usize, T)> for LogItem {
    fn from((level, value): (usize, T)) -> Self {
        Self::new::<_, String>(level, value.to_string(), None)
    }
}

pub struct Logger;

impl Logger {
    pub fn log<T>(output: &LogOutput, loggable: &T)
    where
        T: Loggable + ?Sized,
    {
        output.write_all(Self::render(loggable))
    }

    /// The lines [`Logger::log`] would print for `loggable`.
    ///
    /// The first item is the heading. Titles of the remaining items are right-aligned
    /// against each other, and every level indents by two spaces.
    pub fn render<T>(loggable: &T) -> Vec<String>
    where
        T: Loggable + ?Sized,
    {
        Self::render_items(&loggable.as_log())
    }

    fn render_items(items: &[LogItem]) -> Vec<String> {
        let mut lines = Vec::with_capacity(items.len());

        if let Some(v) = items.first() {
            lines.push(v.title.clone());
        }

        let right_align = items
            .iter()
            .skip(1)
            .map(|v| v.title.len())
            .max()
            .unwrap_or(0);

        items.iter().skip(1).for_each(|i| {
            let LogItem {
                level,
                title,
                value,
            } = i;

            let front_padding = " ".repeat(level * 2);

            let message = match value {
                Some(value) if !value.is_empty() => {
                    let value_padding = " ".repeat(right_align - title.len());
                    format!("{front_padding}{title}: {value_padding}{value}")
                }
                _ => format!("{front_padding}{title}:"),
            };

            lines.push(message);
        });

        lines
    }
}

pub trait Loggable {
    fn as_log(&self) -> Vec<LogItem>;
}

/// Build a `Vec<LogItem>` from `(level, title)` headings and `(level, title, value)`
/// fields.
#[macro_export]
macro_rules! log_vec {
    [$(($level:literal, $title:expr $(, $value:expr)?)),* $(,)?] => {
        vec![$($crate::log_item!($level, $title $(, $value)?)),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_item {
    ($level:literal, $title:expr) => {
        $crate::LogItem::from(($level, $title))
    };
    ($level:literal, $title:expr, $value:expr) => {
        $crate::LogItem::from(($level, $title, $value))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl Loggable for Sample {
        fn as_log(&self) -> Vec<LogItem> {
            log_vec![
                (0, "Sample"),
                (1, "A", 1),
                (1, "Longer", "value"),
                (1, "Nested"),
                (2, "Deep", format!("0x{:02X}", 0xAB)),
            ]
        }
    }

    #[test]
    fn test_render_alignment() {
        let lines = Logger::render(&Sample);

        assert_eq!(
            lines,
            vec![
                "Sample",
                "  A:      1",
                "  Longer: value",
                "  Nested:",
                "    Deep:   0xAB",
            ]
        );
    }

    #[test]
    fn test_empty() {
        struct Nothing;

        impl Loggable for Nothing {
            fn as_log(&self) -> Vec<LogItem> {
                Vec::new()
            }
        }

        assert!(Logger::render(&Nothing).is_empty());
    }

    #[test]
    fn test_headings_have_no_value() {
        let items = Sample.as_log();

        assert_eq!(items[0].value(), None);
        assert_eq!(items[1].value(), Some("1"));
        assert_eq!(items[3].title(), "Nested");
        assert_eq!(items[3].value(), None);
    }

    #[test]
    fn test_lines_output() {
        let (lines, output) = LogOutput::lines();

        Logger::log(&output, &Sample);
        Logger::log(&output, &Sample);

        let lines = lines.lock();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Sample");
        assert_eq!(lines[5], "Sample");
        assert_eq!(lines[9], "    Deep:   0xAB");
    }

    #[test]
    fn test_indent() {
        let item: LogItem = (1, "Title", "value").into();
        let item = item.indent(2);

        assert_eq!(item.level(), 3);
        assert_eq!(item.title(), "Title");
        assert_eq!(item.value(), Some("value"));
    }
}
