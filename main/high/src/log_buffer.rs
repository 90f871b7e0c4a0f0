use gallery_rx::{CancellationHandle, CurrentValueSubject, Observable};

/// Append-only list of output lines plus their newline-joined text as an observable value.
#[derive(Debug)]
pub struct LogBuffer {
    lines: Vec<String>,
    text: CurrentValueSubject<String>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        LogBuffer {
            lines: Vec::new(),
            text: CurrentValueSubject::new(String::new()),
        }
    }
}

impl LogBuffer {
    pub fn new() -> LogBuffer {
        Default::default()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.text.modify(|text| {
            if !self.lines.is_empty() {
                text.push('\n');
            }
            text.push_str(&line);
        });
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.text.send(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.text.value()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Invokes the callback with the current text immediately and then on every change.
    pub fn observe(&self, callback: impl FnMut(String) + 'static) -> CancellationHandle {
        self.text.clone().sink(callback)
    }
}
