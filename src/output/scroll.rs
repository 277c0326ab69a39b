// src/output/scroll.rs

/// Snapshot of a run's output handed to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutput {
    pub lines: Vec<String>,
    pub scroll_offset: usize,
    pub exit_code: Option<i32>,
}

/// Windowed view over a growing list of output lines.
///
/// Invariant: `scroll_offset <= max_offset()` after every operation.
#[derive(Debug, Clone)]
pub struct ScrollBuffer {
    lines: Vec<String>,
    scroll_offset: usize,
    window_size: usize,
}

impl ScrollBuffer {
    pub fn new(window_size: usize) -> Self {
        Self {
            lines: Vec::new(),
            scroll_offset: 0,
            window_size: window_size.max(1),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Largest offset that still fills the window.
    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.window_size)
    }

    /// Append lines; with `follow`, pin the view to the tail.
    pub fn append<I>(&mut self, lines: I, follow: bool)
    where
        I: IntoIterator<Item = String>,
    {
        self.lines.extend(lines);
        if follow {
            self.scroll_offset = self.max_offset();
        }
    }

    pub fn push(&mut self, line: impl Into<String>, follow: bool) {
        self.append(std::iter::once(line.into()), follow);
    }

    pub fn scroll_up(&mut self, n: usize) -> usize {
        self.scroll_offset = self.scroll_offset.saturating_sub(n).min(self.max_offset());
        self.scroll_offset
    }

    pub fn scroll_down(&mut self, n: usize) -> usize {
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(self.max_offset());
        self.scroll_offset
    }

    /// Set the window height (at least 1). Returns whether it changed.
    pub fn set_window_size(&mut self, n: usize) -> bool {
        let n = n.max(1);
        if n == self.window_size {
            return false;
        }
        self.window_size = n;
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
        true
    }

    /// Lines currently inside the window.
    pub fn visible(&self) -> &[String] {
        let end = (self.scroll_offset + self.window_size).min(self.lines.len());
        &self.lines[self.scroll_offset.min(end)..end]
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
    }
}
