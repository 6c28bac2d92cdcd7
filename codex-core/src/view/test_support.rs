//! Helpers for render tests on `TestBackend`.

use ratatui::{Frame, Terminal, backend::TestBackend, buffer::Buffer};

/// Draw once into a `width`x`height` test terminal and return the buffer.
pub fn render<F>(width: u16, height: u16, draw: F) -> Buffer
where
    F: FnOnce(&mut Frame<'_>),
{
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();
    terminal.backend().buffer().clone()
}

/// Buffer contents, one string per row.
pub fn lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

pub fn contains(buffer: &Buffer, needle: &str) -> bool {
    lines(buffer).iter().any(|l| l.contains(needle))
}
