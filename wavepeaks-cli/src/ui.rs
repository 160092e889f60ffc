use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use wavepeaks_lib::terminal::{ColumnMark, WaveformFrame};

use crate::controls::{StatusSnapshot, CONTROLS_HELP};

const RULER_HEIGHT: u16 = 2;
const STATUS_HEIGHT: u16 = 3;
const CONTROLS_HEIGHT: u16 = 3;
const LOG_HEIGHT: u16 = 6;

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(RULER_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(CONTROLS_HEIGHT),
            Constraint::Length(LOG_HEIGHT),
        ])
        .split(area)
}

/// Columns and rows available to the waveform for a terminal of `area`.
pub fn waveform_size(area: Rect) -> (usize, usize) {
    let chunks = split(area);
    (
        usize::from(chunks[0].width),
        usize::from(chunks[0].height),
    )
}

fn mark_style(mark: ColumnMark) -> Style {
    match mark {
        ColumnMark::Selected => Style::default().fg(Color::Cyan),
        ColumnMark::Marker => Style::default().fg(Color::Yellow),
        ColumnMark::None => Style::default().fg(Color::Blue),
    }
}

fn waveform_lines(frame: &WaveformFrame) -> Vec<Line<'static>> {
    frame
        .rows
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .enumerate()
                    .map(|(column, glyph)| {
                        Span::styled(glyph.to_string(), mark_style(frame.mark(column)))
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

pub fn draw_viewer(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    frame: &WaveformFrame,
    status: &StatusSnapshot,
    log_lines: &[String],
) -> std::io::Result<()> {
    terminal.draw(|f| {
        let chunks = split(f.size());

        f.render_widget(Paragraph::new(waveform_lines(frame)), chunks[0]);

        let ruler = Paragraph::new(vec![
            Line::from(frame.ruler.ticks.clone()),
            Line::from(frame.ruler.labels.clone()),
        ])
        .style(Style::default().fg(Color::Gray));
        f.render_widget(ruler, chunks[1]);

        let status_widget = Paragraph::new(status.text.as_str())
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title("View"));
        f.render_widget(status_widget, chunks[2]);

        let controls = Paragraph::new(CONTROLS_HELP)
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL).title("Controls"));
        f.render_widget(controls, chunks[3]);

        let log_height = chunks[4].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_text = if log_lines.is_empty() {
            "No logs yet.".to_string()
        } else {
            log_lines[start..].join("\n")
        };

        let log_widget = Paragraph::new(log_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(log_widget, chunks[4]);
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_gets_space_left_after_panels() {
        let (columns, rows) = waveform_size(Rect::new(0, 0, 100, 40));
        assert_eq!(columns, 100);
        assert_eq!(rows, 40 - 2 - 3 - 3 - 6);
    }
}
