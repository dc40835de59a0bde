//! UI rendering

use crate::app::App;
use crate::render::ViewLine;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const HELP: &[(&str, &str)] = &[
    ("j / Down", "Next code block"),
    ("k / Up", "Previous code block"),
    ("y / c / Enter", "Copy selected block"),
    ("PageDown / PageUp", "Scroll"),
    ("?", "Toggle help"),
    ("q / Ctrl+C", "Quit"),
];

/// Draw the UI
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Answer
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_answer(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);

    if app.show_help {
        render_help(frame, app, chunks[0]);
    }
}

fn render_answer(frame: &mut Frame, app: &App, area: Rect) {
    // Inner width excludes the borders
    let width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = app
        .view
        .lines
        .iter()
        .skip(app.scroll)
        .take(area.height as usize)
        .map(|line| styled_line(app, line, width))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border))
                .title(format!(" {} ", app.title)),
        )
        .style(app.theme.base);

    frame.render_widget(paragraph, area);
}

fn styled_line<'a>(app: &'a App, line: &'a ViewLine, width: usize) -> Line<'a> {
    let theme = &app.theme;
    match line {
        ViewLine::Heading { level, text } => {
            let idx = (*level as usize).clamp(1, theme.heading.len()) - 1;
            Line::from(Span::styled(text.as_str(), theme.heading[idx]))
        }
        ViewLine::Text(text) => Line::from(Span::styled(text.as_str(), theme.base)),
        ViewLine::Blank => Line::default(),
        ViewLine::CodeHeader { block } => code_header(app, *block, width),
        ViewLine::Code { spans, .. } => {
            let mut out = vec![Span::styled("  ", theme.code)];
            out.extend(
                spans
                    .iter()
                    .map(|(class, text)| Span::styled(text.as_str(), theme.token(*class))),
            );
            Line::from(out)
        }
    }
}

/// `─ label ────── ⧉ Copy `, padded to the full width
fn code_header(app: &App, block: usize, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let label = app
        .view
        .blocks
        .get(block)
        .map(|b| b.label.clone())
        .unwrap_or_default();
    let face = app.control_face(block);
    let selected = app.selected == Some(block);

    let left = format!(" {label} ");
    let right = format!(" {} ", face.text());
    let fill = width.saturating_sub(left.width() + right.width());

    let mut header_style = theme.code_header;
    if selected {
        header_style = header_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    let face_style = if face == qamd_core::copy::ControlFace::COPIED {
        theme.copy_done
    } else {
        theme.copy_idle
    };

    Line::from(vec![
        Span::styled(left, header_style),
        Span::styled(" ".repeat(fill), header_style),
        Span::styled(right, face_style),
    ])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block_count = app.view.blocks.len();
    let position = match app.selected {
        Some(idx) => format!("block {}/{}", idx + 1, block_count),
        None => "no code blocks".to_string(),
    };

    let theme_str = match app.config.theme {
        qamd_core::config::ThemeVariant::Dark => "DARK",
        qamd_core::config::ThemeVariant::Light => "LIGHT",
    };

    let message = app.status_message.as_deref().unwrap_or("");

    let status_text = format!(
        " qamd  {}  {}/{} lines  [{}]  {}",
        position,
        (app.scroll + 1).min(app.view.lines.len().max(1)),
        app.view.lines.len(),
        theme_str,
        message
    );

    let status = Paragraph::new(Line::from(vec![Span::styled(
        status_text,
        Style::default()
            .fg(app.theme.status_bar_fg)
            .bg(app.theme.status_bar_bg)
            .add_modifier(Modifier::BOLD),
    )]));

    frame.render_widget(status, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let key_width = HELP.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<key_width$}  "),
                    app.theme.heading[0],
                ),
                Span::styled(*desc, app.theme.base),
            ])
        })
        .collect();

    let width = (key_width + 26).min(area.width as usize) as u16;
    let height = (HELP.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border))
                    .title(" Help "),
            )
            .style(app.theme.base),
        popup,
    );
}
