//! Frame layout and widgets

use super::app::App;
use crate::config::ResponseMode;
use crate::conversation::{Message, Role, PLACEHOLDER_TEXT};
use crate::markdown;
use crate::stopwatch::{format_elapsed, TimerState};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const TITLE: &str = "AI Chat with Response Timer";
const INPUT_PLACEHOLDER: &str = "Ask something...";
const KEY_HINTS: &str = " Enter send · Ctrl-S timer · Ctrl-R reset · Ctrl-X cancel · Esc quit ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [header, timer, transcript, input] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    draw_header(frame, header, app);
    draw_stopwatch(frame, timer, app.controller().timer().state());
    draw_transcript(frame, transcript, app);
    draw_input(frame, input, app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let badge = match controller.mode() {
        ResponseMode::Simulated => Span::styled(
            format!(" {} ", ResponseMode::Simulated.label()),
            Style::new().fg(Color::Black).bg(Color::Yellow),
        ),
        ResponseMode::Live => Span::styled(
            format!(" {} · {} ", ResponseMode::Live.label(), controller.source_name()),
            Style::new().fg(Color::Black).bg(Color::Green),
        ),
    };

    let mut spans = vec![
        Span::styled(TITLE, Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        badge,
    ];
    if let Some(status) = app.status() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.to_string(), Style::new().fg(Color::Red)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_stopwatch(frame: &mut Frame, area: Rect, state: TimerState) {
    let parts = format_elapsed(state.elapsed_ms);
    let (status, status_style) = if state.running {
        ("● Recording", Style::new().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else {
        ("○ Idle", Style::new().fg(Color::DarkGray))
    };

    let digits = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
    let sep = Style::new().fg(Color::DarkGray);
    let reading = Line::from(vec![
        Span::styled(parts.hours_str(), digits),
        Span::styled(":", sep),
        Span::styled(parts.minutes_str(), digits),
        Span::styled(":", sep),
        Span::styled(parts.seconds_str(), digits),
        Span::styled(".", sep),
        Span::styled(parts.hundredths_str(), Style::new().fg(Color::Gray)),
    ]);
    let text = Text::from(vec![reading, Line::styled(status, status_style)]);

    let panel = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Response Time "),
    );
    frame.render_widget(panel, area);
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    if app.controller().transcript().is_empty() {
        let empty = Text::from(vec![
            Line::default(),
            Line::styled(
                "Start a conversation with the AI",
                Style::new().add_modifier(Modifier::BOLD),
            ),
            Line::styled("Your messages will appear here", Style::new().fg(Color::DarkGray)),
        ]);
        let widget = Paragraph::new(empty)
            .alignment(Alignment::Center)
            .block(block.title(" Conversation "));
        frame.render_widget(widget, area);
        app.set_max_scroll(0);
        return;
    }

    let frame_count = app.frame();
    let (controller, rendered) = app.transcript_parts();
    let pending = controller.is_busy()
        && controller
            .transcript()
            .last()
            .is_some_and(|m| m.content == PLACEHOLDER_TEXT);
    let count = controller.transcript().len();
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (i, message) in controller.transcript().messages().iter().enumerate() {
        let body = rendered.body(i, message);
        lines.push(label(message.role));
        if pending && i + 1 == count {
            lines.push(loading_line(frame_count));
        } else {
            lines.extend(body.iter().cloned());
        }
        lines.push(Line::default());
    }
    lines.pop();

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let height = paragraph.line_count(inner.width);
    let max_scroll = u16::try_from(height.saturating_sub(usize::from(inner.height))).unwrap_or(u16::MAX);
    app.set_max_scroll(max_scroll);
    let offset = max_scroll - app.scroll_back();

    let title = if app.scroll_back() > 0 {
        format!(" Conversation (↑{}) ", app.scroll_back())
    } else {
        " Conversation ".to_string()
    };
    let widget = paragraph.scroll((offset, 0)).block(block.title(title));
    frame.render_widget(widget, area);
}

/// Rendered bodies by transcript index. Only the message still streaming
/// changes between frames, so every other entry is reused as is.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: Vec<(String, Vec<Line<'static>>)>,
    #[cfg(test)]
    renders: usize,
}

impl RenderCache {
    fn body(&mut self, index: usize, message: &Message) -> &[Line<'static>] {
        let fresh = self
            .entries
            .get(index)
            .is_some_and(|(content, _)| *content == message.content);
        if !fresh {
            self.entries.truncate(index);
            self.entries
                .push((message.content.clone(), body_lines(message)));
            #[cfg(test)]
            {
                self.renders += 1;
            }
        }
        self.entries
            .get(index)
            .map_or(&[], |(_, lines)| lines.as_slice())
    }
}

fn label(role: Role) -> Line<'static> {
    match role {
        Role::User => Line::styled("You", Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        Role::Assistant => Line::styled(
            "AI Assistant",
            Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    }
}

fn loading_line(frame: usize) -> Line<'static> {
    let dots = ".".repeat(frame / 10 % 3 + 1);
    Line::styled(
        format!("Thinking{dots}"),
        Style::new().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )
}

fn body_lines(message: &Message) -> Vec<Line<'static>> {
    match message.role {
        Role::User => message.content.lines().map(|l| Line::raw(l.to_string())).collect(),
        Role::Assistant => markdown::render(&message.content).lines,
    }
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let busy = controller.is_busy();

    let (text, style) = if controller.input().is_empty() {
        (INPUT_PLACEHOLDER, Style::new().fg(Color::DarkGray))
    } else {
        (controller.input(), Style::new().fg(Color::Yellow))
    };
    let title = if busy {
        " Waiting for response (Ctrl-X to cancel, Enter disabled) "
    } else {
        " Message "
    };
    let border = if busy {
        Style::new().fg(Color::DarkGray)
    } else {
        Style::new().fg(Color::Cyan)
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title)
            .title_bottom(KEY_HINTS),
    );
    frame.render_widget(input, area);

    let typed = u16::try_from(Line::raw(controller.input()).width()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(typed).saturating_add(1);
    frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
}
