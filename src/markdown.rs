//! Markdown to terminal text
//!
//! Walks the pulldown-cmark event stream and builds ratatui lines. Fenced
//! code blocks with a recognised language tag are colored with syntect;
//! everything else falls back to a plain code style.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "Solarized (dark)";
const CODE_INDENT: &str = "  ";
const QUOTE_BAR: &str = "│ ";
const RULE: &str = "────────────────────────────────";

fn code_style() -> Style {
    Style::new().fg(Color::Yellow)
}

fn muted_style() -> Style {
    Style::new().fg(Color::DarkGray)
}

fn heading_style(level: HeadingLevel) -> Style {
    let base = Style::new().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => base.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => base.fg(Color::Cyan),
        _ => base.fg(Color::LightBlue),
    }
}

/// Render markdown source into styled terminal text.
pub fn render(source: &str) -> Text<'static> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::default();
    for event in Parser::new_ext(source, options) {
        renderer.event(event);
    }
    renderer.finish()
}

struct CodeBuffer {
    language: Option<String>,
    text: String,
}

#[derive(Default)]
struct TableBuffer {
    rows: Vec<Vec<String>>,
    header_rows: usize,
    row: Vec<String>,
    cell: String,
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list; `Some(n)` is the next ordinal
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    code: Option<CodeBuffer>,
    links: Vec<String>,
    table: Option<TableBuffer>,
}

impl Renderer {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn push_span(&mut self, text: String, style: Style) {
        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(&text);
        } else {
            self.current.push(Span::styled(text, style));
        }
    }

    fn emit(&mut self, spans: Vec<Span<'static>>) {
        let mut line = Vec::with_capacity(spans.len() + 1);
        if self.quote_depth > 0 {
            line.push(Span::styled(QUOTE_BAR.repeat(self.quote_depth), muted_style()));
        }
        line.extend(spans);
        self.lines.push(Line::from(line));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.emit(spans);
        }
    }

    /// Separate blocks with a single empty line.
    fn gap(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.text.push_str(&text);
                } else {
                    self.push_span(text.into_string(), self.style());
                }
            }
            Event::Code(code) => self.push_span(code.into_string(), self.style().patch(code_style())),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_span(html.trim_end().to_string(), muted_style());
            }
            Event::SoftBreak => self.push_span(" ".to_string(), self.style()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.gap();
                self.emit(vec![Span::styled(RULE, muted_style())]);
                self.lines.push(Line::default());
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push_span(marker.to_string(), self.style());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            Tag::Heading { level, .. } => {
                self.gap();
                self.push_style(heading_style(level));
            }
            Tag::Emphasis => self.push_style(Style::new().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::new().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self.push_style(Style::new().add_modifier(Modifier::CROSSED_OUT)),
            Tag::BlockQuote(_) => {
                self.gap();
                self.quote_depth += 1;
                self.push_style(Style::new().fg(Color::Gray).add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.gap();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBuffer {
                    language,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.gap();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.current
                    .push(Span::styled(format!("{indent}{marker}"), Style::new().fg(Color::Cyan)));
            }
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.into_string());
                self.push_style(
                    Style::new()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Table(_) => {
                self.gap();
                self.table = Some(TableBuffer::default());
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush();
                self.lines.push(Line::default());
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.styles.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.gap();
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.code_block(&code);
                }
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.links.pop().filter(|u| !u.is_empty()) {
                    self.push_span(format!(" ({url})"), muted_style());
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                    table.header_rows = table.rows.len();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.table_block(&table);
                }
            }
            _ => {}
        }
    }

    fn code_block(&mut self, code: &CodeBuffer) {
        if let Some(language) = &code.language {
            self.emit(vec![Span::styled(
                format!("{CODE_INDENT}{language}"),
                muted_style().add_modifier(Modifier::ITALIC),
            )]);
        }
        for line in highlight_code(&code.text, code.language.as_deref()) {
            let mut spans = vec![Span::raw(CODE_INDENT)];
            spans.extend(line.spans);
            self.emit(spans);
        }
        self.lines.push(Line::default());
    }

    fn table_block(&mut self, table: &TableBuffer) {
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        for (r, row) in table.rows.iter().enumerate() {
            let header = r < table.header_rows;
            let style = if header {
                Style::new().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = Vec::new();
            for (i, width) in widths.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" │ ", muted_style()));
                }
                let cell = row.get(i).map_or("", String::as_str);
                spans.push(Span::styled(format!("{cell:<width$}"), style));
            }
            self.emit(spans);

            if header && r + 1 == table.header_rows {
                let rule = widths
                    .iter()
                    .map(|w| "─".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                self.emit(vec![Span::styled(rule, muted_style())]);
            }
        }
        self.lines.push(Line::default());
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

/// Map common short tags onto names syntect knows.
fn normalize_language(lang: &str) -> String {
    match lang.to_lowercase().as_str() {
        "py" => "python".to_string(),
        "js" | "jsx" => "javascript".to_string(),
        "ts" | "tsx" => "typescript".to_string(),
        "rs" => "rust".to_string(),
        "sh" | "shell" | "zsh" => "bash".to_string(),
        "yml" => "yaml".to_string(),
        "md" => "markdown".to_string(),
        "cpp" | "c++" => "c++".to_string(),
        "cs" | "csharp" => "c#".to_string(),
        "rb" => "ruby".to_string(),
        "golang" => "go".to_string(),
        other => other.to_string(),
    }
}

fn highlight_code(code: &str, language: Option<&str>) -> Vec<Line<'static>> {
    let syntax = language.map(normalize_language).and_then(|lang| {
        SYNTAX_SET
            .find_syntax_by_extension(&lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_name(&lang))
            .or_else(|| SYNTAX_SET.find_syntax_by_token(&lang))
    });
    let theme = THEME_SET.themes.get(THEME_NAME);

    let (Some(syntax), Some(theme)) = (syntax, theme) else {
        return code
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), code_style())))
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(code)
        .map(|line| match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| {
                        Span::styled(text.trim_end_matches(['\n', '\r']).to_string(), to_ratatui(style))
                    })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                tracing::debug!(error = %e, "Highlighting failed, using plain style");
                Line::from(Span::styled(
                    line.trim_end_matches(['\n', '\r']).to_string(),
                    code_style(),
                ))
            }
        })
        .collect()
}

fn to_ratatui(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::new().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::SIMULATED_RESPONSE;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn find_span<'a>(text: &'a Text<'_>, needle: &str) -> &'a Span<'a> {
        text.lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content.contains(needle))
            .unwrap_or_else(|| panic!("no span containing {needle:?}"))
    }

    #[test]
    fn test_empty_source() {
        assert!(render("").lines.is_empty());
    }

    #[test]
    fn test_heading_is_bold() {
        let text = render("# Title\n\nBody");
        assert_eq!(plain(&text), vec!["Title", "", "Body"]);
        let span = find_span(&text, "Title");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_inline_styles() {
        let text = render("plain *it* **bold** ~~gone~~ `code`");
        assert!(find_span(&text, "it").style.add_modifier.contains(Modifier::ITALIC));
        assert!(find_span(&text, "bold").style.add_modifier.contains(Modifier::BOLD));
        assert!(find_span(&text, "gone").style.add_modifier.contains(Modifier::CROSSED_OUT));
        assert_eq!(find_span(&text, "code").style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_lists() {
        let text = render("- a\n- b\n  - c\n\n1. one\n2. two\n");
        assert_eq!(
            plain(&text),
            vec!["• a", "• b", "  • c", "", "1. one", "2. two"]
        );
    }

    #[test]
    fn test_task_list() {
        let text = render("- [x] done\n- [ ] todo\n");
        assert_eq!(plain(&text), vec!["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn test_blockquote_prefix() {
        let text = render("> quoted line");
        assert_eq!(plain(&text), vec!["│ quoted line"]);
    }

    #[test]
    fn test_link_shows_url() {
        let text = render("see [docs](https://example.com)");
        assert_eq!(plain(&text), vec!["see docs (https://example.com)"]);
    }

    #[test]
    fn test_table_columns_aligned() {
        let text = render("| a | bb |\n| - | -- |\n| ccc | d |\n");
        assert_eq!(
            plain(&text),
            vec!["a   │ bb", "────┼───", "ccc │ d "]
        );
    }

    #[test]
    fn test_known_language_is_highlighted() {
        let text = render("```rust\nfn main() {}\n```");
        let lines = plain(&text);
        assert_eq!(lines, vec!["  rust", "  fn main() {}"]);
        let colored = text.lines[1]
            .spans
            .iter()
            .any(|s| matches!(s.style.fg, Some(Color::Rgb(..))));
        assert!(colored);
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let text = render("```nosuchlang\nx = 1\ny = 2\n```");
        assert_eq!(plain(&text), vec!["  nosuchlang", "  x = 1", "  y = 2"]);
        assert_eq!(text.lines[1].spans[1].style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("JS"), "javascript");
        assert_eq!(normalize_language("py"), "python");
        assert_eq!(normalize_language("haskell"), "haskell");
    }

    #[test]
    fn test_simulated_document() {
        let text = render(SIMULATED_RESPONSE);
        let lines = plain(&text);
        let has = |needle: &str| lines.iter().any(|l| l.contains(needle));

        assert_eq!(lines[0], "AI Response");
        assert!(has("• Markdown support for better formatting"));
        assert!(has("  javascript"));
        assert!(has("console.log(greeting('User'));"));
        assert!(has("│ This is a blockquote"));
        assert!(has("Markdown          │ Formats text with headings, lists, etc."));
        assert!(has("links (https://example.com)"));
        assert!(!has("```"));
        assert!(!has("**"));
    }
}
