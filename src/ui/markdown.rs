//! Markdown to styled terminal lines
//!
//! Covers what companion replies actually use: emphasis, inline code,
//! headings, lists, code blocks and paragraphs. Anything else is shown
//! as its plain text.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render `text` into lines, using `base` as the unstyled text style
pub fn render(text: &str, base: Style) -> Vec<Line<'static>> {
    let mut renderer = Renderer::new(base);
    for event in Parser::new(text) {
        renderer.push(event);
    }
    renderer.finish()
}

struct Renderer {
    base: Style,
    styles: Vec<Style>,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// Next item number per open list; `None` for bullet lists
    lists: Vec<Option<u64>>,
    in_code_block: bool,
}

impl Renderer {
    fn new(base: Style) -> Self {
        Self {
            base,
            styles: Vec::new(),
            lines: Vec::new(),
            current: Vec::new(),
            lists: Vec::new(),
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.styles.push(style);
    }

    fn code_style(&self) -> Style {
        self.style().fg(Color::Yellow)
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => {
                self.flush_line();
                if self.lists.is_empty() && !self.lines.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            Event::Start(Tag::Heading { .. }) => {
                self.flush_line();
                self.push_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            Event::Start(Tag::Strong) => self.push_modifier(Modifier::BOLD),
            Event::Start(Tag::Emphasis) => self.push_modifier(Modifier::ITALIC),
            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.lists.push(start);
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.current
                    .push(Span::styled(format!("{}{marker}", "  ".repeat(depth)), self.base));
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }

            Event::End(TagEnd::Paragraph | TagEnd::Item) => self.flush_line(),
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.styles.pop();
            }
            Event::End(TagEnd::Strong | TagEnd::Emphasis) => {
                self.styles.pop();
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.lists.pop();
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
            }

            Event::Text(text) if self.in_code_block => {
                let style = self.code_style();
                for line in text.split_terminator('\n') {
                    self.current.push(Span::styled(line.to_string(), style));
                    self.flush_line();
                }
            }
            Event::Text(text) => {
                let style = self.style();
                self.current.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                let style = self.code_style();
                self.current.push(Span::styled(code.into_string(), style));
            }
            Event::SoftBreak => {
                let style = self.style();
                self.current.push(Span::styled(" ", style));
            }
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::styled("────────", self.base));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}
