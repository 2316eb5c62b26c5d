//! Frame layout and drawing

use super::markdown;
use super::theme::Theme;
use crate::session::{Sender, Session, Tab};
use crate::state_machine::Mood;
use crate::store::KeyValueStore;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Tabs, Wrap};
use ratatui::Frame;

const TOOLKIT_TIPS: &[&str] = &[
    "🛠️ **Quick Wellness Toolkit**",
    "✨ Try 5 deep breaths",
    "📝 Write down one thing you’re grateful for",
    "🎶 Listen to your favorite song",
];

const EMPTY_JOURNAL: &str = "No journal entries yet. Start writing your thoughts! ✍️";
const THINKING: &str = "⏳ Thinking...";
const DISCLAIMER: &str = "⚠️ **SAATHI AI** is for wellness support. It is **not** medical advice. \
     If you are in crisis, please reach out to a qualified professional or local helpline.";
const KEY_HELP: &str = "Tab: switch view · F1-F4: mood · Enter: send/save · Esc: quit";

pub fn draw<S: KeyValueStore>(frame: &mut Frame, session: &Session<S>) {
    let theme = Theme::for_mood(session.mood());
    let [header, mood_bar, body, input, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    draw_header(frame, header, session.tab(), theme);
    draw_mood_bar(frame, mood_bar, session.mood(), theme);
    draw_body(frame, body, session, theme);
    draw_input(frame, input, session, theme);
    draw_footer(frame, footer);
}

fn draw_header(frame: &mut Frame, area: Rect, active: Tab, theme: Theme) {
    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(active.index())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .block(
            Block::bordered()
                .title(" 🧠 SAATHI ")
                .border_style(Style::default().fg(theme.accent)),
        );
    frame.render_widget(tabs, area);
}

fn draw_mood_bar(frame: &mut Frame, area: Rect, current: Mood, theme: Theme) {
    let mut spans = vec![Span::styled(
        " 🌈 Set Your Mood: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (i, mood) in Mood::ALL.into_iter().enumerate() {
        let style = if mood == current {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!(" F{} {} {} ", i + 1, mood.emoji(), mood.label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body<S: KeyValueStore>(frame: &mut Frame, area: Rect, session: &Session<S>, theme: Theme) {
    let lines = match session.tab() {
        Tab::Chat => chat_lines(session, theme),
        Tab::Journal => journal_lines(session, theme),
        Tab::Toolkit => TOOLKIT_TIPS
            .iter()
            .flat_map(|tip| markdown::render(tip, Style::default().fg(theme.bot)))
            .collect(),
    };

    let block = Block::bordered().border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    let scroll = bottom_scroll(&lines, inner);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn chat_lines<S: KeyValueStore>(session: &Session<S>, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in session.messages() {
        let (label, color) = match message.sender {
            Sender::User => ("You", theme.user),
            Sender::Bot => ("Saathi", theme.bot),
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", message.time),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]));
        lines.extend(markdown::render(&message.text, Style::default().fg(color)));
        lines.push(Line::default());
    }
    if session.is_awaiting_reply() {
        lines.push(Line::styled(
            THINKING,
            Style::default().fg(theme.bot).add_modifier(Modifier::ITALIC),
        ));
    }
    lines
}

fn journal_lines<S: KeyValueStore>(session: &Session<S>, theme: Theme) -> Vec<Line<'static>> {
    let entries = session.journal_entries();
    if entries.is_empty() {
        return vec![Line::styled(EMPTY_JOURNAL, Style::default().fg(theme.bot))];
    }

    let mut lines = Vec::new();
    for entry in entries {
        lines.extend(markdown::render(&entry.text, Style::default().fg(theme.user)));
        lines.push(Line::styled(
            entry.time.clone(),
            Style::default().add_modifier(Modifier::DIM),
        ));
        lines.push(Line::default());
    }
    lines
}

/// Scroll offset that keeps the last wrapped row visible
fn bottom_scroll(lines: &[Line<'_>], inner: Rect) -> u16 {
    let width = usize::from(inner.width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    let overflow = rows.saturating_sub(usize::from(inner.height));
    u16::try_from(overflow).unwrap_or(u16::MAX)
}

fn draw_input<S: KeyValueStore>(frame: &mut Frame, area: Rect, session: &Session<S>, theme: Theme) {
    let (placeholder, action) = match session.tab() {
        Tab::Chat => ("Tell me what’s on your mind…", "Send"),
        Tab::Journal => ("Write your thoughts here…", "Save"),
        Tab::Toolkit => ("Tell me what’s on your mind…", "Save"),
    };
    let action = if session.tab() == Tab::Chat && session.is_awaiting_reply() {
        "Waiting…"
    } else {
        action
    };

    let draft = session.draft();
    let content = if draft.is_empty() {
        Line::styled(placeholder, Style::default().add_modifier(Modifier::DIM))
    } else {
        Line::raw(draft.to_string())
    };

    let block = Block::bordered()
        .title(format!(" Enter: {action} "))
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(content).block(block), area);

    let typed = u16::try_from(Line::raw(draft).width()).unwrap_or(u16::MAX);
    let x = inner.x.saturating_add(typed).min(inner.right().saturating_sub(1));
    frame.set_cursor_position(Position::new(x, inner.y));
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let mut lines = markdown::render(DISCLAIMER, Style::default().add_modifier(Modifier::DIM));
    lines.push(Line::styled(KEY_HELP, Style::default().add_modifier(Modifier::DIM)));
    frame.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }), area);
}
