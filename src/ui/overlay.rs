use crate::config::Theme;
use crate::models::{Mode, RenderSnapshot};
use crate::ui::utils::hex_to_rgb;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const OVERLAY_WIDTH: u16 = 52;

pub fn draw(f: &mut Frame, snap: &RenderSnapshot, theme: &Theme) {
    if snap.hidden {
        let hint = Paragraph::new("F7 show")
            .style(Style::default().fg(hex_to_rgb(&theme.sub)))
            .alignment(Alignment::Right);
        f.render_widget(hint, Rect::new(0, 0, f.area().width, 1));
        return;
    }

    let height = (12 + snap.suggestions.len().max(1) as u16).min(f.area().height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(f.area());
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(OVERLAY_WIDTH.min(f.area().width)),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
    let area = horizontal[1];

    // border color mirrors the original's glow states: panic beats the
    // fallback warning, which beats the ordinary glow
    let border_color = if snap.panicking {
        hex_to_rgb(&theme.panic)
    } else if !snap.strict && !snap.suggestions.is_empty() {
        hex_to_rgb(&theme.error)
    } else if snap.glow_active {
        hex_to_rgb(&theme.main)
    } else {
        hex_to_rgb(&theme.sub)
    };

    let title = match snap.mode {
        Mode::Chain => " ketting | last-letter helper ",
        Mode::Bomb => " ketting | wordbomb helper ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(hex_to_rgb(&theme.main))
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(stats_line(snap, theme));
    lines.push(typed_line(snap, theme));
    lines.push(Line::default());

    if snap.suggestions.is_empty() {
        lines.push(Line::from(Span::styled(
            "no matches",
            Style::default().fg(hex_to_rgb(&theme.sub)),
        )));
    } else {
        for word in &snap.suggestions {
            lines.push(suggestion_line(word, snap, theme));
        }
    }

    lines.push(Line::default());
    lines.push(hint_line(snap, theme));
    lines.push(footer_line(snap, theme));

    f.render_widget(Paragraph::new(lines), inner);
}

fn stats_line(snap: &RenderSnapshot, theme: &Theme) -> Line<'static> {
    let accent = Style::default()
        .fg(hex_to_rgb(&theme.accent))
        .add_modifier(Modifier::BOLD);
    match snap.mode {
        Mode::Chain => Line::from(vec![
            Span::styled(
                format!(
                    "start letters: {}",
                    snap.required_prefix.as_deref().unwrap_or("?")
                ),
                accent,
            ),
            Span::styled(
                format!(
                    "   score {} | longest {}",
                    snap.words_found, snap.longest_word
                ),
                accent,
            ),
        ]),
        Mode::Bomb => Line::from(Span::styled(
            format!(
                "high score {} | words left {}",
                snap.high_score, snap.remaining
            ),
            accent,
        )),
    }
}

fn typed_line(snap: &RenderSnapshot, theme: &Theme) -> Line<'static> {
    let shown = if snap.typed.is_empty() {
        "(empty)".to_string()
    } else {
        snap.typed.clone()
    };
    Line::from(vec![
        Span::styled("typed: ", Style::default().fg(hex_to_rgb(&theme.sub))),
        Span::styled(
            shown,
            Style::default()
                .fg(hex_to_rgb(&theme.text))
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Per-letter coloring, ported from the original overlay: letters covered by
/// the typed buffer in green, substring hits in blue, the required prefix in
/// amber, everything still to type in red. The best word is underlined.
fn suggestion_line(word: &str, snap: &RenderSnapshot, theme: &Theme) -> Line<'static> {
    let typed = snap.typed.as_str();
    let prefix = snap.required_prefix.as_deref().unwrap_or("");
    let is_best = snap.best.as_deref() == Some(word);

    let mut spans: Vec<Span> = Vec::with_capacity(word.len());
    for (i, c) in word.chars().enumerate() {
        let mut style = if i < typed.len() && word.starts_with(typed) {
            Style::default()
                .fg(hex_to_rgb(&theme.main))
                .add_modifier(Modifier::BOLD)
        } else if !typed.is_empty() && word.contains(typed) && typed.contains(c) {
            Style::default()
                .fg(hex_to_rgb(&theme.info))
                .add_modifier(Modifier::BOLD)
        } else if i < prefix.len() && prefix.chars().nth(i) == Some(c) {
            Style::default()
                .fg(hex_to_rgb(&theme.accent))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(hex_to_rgb(&theme.error))
        };
        if is_best {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(c.to_string(), style));
    }
    Line::from(spans)
}

fn hint_line(snap: &RenderSnapshot, theme: &Theme) -> Line<'static> {
    let main = Style::default().fg(hex_to_rgb(&theme.main));
    let accent = Style::default().fg(hex_to_rgb(&theme.accent));
    let error = Style::default().fg(hex_to_rgb(&theme.error));

    let (text, style) = match snap.mode {
        Mode::Chain => {
            let prefix = snap.required_prefix.as_deref();
            if let Some(p) = prefix.filter(|p| !snap.typed.starts_with(*p) && !snap.typed.is_empty())
            {
                (format!("start with '{p}'"), error)
            } else if snap.suggestions.is_empty() && prefix.is_some() {
                ("no words left".to_string(), error)
            } else if snap.suggestions.is_empty() {
                ("type to start".to_string(), accent)
            } else {
                next_letter_hint(snap).map_or(("press enter".to_string(), main), |c| {
                    (format!("next: {c}"), main)
                })
            }
        }
        Mode::Bomb => {
            if snap.typed.is_empty() {
                ("type to start".to_string(), accent)
            } else if snap.suggestions.is_empty() {
                ("no matches".to_string(), error)
            } else if snap.panicking {
                ("panicking".to_string(), error)
            } else {
                next_letter_hint(snap).map_or(("press enter".to_string(), main), |c| {
                    (format!("next: {c} (tab completes)"), main)
                })
            }
        }
    };
    Line::from(Span::styled(text, style))
}

fn next_letter_hint(snap: &RenderSnapshot) -> Option<char> {
    let best = snap.best.as_deref()?;
    best.chars().nth(snap.typed.chars().count())
}

fn footer_line(snap: &RenderSnapshot, theme: &Theme) -> Line<'static> {
    let keys = match snap.mode {
        Mode::Chain => "F7 hide | F6 new round | F8 quit | enter submit".to_string(),
        Mode::Bomb => {
            let panic_key = snap.panic_key.unwrap_or('=');
            format!("tab complete | {panic_key} panic | F7 hide | F8 quit")
        }
    };
    let mut spans = vec![Span::styled(
        keys,
        Style::default().fg(hex_to_rgb(&theme.sub)),
    )];
    // the round is dead once a prefix is set and nothing matches it anymore;
    // say so in the footer instead of leaving an empty list to interpret
    if snap.mode == Mode::Chain && snap.required_prefix.is_some() && snap.suggestions.is_empty() {
        spans.push(Span::styled(
            " | no valid words left",
            Style::default().fg(hex_to_rgb(&theme.error)),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_snapshot() -> RenderSnapshot {
        RenderSnapshot {
            mode: Mode::Chain,
            typed: String::new(),
            required_prefix: None,
            suggestions: vec!["atlas".to_string()],
            strict: true,
            best: Some("atlas".to_string()),
            words_found: 0,
            longest_word: 0,
            high_score: 0,
            remaining: 1,
            glow_active: true,
            panicking: false,
            hidden: false,
            panic_key: None,
        }
    }

    fn footer_text(snap: &RenderSnapshot) -> String {
        footer_line(snap, &Theme::default())
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn footer_lists_the_control_keys() {
        let text = footer_text(&chain_snapshot());
        assert!(text.contains("F7 hide"));
        assert!(!text.contains("no valid words left"));
    }

    #[test]
    fn footer_warns_when_the_prefix_has_no_words_left() {
        let mut snap = chain_snapshot();
        snap.required_prefix = Some("at".to_string());
        snap.suggestions.clear();
        snap.best = None;

        let text = footer_text(&snap);
        assert!(text.ends_with(" | no valid words left"));

        let line = footer_line(&snap, &Theme::default());
        let theme = Theme::default();
        assert_eq!(
            line.spans.last().map(|s| s.style),
            Some(Style::default().fg(hex_to_rgb(&theme.error)))
        );
    }

    #[test]
    fn footer_stays_quiet_before_the_first_submit() {
        // no prefix yet, an empty list just means nothing typed
        let mut snap = chain_snapshot();
        snap.suggestions.clear();
        assert!(!footer_text(&snap).contains("no valid words left"));
    }

    #[test]
    fn bomb_footer_shows_the_configured_panic_key() {
        let mut snap = chain_snapshot();
        snap.mode = Mode::Bomb;
        snap.panic_key = Some('=');
        snap.suggestions.clear();
        snap.required_prefix = Some("at".to_string());

        let text = footer_text(&snap);
        assert!(text.contains("= panic"));
        // the dead-round warning is a chain-mode concern only
        assert!(!text.contains("no valid words left"));
    }
}
