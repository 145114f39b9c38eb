use crate::api::Category;
use crate::syntax::{classify, lines, NO_CHANGES};
use crate::ui::app::{
    AppState, DiffPanel, Focus, HistoryStatus, NotificationKind, SaveStatus, SidebarItem, View,
};
use crate::ui::format::{format_bytes, format_relative_date};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

const TAB: &str = "    ";

pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, state, theme, main_chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(main_chunks[1]);

    render_sidebar(frame, state, theme, body_chunks[0]);
    match state.view {
        View::Welcome => render_welcome(frame, state, theme, body_chunks[1]),
        View::Config => render_config(frame, state, theme, body_chunks[1]),
        View::Packages(category) => render_packages(frame, state, theme, category, body_chunks[1]),
    }

    render_footer(frame, state, theme, main_chunks[2]);

    if state.history_open {
        render_history(frame, state, theme, centered_rect(86, 80, frame.area()));
    }
    if let Some(notification) = &state.notification {
        let color = match notification.kind {
            NotificationKind::Success => theme.success,
            NotificationKind::Error => theme.error,
        };
        render_toast(frame, &notification.message, color, theme, main_chunks[1]);
    }
    if let Some(prompt) = state.pending_confirmation {
        render_confirmation(frame, prompt.message(), theme);
    }
}

fn border(theme: &Theme, focused: bool) -> Style {
    Style::default().fg(if focused { theme.accent } else { theme.fg_dim })
}

fn render_header(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "  dotdash",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Dotfiles Dashboard", Style::default().fg(theme.fg_dim)),
    ];
    if let Some(config) = state.current_config.as_ref().filter(|_| state.view == View::Config) {
        let mode = if state.edit_mode { "EDIT" } else { "VIEW" };
        spans.push(Span::styled("  │  ", Style::default().fg(theme.fg_dim)));
        spans.push(Span::styled(
            config.display_name().to_string(),
            Style::default().fg(theme.fg),
        ));
        spans.push(Span::styled(
            format!(" [{mode}]"),
            Style::default().fg(if state.edit_mode { theme.warning } else { theme.success }),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    );
    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let focused = state.nav.focus == Focus::Sidebar && !state.history_open;
    let current_id = state
        .current_config
        .as_ref()
        .filter(|_| state.view == View::Config)
        .map(|c| c.id());

    let items: Vec<ListItem> = state
        .sidebar_items()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let (label, shown) = match item {
                SidebarItem::Config(index) => {
                    let config = &state.configs[index];
                    (
                        format!("  {}", config.display_name),
                        current_id == Some(config.id.as_str()),
                    )
                }
                SidebarItem::Category(category) => (
                    format!("  {} ({})", category.title(), state.package_count(category)),
                    state.view == View::Packages(category),
                ),
            };
            let label = if shown { label.replacen("  ", "● ", 1) } else { label };
            let mut style = Style::default().fg(if shown { theme.accent } else { theme.fg });
            if i == state.nav.sidebar_index {
                style = style.bg(theme.surface).add_modifier(Modifier::BOLD);
            }
            ListItem::new(label).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Configs & Packages ")
            .border_style(border(theme, focused)),
    );
    frame.render_widget(list, area);
}

fn render_welcome(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let label = Style::default().fg(theme.fg_dim);
    let value = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let mut text = vec![
        Line::from(Span::styled(
            "Welcome",
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:>6}", state.configs.len()), value),
            Span::styled("  Config Files", label),
        ]),
    ];
    for category in Category::ALL {
        text.push(Line::from(vec![
            Span::styled(format!("{:>6}", state.package_count(category)), value),
            Span::styled(format!("  {}", category.title()), label),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Select a config or package list from the sidebar.",
        label,
    )));

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Overview ")
            .border_style(border(theme, false)),
    );
    frame.render_widget(paragraph, area);
}

fn render_config(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let Some(config) = state.current_config.as_ref() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let summary = &config.summary;
    let dim = Style::default().fg(theme.fg_dim);
    let info = vec![
        Line::from(vec![
            Span::styled(format!("dotfiles/{}", summary.source_path), Style::default().fg(theme.fg)),
            Span::styled(
                format!("  {} · {} · {}", summary.software, summary.format, format_bytes(config.size)),
                dim,
            ),
        ]),
        Line::from(vec![
            Span::styled(summary.docs.clone(), Style::default().fg(theme.accent)),
            Span::styled("  ", dim),
            Span::styled(summary.repo.clone(), Style::default().fg(theme.accent)),
        ]),
    ];
    let info = Paragraph::new(info).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", summary.display_name))
            .border_style(border(theme, false)),
    );
    frame.render_widget(info, chunks[0]);

    let focused = state.nav.focus == Focus::Content && !state.history_open;
    let title = if state.edit_mode { " Editor " } else { " Viewer " };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border(theme, focused));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let text = state.visible_content();
    let total = crate::syntax::line_count(text);
    let gutter_width = total.to_string().len() + 1;
    let height = usize::from(inner.height);

    let (offset, cursor) = if state.edit_mode {
        let (line, col) = state.buffer.cursor_position();
        (line.saturating_sub(height.saturating_sub(1)), Some((line, col)))
    } else {
        (state.nav.code_scroll, None)
    };

    let source_lines: Vec<Vec<Span>> = if state.edit_mode {
        text.split('\n')
            .map(|line| vec![Span::styled(line.replace('\t', TAB), Style::default().fg(theme.fg))])
            .collect()
    } else {
        lines(text, config.format())
            .iter()
            .map(|segments| {
                segments
                    .iter()
                    .map(|seg| {
                        let color = seg.token.map_or(theme.fg, |t| theme.token_color(t));
                        Span::styled(seg.text.replace('\t', TAB), Style::default().fg(color))
                    })
                    .collect()
            })
            .collect()
    };

    let rendered: Vec<Line> = source_lines
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, spans)| {
            let mut line = vec![Span::styled(
                format!("{:>width$} ", i + 1, width = gutter_width),
                Style::default().fg(theme.fg_dim),
            )];
            line.extend(spans);
            Line::from(line)
        })
        .collect();
    frame.render_widget(Paragraph::new(rendered), inner);

    if let Some((line, col)) = cursor.filter(|_| focused) {
        let prefix: String = text
            .split('\n')
            .nth(line)
            .unwrap_or_default()
            .chars()
            .take(col)
            .collect();
        let col = prefix.replace('\t', TAB).chars().count();
        let x = inner.x as usize + gutter_width + 1 + col;
        let y = inner.y as usize + line - offset;
        if x < usize::from(inner.x + inner.width) && y < usize::from(inner.y + inner.height) {
            frame.set_cursor_position((x as u16, y as u16));
        }
    }
}

fn render_packages(frame: &mut Frame, state: &AppState, theme: &Theme, category: Category, area: Rect) {
    let searching = state.nav.focus == Focus::Search;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let search = Paragraph::new(Line::from(vec![
        Span::styled("/ ", Style::default().fg(theme.accent)),
        Span::styled(state.package_query.clone(), Style::default().fg(theme.fg)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(border(theme, searching)),
    );
    frame.render_widget(search, chunks[0]);

    let items: Vec<ListItem> = state
        .filtered_packages(category)
        .into_iter()
        .map(|p| ListItem::new(p.name.clone()).style(Style::default().fg(theme.fg)))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}) ", category.title(), state.package_count(category)))
            .border_style(border(theme, state.nav.focus == Focus::Content)),
    );
    frame.render_widget(list, chunks[1]);
}

fn render_history(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    frame.render_widget(Clear, area);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(area);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(" History ")
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.bg));

    let placeholder = match state.history_status {
        HistoryStatus::Idle => Some(""),
        HistoryStatus::Loading => Some("Loading..."),
        HistoryStatus::Failed => Some("Failed to load history"),
        HistoryStatus::Loaded if state.history_data.is_empty() => Some("No commit history found"),
        HistoryStatus::Loaded => None,
    };
    if let Some(message) = placeholder {
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(theme.fg_dim)))
            .block(list_block);
        frame.render_widget(paragraph, chunks[0]);
    } else {
        let today = chrono::Local::now().date_naive();
        let items: Vec<ListItem> = state
            .history_data
            .iter()
            .enumerate()
            .map(|(i, commit)| {
                let selected = state.selected_commit.as_deref() == Some(commit.full_hash.as_str());
                let mut style = Style::default();
                if i == state.nav.history_index {
                    style = style.bg(theme.surface);
                }
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("{} ", commit.hash),
                            Style::default().fg(if selected { theme.accent } else { theme.warning }),
                        ),
                        Span::styled(commit.message.clone(), Style::default().fg(theme.fg)),
                    ]),
                    Line::from(Span::styled(
                        format!("  {} by {}", format_relative_date(&commit.date, today), commit.author),
                        Style::default().fg(theme.fg_dim),
                    )),
                ])
                .style(style)
            })
            .collect();
        frame.render_widget(List::new(items).block(list_block), chunks[0]);
    }

    let title = state
        .selected_commit_info()
        .map(|c| format!(" {} - {} ", c.hash, c.message))
        .unwrap_or_else(|| " Diff ".to_string());
    let diff_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.bg));

    let dim = Style::default().fg(theme.fg_dim);
    let text: Vec<Line> = match &state.diff {
        DiffPanel::Hidden => vec![Line::from(Span::styled("Select a commit to see its diff", dim))],
        DiffPanel::Loading { .. } => vec![Line::from(Span::styled("Loading...", dim))],
        DiffPanel::Failed { .. } => vec![Line::from(Span::styled(
            "Failed to load diff",
            Style::default().fg(theme.error),
        ))],
        DiffPanel::Loaded { diff, .. } => match diff.as_deref().filter(|d| !d.is_empty()) {
            None => vec![Line::from(Span::styled(NO_CHANGES, dim))],
            Some(diff) => classify(diff)
                .into_iter()
                .map(|(kind, line)| {
                    let style = theme
                        .diff_color(kind)
                        .map_or(Style::default().fg(theme.fg), |c| Style::default().fg(c));
                    Line::from(Span::styled(line.replace('\t', TAB), style))
                })
                .collect(),
        },
    };
    frame.render_widget(Paragraph::new(text).block(diff_block), chunks[1]);
}

fn render_footer(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let help_text = if state.history_open {
        "[↑↓/jk] Commits  [Enter] Show Diff  [Esc/q] Close"
    } else if state.nav.focus == Focus::Search {
        "Type to filter  [Enter] Done  [Esc] Cancel"
    } else if state.edit_mode && state.nav.focus == Focus::Content {
        "[Ctrl+S] Save  [Ctrl+D] Discard  [Tab] Sidebar  [Esc] View Mode"
    } else {
        "[↑↓/jk] Navigate  [Enter] Open  [e/v] Edit/View  [h] History  [d] Download  [r] Reload  [q] Quit"
    };

    let mut spans = vec![Span::styled(help_text, Style::default().fg(theme.fg_dim))];
    if state.edit_mode {
        let color = match state.save_status {
            SaveStatus::Saved => theme.success,
            SaveStatus::Failed => theme.error,
            _ => theme.warning,
        };
        let label = state.save_status.label();
        if !label.is_empty() {
            spans.push(Span::styled(format!("  {label}"), Style::default().fg(color)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast(frame: &mut Frame, message: &str, color: ratatui::style::Color, theme: &Theme, area: Rect) {
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(4),
        width,
        height: 3.min(area.height),
    };
    frame.render_widget(Clear, rect);
    let toast = Paragraph::new(Span::styled(message, Style::default().fg(color))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.bg)),
    );
    frame.render_widget(toast, rect);
}

fn render_confirmation(frame: &mut Frame, message: &str, theme: &Theme) {
    let screen = frame.area();
    let width = (screen.width * 3 / 5).max(44).min(screen.width);
    let height = 6.min(screen.height);
    let area = Rect {
        x: screen.x + (screen.width - width) / 2,
        y: screen.y + (screen.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, area);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.fg))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(theme.success)),
            Span::styled("Yes   ", Style::default().fg(theme.fg)),
            Span::styled("[n] ", Style::default().fg(theme.error)),
            Span::styled("No", Style::default().fg(theme.fg)),
        ]),
    ];
    let modal = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .border_style(Style::default().fg(theme.warning))
                .style(Style::default().bg(theme.surface)),
        );
    frame.render_widget(modal, area);
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Commit, Config, ConfigSummary};
    use crate::ui::app::Prompt;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn screen_text(buffer: &Buffer) -> String {
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).expect("terminal");
        terminal
            .draw(|f| render(f, state, Theme::default_theme()))
            .expect("draw");
        screen_text(terminal.backend().buffer())
    }

    fn config() -> Config {
        Config {
            summary: ConfigSummary {
                id: "tmux".to_string(),
                display_name: ".tmux.conf".to_string(),
                software: "tmux".to_string(),
                category: String::new(),
                format: "conf".to_string(),
                source_path: ".tmux.conf".to_string(),
                docs: String::new(),
                repo: String::new(),
            },
            content: "set -g mouse on\n# status\nbind r source-file".to_string(),
            size: 42,
            modified: None,
        }
    }

    #[test]
    fn test_welcome_shows_counts() {
        let mut state = AppState::new();
        state.set_configs(vec![config().summary]);
        let screen = draw(&state);
        assert!(screen.contains("Config Files"));
        assert!(screen.contains("Formulae (0)"));
        assert!(screen.contains(".tmux.conf"));
    }

    #[test]
    fn test_config_view_shows_path_and_gutter() {
        let mut state = AppState::new();
        state.set_configs(vec![config().summary]);
        state.show_config(config());
        let screen = draw(&state);
        assert!(screen.contains("dotfiles/.tmux.conf"));
        assert!(screen.contains("1 set -g mouse on"));
        assert!(screen.contains("3 bind r source-file"));
        assert!(screen.contains("[VIEW]"));
    }

    #[test]
    fn test_history_overlay_and_modal() {
        let mut state = AppState::new();
        state.show_config(config());
        let ticket = state.begin_history().expect("ticket");
        state.finish_history::<()>(
            &ticket,
            Ok(vec![Commit {
                hash: "abc1234".to_string(),
                full_hash: "abc1234def".to_string(),
                message: "enable mouse".to_string(),
                author: "dev".to_string(),
                date: "2020-01-05 10:30:00 +0000".to_string(),
            }]),
        );
        let diff = state.begin_diff("abc1234def").expect("diff");
        state.finish_diff::<()>(&diff, Ok(Some("+set -g mouse on".to_string())));
        state.pending_confirmation = Some(Prompt::DiscardChanges);

        let screen = draw(&state);
        assert!(screen.contains("abc1234 - enable mouse"));
        assert!(screen.contains("+set -g mouse on"));
        assert!(screen.contains("Jan 5, 2020 by dev"));
        assert!(screen.contains("Discard all changes?"));
    }

    #[test]
    fn test_edit_mode_footer_shows_unsaved() {
        let mut state = AppState::new();
        state.show_config(config());
        state.enter_edit_mode();
        state.nav.focus = Focus::Content;
        state.set_buffer("changed");
        let screen = draw(&state);
        assert!(screen.contains("[EDIT]"));
        assert!(screen.contains("Unsaved changes"));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.x, 25);
    }
}
