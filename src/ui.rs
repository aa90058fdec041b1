//! Terminal UI rendering.
//!
//! All drawing lives here, separated from application state ([`App`]) and
//! input handling ([`crate::input`]).  The layout is a row of card columns
//! (a sliding window of `max_visible_cards`) over a one-line status bar;
//! the sources overlay draws centered on top of the grid.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use crate::catalog;
use crate::prefs::ListingMode;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    draw_card_grid(app, frame, main_area);
    if app.mode == Mode::Sources {
        draw_sources_overlay(app, frame, main_area);
    }
    draw_status_bar(app, frame, status_area);
}

/// Render the visible window of cards as equal-width columns.
fn draw_card_grid(app: &mut App, frame: &mut Frame, area: Rect) {
    let range = app.visible_range();
    if range.is_empty() {
        let empty = Paragraph::new("No sources selected. Press s to add some.")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let visible: Vec<(usize, String)> = app.store.state().cards[range.clone()]
        .iter()
        .enumerate()
        .map(|(offset, card)| (range.start + offset, card.name.clone()))
        .collect();

    let columns =
        Layout::horizontal(vec![Constraint::Ratio(1, visible.len() as u32); visible.len()])
            .split(area);

    for ((index, name), column) in visible.into_iter().zip(columns.iter()) {
        if app.mode == Mode::Organize {
            draw_organize_card(app, frame, *column, index, &name);
        } else {
            draw_card(app, frame, *column, index, &name);
        }
    }
}

fn card_block(app: &App, index: usize, name: &str) -> Block<'static> {
    let label = catalog::card_label(name, &app.store.state().user_custom_cards);
    let focused = index == app.selected_card;

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// One card in reading mode: its fetched items, or the current error.
fn draw_card(app: &mut App, frame: &mut Frame, area: Rect, index: usize, name: &str) {
    let block = card_block(app, index, name);

    if app.is_dnd_active() {
        let quiet = Paragraph::new(Line::from(Span::styled(
            "· do not disturb ·",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(quiet, area);
        return;
    }

    if let Some(error) = app.card_errors.get(name) {
        let failed = Paragraph::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )))
        .block(block);
        frame.render_widget(failed, area);
        return;
    }

    let compact = app.store.state().listing_mode == ListingMode::Compact;
    let list_items: Vec<ListItem> = app
        .items
        .get(name)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let mut lines = vec![Line::from(Span::styled(
                        item.title.clone(),
                        Style::default().fg(Color::White),
                    ))];
                    if !compact {
                        if let Some(meta) = &item.meta {
                            lines.push(Line::from(Span::styled(
                                format!("  {meta}"),
                                Style::default().fg(Color::DarkGray),
                            )));
                        }
                    }
                    ListItem::new(lines)
                })
                .collect()
        })
        .unwrap_or_default();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    let state = app.list_state_for(name);
    frame.render_stateful_widget(list, area, state);
}

/// One card in organize mode: content hidden, just a grab handle.
fn draw_organize_card(app: &App, frame: &mut Frame, area: Rect, index: usize, name: &str) {
    let block = card_block(app, index, name);
    let handle = if index == app.selected_card {
        Span::styled("≡ ← → ", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("≡", Style::default().fg(Color::DarkGray))
    };
    let body = Paragraph::new(Line::from(handle)).block(block);
    frame.render_widget(body, area);
}

/// The sources overlay: the merged catalog with toggle checkboxes.
fn draw_sources_overlay(app: &App, frame: &mut Frame, area: Rect) {
    let overlay = centered_rect(area, 40, 70);
    frame.render_widget(Clear, overlay);

    let selected = app.store.state().card_names();
    let rows: Vec<ListItem> = app
        .source_options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let mark = if selected.contains(&option.value) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut spans = vec![Span::raw(format!("{mark} {}", option.label))];
            if option.is_custom {
                spans.push(Span::styled("  (custom)", Style::default().fg(Color::DarkGray)));
            }

            let mut line = Line::from(spans);
            if i == app.sources_cursor {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            ListItem::new(line)
        })
        .collect();

    let list = List::new(rows).block(
        Block::default()
            .title(" Sources ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, overlay);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.mode {
        Mode::Normal => "q: quit  ←/→: card  ↑/↓: scroll  Enter: open  o: organize  s: sources  r: refresh",
        Mode::Organize => "←/→: move card  Enter/Esc: done",
        Mode::Sources => "↑/↓: move  Space: toggle  Esc: close",
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
    ];
    if app.is_dnd_active() {
        spans.push(Span::styled("DND", Style::default().fg(Color::Magenta)));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        format!("{} cards", app.card_count()),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::raw(hints));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A rectangle centered in `area` with the given percentage size.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, horizontal, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(vertical);
    horizontal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::PollMsg;
    use crate::prefs::store::Store;
    use crate::prefs::{Action, DndDuration, Preferences};
    use crate::source::FeedItem;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        App::new(Store::new(Preferences::default()))
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn render(app: &mut App) -> Terminal<TestBackend> {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
    }

    #[test]
    fn draw_does_not_panic_with_no_items() {
        let mut app = app();
        render(&mut app);
    }

    #[test]
    fn cards_show_their_catalog_labels() {
        let mut app = app();
        let terminal = render(&mut app);
        let text = buffer_text(&terminal);

        assert!(text.contains("GitHub Trending"));
        assert!(text.contains("Hacker News"));
    }

    #[test]
    fn fetched_items_are_rendered() {
        let mut app = app();
        app.apply_poll(PollMsg::Items {
            card: "github".into(),
            items: vec![FeedItem {
                id: "1".into(),
                title: "octo/widget".into(),
                link: None,
                published: None,
                meta: Some("★ 99".into()),
            }],
        });

        let terminal = render(&mut app);
        assert!(buffer_text(&terminal).contains("octo/widget"));
    }

    #[test]
    fn organize_mode_hides_card_content() {
        let mut app = app();
        app.apply_poll(PollMsg::Items {
            card: "github".into(),
            items: vec![FeedItem {
                id: "1".into(),
                title: "secret-content".into(),
                link: None,
                published: None,
                meta: None,
            }],
        });
        app.enter_organize();

        let terminal = render(&mut app);
        let text = buffer_text(&terminal);
        assert!(!text.contains("secret-content"), "organize mode hides items");
        assert!(text.contains("GitHub Trending"), "titles stay visible");
    }

    #[test]
    fn sources_overlay_lists_the_catalog() {
        let mut app = app();
        app.open_sources();

        let terminal = render(&mut app);
        let text = buffer_text(&terminal);
        assert!(text.contains("Sources"));
        assert!(text.contains("[x] GitHub Trending"));
        assert!(text.contains("[ ] Lobsters"));
    }

    #[test]
    fn dnd_hides_feed_content() {
        let mut app = app();
        app.apply_poll(PollMsg::Items {
            card: "github".into(),
            items: vec![FeedItem {
                id: "1".into(),
                title: "loud-headline".into(),
                link: None,
                published: None,
                meta: None,
            }],
        });
        app.store.dispatch(Action::SetDnd(DndDuration::Always));

        let terminal = render(&mut app);
        let text = buffer_text(&terminal);
        assert!(!text.contains("loud-headline"));
        assert!(text.contains("do not disturb"));
    }

    #[test]
    fn empty_selection_shows_the_hint() {
        let mut app = app();
        app.store.dispatch(Action::Reconcile { selection: Vec::new() });

        let terminal = render(&mut app);
        assert!(buffer_text(&terminal).contains("No sources selected"));
    }

    #[test]
    fn status_bar_shows_card_count_and_status() {
        let mut app = app();
        app.status = "hackernews: 20 items".into();

        let terminal = render(&mut app);
        let text = buffer_text(&terminal);
        assert!(text.contains("hackernews: 20 items"));
        assert!(text.contains("4 cards"));
    }
}
