use chrono::{Local, NaiveDate};
use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, Screen};
use crate::state::app_state::HOME_ENTRIES;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use mlb_api::{ContentType, Game, Highlight, Team};

const HELP_TEXT: &str = "\
Browse MLB game recaps, condensed games and highlights.

  j / Down         move down
  k / Up           move up
  Enter / l        open the selected entry
  Esc / h / Bksp   go back
  f                toggle full screen
  \"                toggle the log pane
  ?                this help (Esc to close)
  q / Ctrl-C       quit

Games without a recap article are dimmed.
Enter on a highlight shows its video URL in the status line.";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        if app.state.screen == Screen::Help {
            draw_help(f, layout.list.union(layout.detail));
        } else {
            draw_list(f, layout.list, app);
            draw_detail(f, layout.detail, app);
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_status(f, layout.status, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

/// Breadcrumb of the screens leading to the current one.
fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let trail = app.state.trail();
    let titles: Vec<Line> = trail.iter().map(|s| Line::from(s.label())).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .divider(">")
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(trail.len().saturating_sub(1))
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let (title, items, selected): (String, Option<Vec<ListItem>>, usize) = match state.screen {
        Screen::Home => (
            " MLB Highlights ".to_string(),
            Some(HOME_ENTRIES.iter().map(|e| ListItem::new(*e)).collect()),
            state.home.selected,
        ),
        Screen::Gamedays => (
            " Games by Date ".to_string(),
            state
                .gamedays
                .days
                .as_ref()
                .map(|days| days.iter().map(|d| ListItem::new(gameday_label(*d))).collect()),
            state.gamedays.cursor.selected,
        ),
        Screen::Teams => (
            " Games by Team ".to_string(),
            state
                .teams
                .teams
                .as_ref()
                .map(|teams| teams.iter().map(|t| ListItem::new(t.label())).collect()),
            state.teams.cursor.selected,
        ),
        Screen::Games => (
            format!(
                " {} ",
                state.games.source.as_ref().map(|s| s.title()).unwrap_or_default()
            ),
            state.games.games.as_ref().map(|games| games.iter().map(game_row).collect()),
            state.games.cursor.selected,
        ),
        Screen::Highlights => (
            format!(
                " {} ",
                state
                    .highlights
                    .game
                    .as_ref()
                    .map(|g| g.short_title.as_str())
                    .unwrap_or("Highlights")
            ),
            state
                .highlights
                .game
                .as_ref()
                .map(|g| g.highlights.iter().map(highlight_row).collect()),
            state.highlights.cursor.selected,
        ),
        Screen::Help => return,
    };

    let block = default_border(Color::White).title(title);

    let Some(items) = items else {
        let msg = match state.last_error.as_deref() {
            Some(err) => format!("Load failed:\n{err}"),
            None => "Loading...".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg)
                .block(block)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    };

    if items.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing here")
                .block(block)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn gameday_label(date: NaiveDate) -> String {
    date.format("%a %b %e, %Y").to_string()
}

fn game_row(game: &Game) -> ListItem<'_> {
    let score = game.score.map(|(away, home)| format!("  {away}-{home}")).unwrap_or_default();
    let style = if game.has_recap() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    ListItem::new(format!("{}{score}", game.title_with_time)).style(style)
}

fn content_color(content_type: ContentType) -> Color {
    match content_type {
        ContentType::Recap => Color::Yellow,
        ContentType::CondensedGame => Color::Cyan,
        ContentType::Highlight => Color::White,
    }
}

fn highlight_row(highlight: &Highlight) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("[{}]", highlight.content_type.badge()),
            Style::default().fg(content_color(highlight.content_type)),
        ),
        Span::raw(format!(" {:>7}  ", highlight.duration_label())),
        Span::raw(highlight.title.as_str()),
    ]))
}

fn draw_detail(f: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let lines = match state.screen {
        Screen::Home => home_detail(state.home.selected),
        Screen::Gamedays => state
            .gamedays
            .selected()
            .map(|d| {
                vec![
                    bold(d.format("%A, %B %-d, %Y").to_string()),
                    Line::from(""),
                    Line::from("Enter lists the games played that day."),
                ]
            })
            .unwrap_or_default(),
        Screen::Teams => state.teams.selected().map(team_detail).unwrap_or_default(),
        Screen::Games => state.games.selected().map(game_detail).unwrap_or_default(),
        Screen::Highlights => state
            .highlights
            .selected()
            .map(highlight_detail)
            .unwrap_or_default(),
        Screen::Help => return,
    };

    f.render_widget(
        Paragraph::new(lines)
            .block(default_border(Color::DarkGray).title(" Detail "))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn bold(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().add_modifier(Modifier::BOLD)))
}

fn labeled(label: &'static str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

fn home_detail(selected: usize) -> Vec<Line<'static>> {
    if selected == 0 {
        vec![
            bold("Games by Date"),
            Line::from(""),
            Line::from("Every gameday of the current season so far, newest first."),
        ]
    } else {
        vec![
            bold("Games by Team"),
            Line::from(""),
            Line::from("Pick a team to list its games over the last month."),
        ]
    }
}

fn team_detail(team: &Team) -> Vec<Line<'static>> {
    vec![
        bold(team.name.clone()),
        Line::from(""),
        labeled("Abbreviation: ", team.abbreviation.clone()),
        labeled("Team id:      ", team.id.to_string()),
        labeled("Logo:         ", team.logo_url()),
    ]
}

fn game_detail(game: &Game) -> Vec<Line<'static>> {
    let mut lines = vec![bold(game.title.clone()), Line::from("")];

    if let Some(start) = game.start_time {
        let local = start.with_timezone(&Local);
        lines.push(labeled("Start: ", local.format("%a %b %-d, %H:%M").to_string()));
    }
    if let Some((away, home)) = game.score {
        lines.push(labeled("Score: ", format!("{} {away}-{home}", game.short_title)));
    }
    lines.push(labeled("Game:  ", game.id.clone()));
    lines.push(Line::from(""));

    match (&game.short_description, &game.description) {
        (None, None) => lines.push(Line::from(Span::styled(
            "No recap article.",
            Style::default().fg(Color::DarkGray),
        ))),
        (headline, blurb) => {
            if let Some(headline) = headline {
                lines.push(bold(headline.clone()));
            }
            if let Some(blurb) = blurb {
                lines.push(Line::from(blurb.clone()));
            }
        }
    }

    if let Some(thumb) = &game.thumb_url {
        lines.push(Line::from(""));
        lines.push(labeled("Image: ", thumb.clone()));
    }
    lines
}

fn highlight_detail(highlight: &Highlight) -> Vec<Line<'static>> {
    let mut lines = vec![
        bold(highlight.title.clone()),
        Line::from(""),
        Line::from(Span::styled(
            highlight.content_type.label(),
            Style::default().fg(content_color(highlight.content_type)),
        )),
        labeled("Duration: ", highlight.duration_label()),
        Line::from(""),
    ];
    if !highlight.description.is_empty() {
        lines.push(Line::from(highlight.description.clone()));
        lines.push(Line::from(""));
    }
    match &highlight.url {
        Some(url) => lines.push(labeled("Video: ", url.clone())),
        None => lines.push(labeled("Video: ", "no playable stream")),
    }
    if let Some(thumb) = &highlight.thumb_url {
        lines.push(labeled("Image: ", thumb.clone()));
    }
    lines
}

fn draw_help(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(HELP_TEXT)
            .block(default_border(Color::White).title(" Help "))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Green))
        .style_trace(Style::default().fg(Color::Magenta));
    f.render_widget(widget, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(err) = app.state.last_error.as_deref() {
        (format!("Error: {err}"), Style::default().fg(Color::Red))
    } else if let Some(status) = app.state.status.as_deref() {
        (status.to_string(), Style::default().fg(Color::White))
    } else {
        (
            "j/k=move  Enter=open  Esc=back  \"=logs  ?=help  q=quit".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
