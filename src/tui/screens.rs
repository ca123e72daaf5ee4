//! Screen rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use super::{App, LoginField, Screen};
use crate::session::Session;
use crate::theme::Palette;
use crate::workouts;

pub fn render(app: &App, frame: &mut Frame) {
    let palette = app.theme().palette();
    let background = Block::default().style(Style::default().bg(palette.bg));
    frame.render_widget(background, frame.area());

    match app.screen() {
        Screen::Auth => render_auth(app, frame, &palette),
        Screen::Home => render_home(app, frame, &palette),
        Screen::WorkoutDetail => render_detail(app, frame, &palette),
        Screen::History => render_history(app, frame, &palette),
    }
}

fn render_auth(app: &App, frame: &mut Frame, palette: &Palette) {
    let form = app.login_form();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // email
            Constraint::Length(3), // password
            Constraint::Length(1), // validation error
            Constraint::Min(0),
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], "Workout Tracker - Login", palette);

    input_box(
        frame,
        chunks[1],
        "Email",
        &form.email,
        form.focus == LoginField::Email,
        palette,
    );

    let password_display = if form.show_password {
        form.password.clone()
    } else {
        "*".repeat(form.password.chars().count())
    };
    input_box(
        frame,
        chunks[2],
        "Password",
        &password_display,
        form.focus == LoginField::Password,
        palette,
    );

    if let Some(message) = form.error {
        let error = Paragraph::new(message).style(palette.timer_style());
        frame.render_widget(error, chunks[3]);
    }

    render_footer(
        frame,
        chunks[5],
        "Tab: switch field | Enter: login | Ctrl+R: show/hide password | Esc: quit",
        palette,
    );
}

fn input_box(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    palette: &Palette,
) {
    let border_style = if focused {
        palette.accent_style().add_modifier(Modifier::BOLD)
    } else {
        palette.muted_style()
    };
    let input = Paragraph::new(value.to_string())
        .style(palette.text_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(label.to_string())
                .border_style(border_style),
        );
    frame.render_widget(input, area);
}

fn render_home(app: &App, frame: &mut Frame, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // greeting
            Constraint::Min(5),    // workout list
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], "Workout Tracker", palette);

    let greeting = Paragraph::new("Hi there! Ready for your next workout?")
        .style(palette.accent_style());
    frame.render_widget(greeting, chunks[1]);

    let items: Vec<ListItem> = workouts::all()
        .iter()
        .map(|w| {
            ListItem::new(vec![
                Line::from(Span::styled(w.name, palette.title_style())),
                Line::from(Span::styled(w.exercise_line(), palette.muted_style())),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Workouts")
                .border_style(palette.muted_style()),
        )
        .highlight_style(palette.selected_style())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_workout()));
    frame.render_stateful_widget(list, chunks[2], &mut state);

    render_footer(
        frame,
        chunks[3],
        "j/k: select | Enter: open | t: theme | h: history | l: logout | q: quit",
        palette,
    );
}

fn render_detail(app: &App, frame: &mut Frame, palette: &Palette) {
    let Some(session) = app.session() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(7),    // countdown
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], session.workout().name, palette);

    let exercise = session.current_exercise();
    let body = vec![
        Line::from(""),
        Line::from(Span::styled(exercise, palette.title_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!("You will do \"{exercise}\" for the next 10 seconds."),
            palette.accent_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Time left: {}s", session.timer_secs),
            palette.timer_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(controls_line(session), palette.text_style())),
    ];
    let countdown = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(countdown, chunks[1]);

    render_footer(
        frame,
        chunks[2],
        "s: start/resume | p: pause | n: next | t: theme | Esc: back | q: quit",
        palette,
    );
}

/// Only the currently legal controls are offered, mirroring the state
/// machine's availability rules.
fn controls_line(session: &Session) -> String {
    let mut controls = Vec::new();
    if session.shows_start() {
        controls.push(format!("[s] {}", session.start_label()));
    }
    if session.running {
        controls.push("[p] Pause".to_string());
    }
    if session.can_advance() {
        controls.push("[n] Next Exercise".to_string());
    }
    controls.join("   ")
}

fn render_history(app: &App, frame: &mut Frame, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // entries
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], "Workout History", palette);

    if app.history().is_empty() {
        let empty = Paragraph::new("No workouts completed yet.")
            .style(palette.muted_style())
            .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
    } else {
        let rows: Vec<Row> = app
            .history()
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.name.clone()).style(palette.text_style()),
                    Cell::from(entry.date.clone()).style(palette.muted_style()),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Min(24), Constraint::Length(18)])
            .header(Row::new(vec!["Workout", "Completed"]).style(palette.title_style()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.muted_style()),
            );
        frame.render_widget(table, chunks[1]);
    }

    render_footer(frame, chunks[2], "Esc: back | t: theme | q: quit", palette);
}

fn render_header(frame: &mut Frame, area: Rect, title: &str, palette: &Palette) {
    let header = Paragraph::new(title.to_string())
        .style(palette.title_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.muted_style()),
        );
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect, hints: &str, palette: &Palette) {
    let footer = Paragraph::new(hints.to_string())
        .style(palette.muted_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.muted_style()),
        );
    frame.render_widget(footer, area);
}
