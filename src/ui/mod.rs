//! User interface rendering module
//!
//! Pure rendering over the wizard controller and UI state; nothing in
//! here mutates application state.
//!
//! - `screens` - per-screen body rendering and overlays

mod screens;

use crate::app::UiState;
use crate::stage;
use crate::wizard::{Screen, WizardController};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Render one frame.
pub fn render(frame: &mut Frame, wizard: &WizardController, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], wizard);

    match wizard.screen() {
        Screen::Stage(index) => screens::render_stage(frame, chunks[1], wizard, ui, *index),
        Screen::Listing => screens::render_listing(frame, chunks[1], wizard, ui),
        Screen::Cart => screens::render_cart(frame, chunks[1], wizard, ui),
        Screen::Submitted => screens::render_submitted(frame, chunks[1], wizard),
    }

    render_status(frame, chunks[2], ui);

    if let Some(overlay) = &ui.overlay {
        screens::render_overlay(frame, overlay);
    }
}

/// Title bar with the stage progress indicator.
fn render_header(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let answered = wizard.ledger().len();
    let mut spans = vec![
        Span::styled(
            "Strainer Selector",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    for i in 0..stage::choice_stage_count() {
        let (dot, style) = if i < answered {
            ("●", Style::default().fg(Color::Magenta))
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(dot, style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Bottom status line.
fn render_status(frame: &mut Frame, area: Rect, ui: &UiState) {
    let status = Paragraph::new(ui.status_message.as_str())
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

/// Centered popup rectangle, sized in percent of the parent area.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
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
