//! Per-screen body rendering and modal overlays.

use crate::app::{Overlay, UiState};
use crate::input::{ContactField, ContactForm};
use crate::stage;
use crate::ui::centered_rect;
use crate::wizard::{ListingStatus, WizardController};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

fn hint_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

fn split_body(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// A choice stage: option list plus key hints.
pub fn render_stage(
    frame: &mut Frame,
    area: Rect,
    wizard: &WizardController,
    ui: &UiState,
    stage_index: usize,
) {
    let Some(def) = stage::stage(stage_index) else {
        return;
    };
    let (list_area, hints) = split_body(area);

    let items: Vec<ListItem> = def
        .options
        .iter()
        .map(|option| {
            let mut lines = vec![Line::from(option.name)];
            if let Some(description) = option.description {
                lines.push(Line::from(Span::styled(
                    format!("  {description}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let current = wizard
        .ledger()
        .get(stage_index)
        .map(|sel| format!(" (current: {})", sel.display_label))
        .unwrap_or_default();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{}{current}", def.title)),
        )
        .highlight_style(highlight())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(ui.cursor));
    frame.render_stateful_widget(list, list_area, &mut state);

    frame.render_widget(
        hint_line("Enter select · c custom value · Esc back · v cart · q quit"),
        hints,
    );
}

/// The computed product listing.
pub fn render_listing(frame: &mut Frame, area: Rect, wizard: &WizardController, ui: &UiState) {
    let (list_area, hints) = split_body(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Available Products");

    match wizard.listing() {
        ListingStatus::Idle | ListingStatus::Loading { .. } => {
            frame.render_widget(
                Paragraph::new("Searching the catalog...").block(block),
                list_area,
            );
        }
        ListingStatus::Failed(message) => {
            frame.render_widget(
                Paragraph::new(format!("Error fetching products: {message}"))
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true })
                    .block(block),
                list_area,
            );
            frame.render_widget(hint_line("r reset · Esc back · q quit"), hints);
            return;
        }
        ListingStatus::Ready(products) if products.is_empty() => {
            let text = if wizard.offers_special_order() {
                "No catalog product matches your custom configuration.\n\nPress s to add it to the cart as a special order."
            } else {
                "No products match your selections.\n\nGo back and adjust your answers."
            };
            frame.render_widget(
                Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
                list_area,
            );
            frame.render_widget(
                hint_line("s special order · Esc back · r reset · v cart · q quit"),
                hints,
            );
            return;
        }
        ListingStatus::Ready(products) => {
            let items: Vec<ListItem> = products
                .iter()
                .map(|product| {
                    let specs = product
                        .specs
                        .iter()
                        .map(|(k, v)| format!("{k}: {v}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            format!("{} ({})", product.name, product.id),
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(
                            format!("  {}", product.description),
                            Style::default().fg(Color::DarkGray),
                        )),
                        Line::from(Span::styled(
                            format!("  {specs}"),
                            Style::default().fg(Color::DarkGray),
                        )),
                    ])
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(highlight())
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(ui.cursor));
            frame.render_stateful_widget(list, list_area, &mut state);
        }
    }

    frame.render_widget(
        hint_line("Enter add to cart · Esc back · r reset · v cart · q quit"),
        hints,
    );
}

/// The cart: line items and the specifications of the highlighted one.
pub fn render_cart(frame: &mut Frame, area: Rect, wizard: &WizardController, ui: &UiState) {
    let (body, hints) = split_body(area);

    if wizard.cart().is_empty() {
        frame.render_widget(
            Paragraph::new("Your cart is empty.\n\nYou haven't added any strainers yet.")
                .block(Block::default().borders(Borders::ALL).title("Your Cart")),
            body,
        );
        frame.render_widget(hint_line("Esc back to selection · q quit"), hints);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body);

    let items: Vec<ListItem> = wizard
        .cart()
        .items()
        .iter()
        .map(|item| {
            let tag = if item.is_special_order() {
                "  [Special Order]"
            } else {
                ""
            };
            ListItem::new(format!(
                "{} × {}{}",
                item.quantity,
                item.product.name(),
                tag
            ))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Your Cart"))
        .highlight_style(highlight())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(ui.cursor));
    frame.render_stateful_widget(list, columns[0], &mut state);

    let details: Vec<Line> = wizard
        .cart()
        .items()
        .get(ui.cursor)
        .map(|item| {
            item.selections
                .iter()
                .map(|sel| {
                    Line::from(vec![
                        Span::styled(
                            format!("{}: ", sel.stage_title),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(sel.display_label.clone()),
                        if sel.value.is_custom() {
                            Span::styled(" [custom]", Style::default().fg(Color::Magenta))
                        } else {
                            Span::raw("")
                        },
                    ])
                })
                .collect()
        })
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(details).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Specifications"),
        ),
        columns[1],
    );

    frame.render_widget(
        hint_line("Enter request quotation · e quantity · d remove · n new item · Esc back · q quit"),
        hints,
    );
}

/// Submission acknowledgment.
pub fn render_submitted(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Quotation Request Submitted!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(confirmation) = wizard.confirmation() {
        lines.push(Line::from(format!("Order ID: {}", confirmation.order_id)));
        lines.push(Line::from(format!(
            "You will receive a response within {}.",
            confirmation.estimated_response
        )));
        if confirmation.email_sent {
            lines.push(Line::from("A confirmation has been recorded."));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Press Enter to start a new selection, q to quit."));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Thank You")),
        area,
    );
}

/// Modal overlays: custom value / quantity entry and the contact form.
pub fn render_overlay(frame: &mut Frame, overlay: &Overlay) {
    match overlay {
        Overlay::CustomValue { entry, .. } => render_text_entry(frame, &entry.label, &entry.value),
        Overlay::Quantity { entry, .. } => render_text_entry(frame, &entry.label, &entry.value),
        Overlay::ContactForm(form) => render_contact_form(frame, form),
    }
}

fn render_text_entry(frame: &mut Frame, label: &str, value: &str) {
    let popup = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, popup);
    let text = Paragraph::new(format!("{value}_"))
        .block(Block::default().borders(Borders::ALL).title(label.to_owned()));
    frame.render_widget(text, popup);
}

fn render_contact_form(frame: &mut Frame, form: &ContactForm) {
    let popup = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, popup);

    let field = |f: ContactField, value: &str| -> Line {
        let marker = if form.focused() == f { "> " } else { "  " };
        let style = if form.focused() == f {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(Span::styled(
            format!("{marker}{}: {value}", f.label()),
            style,
        ))
    };

    let mut lines = vec![
        field(ContactField::Name, &form.name),
        field(ContactField::Company, &form.company),
        field(ContactField::Email, &form.email),
        field(ContactField::Phone, &form.phone),
        field(
            ContactField::NeedsDelivery,
            if form.needs_delivery { "Yes" } else { "No" },
        ),
    ];
    if form.needs_delivery {
        lines.push(field(ContactField::DeliveryAddress, &form.delivery_address));
    }
    lines.push(Line::from(""));
    lines.push(field(ContactField::Submit, ""));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/↓ next · ↑ previous · Enter confirm · Esc back to cart",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Customer Information"),
        ),
        popup,
    );
}
