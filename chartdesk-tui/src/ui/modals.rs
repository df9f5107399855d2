//! Modal forms — order ticket and modify popup.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{ModifyForm, TicketForm};
use crate::theme::Theme;
use crate::ui::centered_rect;

pub fn render_ticket(f: &mut Frame, area: Rect, form: &TicketForm, theme: &Theme) {
    let popup = centered_rect(40, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Order Ticket ")
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  action: ", Style::default().fg(theme.muted)),
            Span::styled(
                format!("◀ {} ▶", form.action),
                Style::default()
                    .fg(theme.side_color(form.action.side()))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    let values = [
        &form.lot_input,
        &form.entry_input,
        &form.tp_input,
        &form.sl_input,
    ];
    for (i, label) in TicketForm::FIELDS.iter().enumerate() {
        lines.push(field_line(label, values[i], i == form.field, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Enter]place  [Tab]field  [←/→]action  [Esc]cancel",
        Style::default().fg(theme.muted),
    )));

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_modify(f: &mut Frame, area: Rect, form: &ModifyForm, theme: &Theme) {
    let popup = centered_rect(40, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.warning))
        .title(format!(" Modify Order {} ", form.order_id))
        .title_style(Style::default().fg(theme.warning).add_modifier(Modifier::BOLD));

    let mut lines = vec![Line::from("")];
    let values = [
        &form.entry_input,
        &form.tp_input,
        &form.sl_input,
        &form.lot_input,
    ];
    for (i, label) in ModifyForm::FIELDS.iter().enumerate() {
        lines.push(field_line(label, values[i], i == form.field, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Enter]apply  [Tab]field  [Esc]cancel",
        Style::default().fg(theme.muted),
    )));

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn field_line<'a>(label: &'a str, value: &'a str, active: bool, theme: &Theme) -> Line<'a> {
    let label_style = if active {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    };
    let value_style = if active {
        Style::default().fg(theme.text_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_secondary)
    };
    let cursor = if active { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("  {label:>12}: "), label_style),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])
}
