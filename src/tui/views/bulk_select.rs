//! Popup for the "select the first N rows" input.

use crate::api::PageSource;
use crate::catalog::CatalogController;
use crate::tui::{styles::Theme, utils::centered_rect, Frame};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn render<S: PageSource>(frame: &mut Frame, area: Rect, controller: &CatalogController<S>, theme: &Theme) {
    let popup = centered_rect(44, 6, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.focused_border_style())
        .title(" Select rows ");

    let hint = Line::from(Span::styled(
        "Enter to select · Esc to cancel",
        theme.dim_style(),
    ));

    let lines = vec![
        Line::from(vec![
            Span::styled("Number of rows: ", theme.text_style()),
            Span::styled(controller.bulk_input().to_string(), theme.input_style()),
            Span::styled("_", theme.input_style()),
        ]),
        Line::from(Span::styled(
            format!("Starts at page {} and moves forward", controller.current_page()),
            theme.dim_style(),
        )),
        hint,
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block).style(theme.base_style()), popup);
}
