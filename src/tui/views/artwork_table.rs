//! Tabular view of the current page with a row cursor and selection column.

use crate::api::{ArtworkId, PageSource, COLUMN_TITLES};
use crate::catalog::CatalogController;
use crate::tui::{styles::Theme, Frame};
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

const CHECKED: &str = "[x]";
const PARTIAL: &str = "[-]";
const UNCHECKED: &str = "[ ]";

/// Table of artwork rows plus the cursor position
#[derive(Debug, Default)]
pub struct ArtworkTable {
    state: TableState,
}

impl ArtworkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row index under the cursor
    pub fn cursor(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Put the cursor on the first row, or nowhere for an empty page
    pub fn reset(&mut self, len: usize) {
        self.state = TableState::default();
        if len > 0 {
            self.state.select(Some(0));
        }
    }

    pub fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let index = self.state.selected().unwrap_or(0).saturating_sub(1);
        self.state.select(Some(index));
    }

    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let index = self
            .state
            .selected()
            .map_or(0, |i| (i + 1).min(len - 1));
        self.state.select(Some(index));
    }

    /// Id of the record under the cursor
    pub fn current_id<S: PageSource>(&self, controller: &CatalogController<S>) -> Option<ArtworkId> {
        self.cursor()
            .and_then(|index| controller.records().get(index))
            .map(|record| record.id)
    }

    pub fn render<S: PageSource>(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        controller: &CatalogController<S>,
        theme: &Theme,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(format!(
                " Artworks · {} selected on this page · {} selected in total ",
                controller.current_page_selected_count(),
                controller.total_selected_count()
            ));

        if let Some(message) = controller.load_error_message() {
            let paragraph = Paragraph::new(message)
                .block(block)
                .style(theme.error_style())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        if controller.is_loading() {
            let paragraph = Paragraph::new(Line::from("Loading artworks…"))
                .block(block)
                .style(theme.busy_style())
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let records = controller.records();
        if records.is_empty() {
            let paragraph = Paragraph::new("No artworks on this page")
                .block(block)
                .style(theme.dim_style())
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let header_mark = if controller.all_current_page_selected() {
            CHECKED
        } else if controller.current_page_selected_count() > 0 {
            PARTIAL
        } else {
            UNCHECKED
        };
        let header = Row::new(
            std::iter::once(Cell::from(header_mark))
                .chain(COLUMN_TITLES.iter().map(|title| Cell::from(*title))),
        )
        .style(theme.header_style());

        let rows = records.iter().map(|record| {
            let selected = controller.is_selected(record.id);
            let mark = if selected { CHECKED } else { UNCHECKED };
            let row = Row::new(
                std::iter::once(Cell::from(mark))
                    .chain(record.columns().into_iter().map(Cell::from)),
            );
            if selected {
                row.style(theme.selection_style())
            } else {
                row.style(theme.text_style())
            }
        });

        let widths = [
            Constraint::Length(3),
            Constraint::Percentage(26),
            Constraint::Percentage(12),
            Constraint::Percentage(26),
            Constraint::Percentage(18),
            Constraint::Length(10),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .highlight_style(theme.cursor_style())
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}
