//! One-line pager: previous/next arrows around the visible page window.

use crate::api::PageSource;
use crate::catalog::{CatalogController, PageMarker};
use crate::tui::styles::Theme;
use ratatui::text::{Line, Span};

/// Build the pager line for the controller's current position
pub fn pager_line<S: PageSource>(controller: &CatalogController<S>, theme: &Theme) -> Line<'static> {
    let current = controller.current_page();
    let mut spans = Vec::new();

    let arrow_style = |enabled: bool| {
        if enabled {
            theme.focused_border_style()
        } else {
            theme.dim_style()
        }
    };

    spans.push(Span::styled("‹ Prev ", arrow_style(controller.has_previous_page())));

    for marker in controller.visible_page_window() {
        let span = match marker {
            PageMarker::Page(page) if page == current => {
                Span::styled(format!(" {} ", page), theme.current_page_style())
            }
            PageMarker::Page(page) => Span::styled(format!(" {} ", page), theme.text_style()),
            PageMarker::Ellipsis => Span::styled(" … ".to_string(), theme.dim_style()),
        };
        spans.push(span);
    }

    spans.push(Span::styled(" Next ›", arrow_style(controller.has_next_page())));
    Line::from(spans)
}
