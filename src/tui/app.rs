use crate::api::PageSource;
use crate::catalog::CatalogController;
use crate::tui::keys::{Action, KeyMap};
use crate::tui::views::{self, ArtworkTable};
use crate::tui::{events::Event, styles::Theme, utils, Frame};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Main application state and controller
pub struct App<S: PageSource + 'static> {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Catalog state: page pointer, selection, flags
    pub controller: CatalogController<S>,

    /// Row cursor over the current page
    pub table: ArtworkTable,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Show the help overlay
    pub show_help: bool,

    /// Sender for events handled on a later loop iteration
    event_sender: mpsc::UnboundedSender<Event>,
}

impl<S: PageSource + 'static> App<S> {
    /// Create a new application instance
    pub fn new(controller: CatalogController<S>, event_sender: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            should_quit: false,
            controller,
            table: ArtworkTable::new(),
            key_map: KeyMap::default(),
            theme: Theme::default(),
            status_message: None,
            show_help: false,
            event_sender,
        }
    }

    /// Fetch the current page in the background. The result comes back as
    /// [`Event::PageLoaded`]; results for pages the user already left are dropped.
    pub fn request_load(&mut self) {
        let page = self.controller.begin_load();
        let source = self.controller.source();
        let sender = self.event_sender.clone();
        debug!("Requesting page {}", page);

        tokio::spawn(async move {
            let result = source.fetch_page(page).await;
            let _ = sender.send(Event::PageLoaded { page, result });
        });
    }

    /// Handle incoming events. Returns true when the application should exit.
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event).await?,

            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),

            Event::Resize(_, _) | Event::Tick => {}

            Event::PageLoaded { page, result } => {
                if self.controller.finish_load(page, result) {
                    if self.controller.is_loading() {
                        // Moved back to the last page
                        self.request_load();
                    } else {
                        self.table.reset(self.controller.records().len());
                    }
                }
            }

            Event::BulkSelect => {
                if let Some(outcome) = self.controller.submit_bulk_select().await {
                    info!("Bulk selection finished: {}", outcome.summary());
                    self.status_message = Some(outcome.summary());
                } else {
                    self.status_message = None;
                }
            }
        }

        Ok(self.should_quit)
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.controller.is_dropdown_open() {
            return self.handle_dropdown_key(key).await;
        }

        let Some(action) = self.key_map.action_for(&key) else {
            return Ok(());
        };

        if self.show_help && action != Action::Quit {
            self.show_help = false;
            return Ok(());
        }

        let len = self.controller.records().len();
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::CursorUp => self.table.move_up(len),
            Action::CursorDown => self.table.move_down(len),
            Action::ToggleRow => {
                if let Some(id) = self.table.current_id(&self.controller) {
                    self.controller.toggle(id);
                }
            }
            Action::ToggleAll => {
                self.controller.toggle_all_current_page();
            }
            Action::ClearAll => {
                if self.controller.clear_all() {
                    self.status_message = Some("Selection cleared".to_string());
                }
            }
            Action::BulkSelect => self.controller.open_dropdown(),
            Action::PreviousPage => self.navigate(|c| c.previous_page()),
            Action::NextPage => self.navigate(|c| c.next_page()),
            Action::FirstPage => self.navigate(|c| c.first_page()),
            Action::LastPage => self.navigate(|c| c.last_page()),
            Action::Reload => self.request_load(),
        }
        Ok(())
    }

    async fn handle_dropdown_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => self.controller.push_bulk_digit(c),
            KeyCode::Backspace => self.controller.pop_bulk_digit(),
            KeyCode::Esc => self.controller.close_dropdown(),
            KeyCode::Enter => {
                // Close first so the next frame shows the status line, not the popup
                self.controller.close_dropdown();
                self.status_message = Some(format!("Selecting {} rows…", self.controller.bulk_input()));
                self.event_sender.send(Event::BulkSelect)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        let len = self.controller.records().len();
        match event.kind {
            MouseEventKind::ScrollUp => self.table.move_up(len),
            MouseEventKind::ScrollDown => self.table.move_down(len),
            _ => {}
        }
    }

    fn navigate<F>(&mut self, step: F)
    where
        F: FnOnce(&mut CatalogController<S>) -> bool,
    {
        if step(&mut self.controller) {
            self.status_message = None;
            self.request_load();
        }
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Pager
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.table.render(frame, chunks[1], &self.controller, &self.theme);
        frame.render_widget(
            Paragraph::new(views::pager_line(&self.controller, &self.theme)),
            chunks[2],
        );
        self.render_status_bar(frame, chunks[3]);

        if self.controller.is_dropdown_open() {
            views::bulk_select::render(frame, area, &self.controller, &self.theme);
        }

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let total = match self.controller.total_pages() {
            0 => "?".to_string(),
            n => n.to_string(),
        };
        let line = Line::from(vec![
            Span::styled(" artgrid ", self.theme.current_page_style()),
            Span::styled(
                format!("  Page {} of {}", self.controller.current_page(), total),
                self.theme.text_style(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = if let Some(ref message) = self.status_message {
            message.clone()
        } else {
            "space select · a page · n first N · c clear · ←/→ pages · ? help · q quit".to_string()
        };

        let status_paragraph = Paragraph::new(utils::truncate_to_width(&status_text, area.width as usize))
            .style(self.theme.status_bar_style());

        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_text = self.key_map.help_text();
        let height = help_text.lines().count() as u16 + 2;
        let help_area = utils::centered_rect(48, height, frame.size());

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(help_text)
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::catalog::testing::{page_of, MemorySource};
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert(1, page_of(1..=4, 3));
        source.insert(2, page_of(5..=8, 3));
        source.insert(3, page_of(9..=9, 3));
        source
    }

    fn app_with(source: MemorySource) -> (App<MemorySource>, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = CatalogController::new(Arc::new(source));
        (App::new(controller, tx), rx)
    }

    /// Feed the next queued internal event back into the app
    async fn pump(app: &mut App<MemorySource>, rx: &mut mpsc::UnboundedReceiver<Event>) {
        let event = rx.recv().await.unwrap();
        app.handle_event(event).await.unwrap();
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(app: &mut App<MemorySource>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[tokio::test]
    async fn test_initial_load_populates_table() {
        let (mut app, mut rx) = app_with(source());
        app.request_load();
        assert!(app.controller.is_loading());
        pump(&mut app, &mut rx).await;

        assert_eq!(app.controller.records().len(), 4);
        assert_eq!(app.table.cursor(), Some(0));
        let screen = draw(&mut app);
        assert!(screen.contains("Artwork 1"));
        assert!(screen.contains("Page 1 of 3"));
    }

    #[tokio::test]
    async fn test_keyboard_selection_flow() {
        let (mut app, mut rx) = app_with(source());
        app.request_load();
        pump(&mut app, &mut rx).await;

        app.handle_event(key(KeyCode::Down)).await.unwrap();
        app.handle_event(key(KeyCode::Char(' '))).await.unwrap();
        assert!(app.controller.is_selected(2));

        app.handle_event(key(KeyCode::Char('a'))).await.unwrap();
        assert!(app.controller.all_current_page_selected());

        app.handle_event(key(KeyCode::Right)).await.unwrap();
        pump(&mut app, &mut rx).await;
        assert_eq!(app.controller.current_page(), 2);
        assert_eq!(app.controller.total_selected_count(), 4);

        app.handle_event(key(KeyCode::Char('c'))).await.unwrap();
        assert_eq!(app.controller.total_selected_count(), 0);
        assert_eq!(app.status_message.as_deref(), Some("Selection cleared"));
    }

    #[tokio::test]
    async fn test_bulk_select_through_dropdown() {
        let (mut app, mut rx) = app_with(source());
        app.request_load();
        pump(&mut app, &mut rx).await;

        app.handle_event(key(KeyCode::Char('n'))).await.unwrap();
        assert!(app.controller.is_dropdown_open());
        assert!(draw(&mut app).contains("Select rows"));

        app.handle_event(key(KeyCode::Char('6'))).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        assert!(draw(&mut app).contains("Selecting 6 rows"));
        pump(&mut app, &mut rx).await;

        assert!(!app.controller.is_dropdown_open());
        assert_eq!(app.controller.selected_ids(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(app.status_message.as_deref(), Some("Selected 6 rows"));
    }

    #[tokio::test]
    async fn test_bulk_select_failure_is_not_a_load_error() {
        let mut source = source();
        source.fail_on(2, ApiError::Transport("connection reset".to_string()));
        let (mut app, mut rx) = app_with(source);
        app.request_load();
        pump(&mut app, &mut rx).await;

        app.handle_event(key(KeyCode::Char('n'))).await.unwrap();
        app.handle_event(key(KeyCode::Char('9'))).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        pump(&mut app, &mut rx).await;

        assert_eq!(app.controller.total_selected_count(), 4);
        assert!(app.controller.load_error_message().is_none());
        let screen = draw(&mut app);
        assert!(screen.contains("Artwork 4"));
        assert!(screen.contains("stopped at page 2"));
    }

    #[tokio::test]
    async fn test_failed_load_renders_error_without_rows() {
        let mut source = MemorySource::new();
        source.fail_on(1, ApiError::Status { status: 500 });
        let (mut app, mut rx) = app_with(source);
        app.request_load();
        pump(&mut app, &mut rx).await;

        let screen = draw(&mut app);
        assert!(screen.contains("Failed to load artworks: HTTP error! status: 500"));
        assert!(!screen.contains("[ ]"));
    }

    #[tokio::test]
    async fn test_stale_page_load_is_ignored() {
        let (mut app, mut rx) = app_with(source());
        app.request_load();
        pump(&mut app, &mut rx).await;

        app.handle_event(key(KeyCode::Right)).await.unwrap();
        app.handle_event(key(KeyCode::Right)).await.unwrap();
        pump(&mut app, &mut rx).await;
        pump(&mut app, &mut rx).await;

        assert_eq!(app.controller.current_page(), 3);
        assert_eq!(app.controller.records()[0].id, 9);
    }

    #[tokio::test]
    async fn test_start_page_past_the_end_shows_last_page() {
        let mut source = source();
        source.insert(50, page_of(1..=0, 3));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = CatalogController::starting_at(Arc::new(source), 50);
        let mut app = App::new(controller, tx);

        app.request_load();
        pump(&mut app, &mut rx).await;
        assert!(app.controller.is_loading());
        pump(&mut app, &mut rx).await;

        assert_eq!(app.controller.current_page(), 3);
        assert_eq!(app.table.cursor(), Some(0));
        assert!(draw(&mut app).contains("Page 3 of 3"));
    }

    #[tokio::test]
    async fn test_bulk_select_while_next_page_loads_starts_on_that_page() {
        let (mut app, mut rx) = app_with(source());
        app.request_load();
        pump(&mut app, &mut rx).await;

        app.handle_event(key(KeyCode::Right)).await.unwrap();
        app.handle_event(key(KeyCode::Char('n'))).await.unwrap();
        app.handle_event(key(KeyCode::Char('2'))).await.unwrap();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();

        // Page 2 is still in flight; handle the queued bulk selection first
        let mut pending = Vec::new();
        loop {
            match rx.recv().await.unwrap() {
                Event::BulkSelect => {
                    app.handle_event(Event::BulkSelect).await.unwrap();
                    break;
                }
                other => pending.push(other),
            }
        }

        assert_eq!(app.controller.selected_ids(), vec![5, 6]);
        for event in pending {
            app.handle_event(event).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_quit_and_help_keys() {
        let (mut app, _rx) = app_with(source());
        app.handle_event(key(KeyCode::Char('?'))).await.unwrap();
        assert!(app.show_help);
        assert!(draw(&mut app).contains("Help"));

        app.handle_event(key(KeyCode::Char('j'))).await.unwrap();
        assert!(!app.show_help);

        let quit = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.handle_event(quit).await.unwrap());
    }
}
