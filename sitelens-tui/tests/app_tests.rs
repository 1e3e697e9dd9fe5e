// Tests for TUI key handling and rendering

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend, layout::Rect};
use sitelens_client::error::Result;
use sitelens_client::{
    CrawlApi, CrawlItem, ListQuery, ListResponse, MessageResponse, SortColumn, SubmitResponse,
};
use sitelens_core::Store;
use sitelens_core::notify::{Level, Notification};
use sitelens_tui::{
    Action, App, InputMode, ListMessage, Screen, centered_rect, create_list_channel, dispatch,
    draw, process_messages,
};
use std::sync::Mutex;

#[derive(Default)]
struct FakeApi {
    items: Vec<CrawlItem>,
    submitted: Mutex<Vec<String>>,
}

impl CrawlApi for FakeApi {
    async fn submit_url(&self, url: &str) -> Result<SubmitResponse> {
        self.submitted.lock().unwrap().push(url.to_string());
        Ok(SubmitResponse {
            id: 100,
            message: "Crawl the url successfully".to_string(),
        })
    }

    async fn list(&self, query: &ListQuery) -> Result<ListResponse> {
        let start = ((query.page - 1) * query.page_size) as usize;
        Ok(ListResponse {
            list: self
                .items
                .iter()
                .skip(start)
                .take(query.page_size as usize)
                .cloned()
                .collect(),
            total_count: self.items.len() as u64,
        })
    }

    async fn delete(&self, _ids: &[i64]) -> Result<MessageResponse> {
        Ok(MessageResponse::default())
    }
}

fn items(count: i64) -> Vec<CrawlItem> {
    (1..=count)
        .map(|id| {
            let mut item = CrawlItem::new(id);
            item.page_title = format!("Title {}", id);
            item.url = Some(format!("https://site{}.example", id));
            item
        })
        .collect()
}

async fn loaded_app(count: i64) -> App<FakeApi> {
    let api = FakeApi {
        items: items(count),
        ..Default::default()
    };
    let mut store = Store::with_page_size(api, 5);
    store.fetch_list().await;
    App::new(store)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn render(app: &App<FakeApi>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn render_lines(app: &App<FakeApi>) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect()
}

// ============================================================================
// Key handling
// ============================================================================

#[tokio::test]
async fn test_quit_keys() {
    let mut app = loaded_app(1).await;
    assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::Quit);
    assert!(app.should_quit);

    let mut app = loaded_app(1).await;
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(app.handle_key(ctrl_c), Action::Quit);
}

#[tokio::test]
async fn test_tab_switches_screen_and_input_mode() {
    let mut app = loaded_app(1).await;

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.screen, Screen::Analytics);
    assert_eq!(app.input_mode, InputMode::Url);

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.screen, Screen::Home);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[tokio::test]
async fn test_space_and_a_update_selection() {
    let mut app = loaded_app(3).await;

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(app.store.selection().ids(), &[2]);

    app.handle_key(key(KeyCode::Char(' ')));
    assert!(app.store.selection().is_empty());

    app.handle_key(key(KeyCode::Char('a')));
    assert!(app.store.selection().is_all_checked());
    app.handle_key(key(KeyCode::Char('a')));
    assert!(app.store.selection().is_empty());
}

#[tokio::test]
async fn test_delete_and_reanalyze_need_selection() {
    let mut app = loaded_app(3).await;
    assert_eq!(app.handle_key(key(KeyCode::Char('d'))), Action::None);
    assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Action::None);

    app.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(app.handle_key(key(KeyCode::Char('d'))), Action::Delete);
    assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Action::Reanalyze);
}

#[tokio::test]
async fn test_sort_keys() {
    let mut app = loaded_app(1).await;
    assert_eq!(
        app.handle_key(key(KeyCode::Char('t'))),
        Action::ToggleSort(SortColumn::PageTitle)
    );
    assert_eq!(
        app.handle_key(key(KeyCode::Char('s'))),
        Action::ToggleSort(SortColumn::CreatedAt)
    );
}

#[tokio::test]
async fn test_arrow_keys_page_within_bounds() {
    let mut app = loaded_app(12).await;
    assert_eq!(app.handle_key(key(KeyCode::Left)), Action::None);
    assert_eq!(app.handle_key(key(KeyCode::Right)), Action::Page(2));

    dispatch(&mut app, Action::Page(3)).await;
    assert_eq!(app.store.items().len(), 2);
    assert_eq!(app.handle_key(key(KeyCode::Right)), Action::None);
    assert_eq!(app.handle_key(key(KeyCode::Left)), Action::Page(2));
}

#[tokio::test]
async fn test_digit_keys_jump_to_existing_pages() {
    let mut app = loaded_app(12).await;
    assert_eq!(app.handle_key(key(KeyCode::Char('3'))), Action::Page(3));
    assert_eq!(app.handle_key(key(KeyCode::Char('1'))), Action::None);
    assert_eq!(app.handle_key(key(KeyCode::Char('4'))), Action::None);

    dispatch(&mut app, Action::Page(3)).await;
    assert_eq!(app.store.query().current_page(), 3);
    assert_eq!(app.handle_key(key(KeyCode::Char('2'))), Action::Page(2));
}

#[tokio::test]
async fn test_search_mode_edits_text() {
    let mut app = loaded_app(1).await;

    app.handle_key(key(KeyCode::Char('/')));
    assert_eq!(app.input_mode, InputMode::Search);
    for c in "blogx".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.store.query().search_text(), "blog");

    assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::SubmitSearch);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[tokio::test]
async fn test_enter_opens_and_q_closes_detail() {
    let mut app = loaded_app(2).await;

    app.handle_key(key(KeyCode::Enter));
    assert!(app.store.detail().is_open());
    assert_eq!(app.store.detail().current_item().unwrap().id, 1);

    // q closes the modal instead of quitting
    assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Action::None);
    assert!(!app.store.detail().is_open());
    assert!(!app.should_quit);
}

#[tokio::test]
async fn test_url_input_submits() {
    let mut app = loaded_app(0).await;
    app.handle_key(key(KeyCode::Tab));

    for c in "https://example.com".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    let action = app.handle_key(key(KeyCode::Enter));
    assert_eq!(action, Action::SubmitUrl);

    dispatch(&mut app, action).await;
    assert_eq!(
        *app.store.api().submitted.lock().unwrap(),
        vec!["https://example.com".to_string()]
    );
    assert_eq!(app.store.form().input(), "");
    assert_eq!(app.store.form().is_success(), Some(true));
}

// ============================================================================
// Background list messages
// ============================================================================

#[tokio::test]
async fn test_process_messages_drops_stale_results() {
    let mut app = loaded_app(3).await;
    let (tx, mut rx) = create_list_channel();

    let stale = app.store.begin_list();
    let fresh = app.store.begin_list();
    tx.send(ListMessage {
        generation: fresh.generation,
        result: Ok(ListResponse {
            list: items(1),
            total_count: 1,
        }),
    })
    .unwrap();
    tx.send(ListMessage {
        generation: stale.generation,
        result: Ok(ListResponse::default()),
    })
    .unwrap();

    process_messages(&mut app, &mut rx);

    assert_eq!(app.store.items().len(), 1);
    assert_eq!(app.store.total_count(), 1);
    assert!(!app.store.pending());
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_render_empty_list() {
    let app = loaded_app(0).await;
    let screen = render(&app);
    assert!(screen.contains("No Items"));
}

#[tokio::test]
async fn test_render_pagination_range() {
    let mut app = loaded_app(12).await;
    assert!(render(&app).contains("Showing 1 to 5 of 12 Entries"));

    dispatch(&mut app, Action::Page(3)).await;
    assert!(render(&app).contains("Showing 11 to 12 of 12 Entries"));
}

#[tokio::test]
async fn test_render_failed_row() {
    let mut app = loaded_app(2).await;
    let mut failed = CrawlItem::new(9);
    failed.error = "timeout".to_string();
    let generation = app.store.begin_list().generation;
    app.store.apply_list(
        generation,
        Ok(ListResponse {
            list: vec![failed],
            total_count: 1,
        }),
    );

    let screen = render(&app);
    assert!(screen.contains("CRAWLING DID NOT WORK."));
    assert!(screen.contains("Failed"));
}

#[tokio::test]
async fn test_render_detail_without_links() {
    let mut app = loaded_app(1).await;
    app.store.set_current_item(Some(1));

    let screen = render(&app);
    assert!(screen.contains("No heading data available."));
    assert!(screen.contains("No link data available."));
}

#[tokio::test]
async fn test_render_toasts_newest_first_in_top_right() {
    let mut app = loaded_app(2).await;
    app.store.notifications_mut().error("failed to fetch URL");
    app.store.notifications_mut().push(
        Notification::new(Level::Success, "Crawl the url successfully")
            .with_item(7)
            .sticky(),
    );

    let lines = render_lines(&app);
    // 120 columns wide, so toasts are 40 wide starting at column 80
    let right: Vec<String> = lines
        .iter()
        .map(|line| line.chars().skip(80).collect())
        .collect();

    let success_row = right
        .iter()
        .position(|line| line.contains("Crawl the url successfully (id 7)"))
        .unwrap();
    let error_row = right
        .iter()
        .position(|line| line.contains("failed to fetch URL"))
        .unwrap();
    assert!(success_row < error_row);
    assert!(right[success_row - 1].contains("success"));
    assert!(right[error_row - 1].contains("error"));

    let left: String = lines
        .iter()
        .map(|line| line.chars().take(80).collect::<String>())
        .collect();
    assert!(!left.contains("failed to fetch URL"));
}

#[tokio::test]
async fn test_cursor_stays_inside_search_box_for_long_text() {
    let mut app = loaded_app(1).await;
    app.input_mode = InputMode::Search;
    app.store.set_search_text("x".repeat(70_000));

    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
    terminal.draw(|f| draw(f, &app)).unwrap();
    let cursor = terminal.get_cursor_position().unwrap();
    assert!(cursor.x < 120);
    assert!(cursor.x > 100);
}

#[test]
fn test_centered_rect() {
    let area = Rect::new(0, 0, 100, 50);
    let popup = centered_rect(80, 80, area);
    assert_eq!(popup.width, 80);
    assert_eq!(popup.height, 40);
    assert_eq!(popup.x, 10);
    assert_eq!(popup.y, 5);
}
