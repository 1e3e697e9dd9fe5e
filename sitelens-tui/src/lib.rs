mod app;
mod ui;

pub use app::{Action, App, InputMode, Screen};
pub use ui::{centered_rect, draw};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sitelens_client::{ApiError, CrawlApi, CrawlClient, ListResponse};
use sitelens_core::{ListTicket, Store};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Result of a list request that ran off the event loop.
#[derive(Debug)]
pub struct ListMessage {
    pub generation: u64,
    pub result: Result<ListResponse, ApiError>,
}

/// Create a channel pair for background list fetches
pub fn create_list_channel() -> (
    mpsc::UnboundedSender<ListMessage>,
    mpsc::UnboundedReceiver<ListMessage>,
) {
    mpsc::unbounded_channel()
}

/// Run the list request for `ticket` on its own task and report back on `tx`.
pub fn spawn_list<A>(api: A, ticket: ListTicket, tx: mpsc::UnboundedSender<ListMessage>)
where
    A: CrawlApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = api.list(&ticket.query).await;
        // Receiver is gone once the UI has exited
        let _ = tx.send(ListMessage {
            generation: ticket.generation,
            result,
        });
    });
}

/// Apply every list response that has arrived, without blocking.
pub fn process_messages<A: CrawlApi>(
    app: &mut App<A>,
    rx: &mut mpsc::UnboundedReceiver<ListMessage>,
) {
    while let Ok(msg) = rx.try_recv() {
        if app.store.apply_list(msg.generation, msg.result) {
            app.clamp_cursor();
        }
    }
}

pub async fn run(client: CrawlClient, page_size: u32) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Store::with_page_size(client, page_size));
    info!("Starting TUI against {}", app.store.api().config().base_url());

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<CrawlClient>,
) -> Result<()> {
    let (tx, mut rx) = create_list_channel();

    let ticket = app.store.begin_list();
    spawn_list(app.store.api().clone(), ticket, tx.clone());

    loop {
        process_messages(app, &mut rx);
        app.store.notifications_mut().expire(Instant::now());

        terminal.draw(|f| draw(f, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = app.handle_key(key);
            if action == Action::None || action == Action::Quit {
                continue;
            }
            debug!("Dispatching {:?}", action);

            if let Action::Page(page) = action {
                let ticket = app.store.request_page(page);
                spawn_list(app.store.api().clone(), ticket, tx.clone());
                continue;
            }

            app.busy = Some(busy_label(action));
            terminal.draw(|f| draw(f, app))?;
            dispatch(app, action).await;
            app.busy = None;
            app.clamp_cursor();
        }
    }

    Ok(())
}

fn busy_label(action: Action) -> &'static str {
    match action {
        Action::Delete => "Deleting...",
        Action::Reanalyze => "Submitting for re-analysis...",
        Action::SubmitUrl => "Analyzing...",
        _ => "Loading...",
    }
}

/// Run an action that needs the backend, awaiting it in place.
pub async fn dispatch<A: CrawlApi>(app: &mut App<A>, action: Action) {
    let store = &mut app.store;
    match action {
        Action::ToggleSort(column) => store.toggle_sort(column).await,
        Action::SubmitSearch => store.submit_search().await,
        Action::ClearSearch => store.clear_search().await,
        Action::Delete => store.delete_selected().await,
        Action::Reanalyze => store.reanalyze_selected().await,
        Action::SubmitUrl => {
            if store.submit().await {
                store.fetch_list().await;
            }
        }
        Action::Page(page) => store.set_page(page).await,
        Action::None | Action::Quit => {}
    }
}
