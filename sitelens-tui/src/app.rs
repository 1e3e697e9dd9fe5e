use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sitelens_client::{CrawlApi, CrawlItem, SortColumn};
use sitelens_core::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Analytics,
}

impl Screen {
    pub fn as_index(&self) -> usize {
        match self {
            Screen::Home => 0,
            Screen::Analytics => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Url,
}

/// Work the event loop has to perform after a key press.
///
/// Key handling only touches local state; anything that talks to the
/// backend comes back as an action so the loop can decide how to run it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Page(u32),
    ToggleSort(SortColumn),
    SubmitSearch,
    ClearSearch,
    Delete,
    Reanalyze,
    SubmitUrl,
}

pub struct App<A> {
    pub store: Store<A>,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor: usize,
    pub busy: Option<&'static str>,
    pub should_quit: bool,
}

impl<A: CrawlApi> App<A> {
    pub fn new(store: Store<A>) -> Self {
        Self {
            store,
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            cursor: 0,
            busy: None,
            should_quit: false,
        }
    }

    /// Row under the cursor on the loaded page.
    pub fn cursor_item(&self) -> Option<&CrawlItem> {
        self.store.items().get(self.cursor)
    }

    /// Keep the cursor on a loaded row after the page changes.
    pub fn clamp_cursor(&mut self) {
        let len = self.store.items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn switch_screen(&mut self) {
        match self.screen {
            Screen::Home => {
                self.screen = Screen::Analytics;
                self.input_mode = InputMode::Url;
            }
            Screen::Analytics => {
                self.screen = Screen::Home;
                self.input_mode = InputMode::Normal;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Action::Quit;
        }

        if self.store.detail().is_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.store.set_modal_open(false);
            }
            return Action::None;
        }

        match self.input_mode {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Url => self.handle_url_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                Action::SubmitSearch
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Action::None
            }
            KeyCode::Backspace => {
                let mut text = self.store.query().search_text().to_string();
                text.pop();
                self.store.set_search_text(text);
                Action::None
            }
            KeyCode::Char(c) => {
                let text = format!("{}{}", self.store.query().search_text(), c);
                self.store.set_search_text(text);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_url_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => Action::SubmitUrl,
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Action::None
            }
            KeyCode::Tab => {
                self.switch_screen();
                Action::None
            }
            KeyCode::Backspace => {
                self.store.form_mut().pop_char();
                Action::None
            }
            KeyCode::Char(c) => {
                if self.store.form().is_success().is_some() {
                    self.store.reset();
                }
                self.store.form_mut().push_char(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Action::Quit
            }
            KeyCode::Tab => {
                self.switch_screen();
                Action::None
            }
            KeyCode::Esc => {
                self.store.notifications_mut().dismiss_all();
                Action::None
            }
            _ if self.screen == Screen::Analytics => match key.code {
                KeyCode::Enter | KeyCode::Char('i') => {
                    self.input_mode = InputMode::Url;
                    Action::None
                }
                _ => Action::None,
            },
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                Action::None
            }
            KeyCode::Char('c') => Action::ClearSearch,
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                self.cursor += 1;
                self.clamp_cursor();
                Action::None
            }
            KeyCode::Left => match self.store.pagination().prev() {
                Some(page) => Action::Page(page),
                None => Action::None,
            },
            KeyCode::Right => match self.store.pagination().next() {
                Some(page) => Action::Page(page),
                None => Action::None,
            },
            KeyCode::Char(c @ '1'..='9') => {
                let page = c.to_digit(10).unwrap_or_default();
                match self.store.pagination().jump(page) {
                    Some(page) => Action::Page(page),
                    None => Action::None,
                }
            }
            KeyCode::Enter => {
                let id = self.cursor_item().map(|item| item.id);
                self.store.set_current_item(id);
                Action::None
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_item().map(|item| item.id) {
                    let checked = !self.store.selection().contains(id);
                    self.store.toggle_one(id, checked);
                }
                Action::None
            }
            KeyCode::Char('a') => {
                let checked = !self.store.selection().is_all_checked();
                self.store.toggle_all(checked);
                Action::None
            }
            KeyCode::Char('d') if self.store.selection().show_delete_button() => Action::Delete,
            KeyCode::Char('r') if !self.store.selection().is_empty() => Action::Reanalyze,
            KeyCode::Char('s') => Action::ToggleSort(SortColumn::CreatedAt),
            KeyCode::Char('t') => Action::ToggleSort(SortColumn::PageTitle),
            KeyCode::Char('u') => Action::ToggleSort(SortColumn::Url),
            KeyCode::Char('e') => Action::ToggleSort(SortColumn::Error),
            _ => Action::None,
        }
    }
}
