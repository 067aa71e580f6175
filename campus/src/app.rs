/// Things that can happen to this app
mod action;
pub use action::Action;

/// The form for adding an event
mod event_form;

/// States shown on top of the main views
mod popover;
use popover::Popover;

use campus_core::{AdminView, Campus, Confirm, Error, Intent, Outcome, PublicView, Storage};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{
        Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    },
    Frame,
};
use std::process::ExitCode;
use tui_input::{backend::crossterm::EventHandler, Input};

/// The "functional core" of the app.
pub struct App<S> {
    /// The events and the views over them
    campus: Campus<S>,

    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Which view j/k/d act on
    focus: Focus,

    /// Selection in the public list
    list_state: ListState,

    /// Selection in the admin table
    table_state: TableState,

    /// The search box, while it has focus
    search: Option<Input>,

    /// Whatever is drawn over the main views
    popover: Option<Popover>,

    /// Set when we're done
    exit: Option<ExitCode>,
}

/// Which view has the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    /// The read-only event cards
    Public,

    /// The admin management table
    Admin,
}

impl<S: Storage> App<S> {
    /// Create a new instance of the app
    pub fn new(campus: Campus<S>) -> Self {
        Self {
            campus,
            status_line: None,
            focus: Focus::Public,
            list_state: ListState::default().with_selected(Some(0)),
            table_state: TableState::new().with_selected(0),
            search: None,
            popover: None,
            exit: None,
        }
    }

    /// Render the app's UI to the screen
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let [search_area, body_area, status_area] = vertical.areas(frame.area());

        // SEARCH
        {
            let (text, style) = match &self.search {
                Some(input) => (input.value(), Style::new().fg(Color::Yellow)),
                None => (self.campus.query(), Style::new().fg(Color::DarkGray)),
            };

            let width = search_area.width.saturating_sub(2 + 1); // -2 for the border, -1 for the cursor
            let scroll = self
                .search
                .as_ref()
                .map_or(0, |input| input.visual_scroll(width as usize));

            let search = Paragraph::new(text).scroll((0, scroll as u16)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Search (/)")
                    .border_style(style),
            );
            frame.render_widget(search, search_area);

            if let Some(input) = &self.search {
                if self.popover.is_none() {
                    frame.set_cursor_position((
                        search_area.x
                            + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                            + 1, // just past the end of the text
                        search_area.y + 1, // +1 row for the border/title
                    ));
                }
            }
        }

        // BODY
        match self.campus.admin_view() {
            Some(admin) => {
                let horizontal =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]);
                let [public_area, admin_area] = horizontal.areas(body_area);

                Self::render_public(
                    self.campus.public_view(),
                    &mut self.list_state,
                    self.focus == Focus::Public,
                    frame,
                    public_area,
                );
                Self::render_admin(
                    admin,
                    &mut self.table_state,
                    self.focus == Focus::Admin,
                    frame,
                    admin_area,
                );
            }
            None => Self::render_public(
                self.campus.public_view(),
                &mut self.list_state,
                true,
                frame,
                body_area,
            ),
        }

        if let Some(popover) = &self.popover {
            popover.render(frame, body_area);
        }

        // STATUS
        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => "Press ? for help",
        });

        frame.render_widget(status, status_area);
    }

    /// Render the public event cards (or the placeholder)
    fn render_public(
        view: &PublicView,
        list_state: &mut ListState,
        focused: bool,
        frame: &mut Frame,
        area: Rect,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Upcoming events")
            .border_style(border_style(focused));

        match view {
            PublicView::Empty(message) => {
                frame.render_widget(
                    Paragraph::new(*message).fg(Color::DarkGray).block(block),
                    area,
                );
            }
            PublicView::Cards(_) => {
                let items: Vec<ListItem> = view
                    .visible_cards()
                    .map(|card| {
                        ListItem::new(Text::from(vec![
                            Line::from(card.title.clone()).bold(),
                            Line::from(vec!["When: ".bold(), card.when.clone().into()]),
                            Line::from(vec!["Where: ".bold(), card.location.clone().into()]),
                            Line::from(vec!["By: ".bold(), card.organizer.clone().into()]),
                            Line::default(),
                        ]))
                    })
                    .collect();

                let list = List::new(items)
                    .block(block)
                    .highlight_symbol("● ")
                    .highlight_style(Style::new().add_modifier(Modifier::BOLD));

                frame.render_stateful_widget(list, area, list_state);
            }
        }
    }

    /// Render the admin management table (or the placeholder)
    fn render_admin(
        view: &AdminView,
        table_state: &mut TableState,
        focused: bool,
        frame: &mut Frame,
        area: Rect,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Manage events (a: add, d: delete, o: log out)")
            .border_style(border_style(focused));

        match view {
            AdminView::Empty(message) => {
                frame.render_widget(
                    Paragraph::new(*message).fg(Color::DarkGray).block(block),
                    area,
                );
            }
            AdminView::Table(rows) => {
                let rows: Vec<Row> = rows
                    .iter()
                    .map(|row| {
                        Row::new(vec![
                            Cell::new(row.title.clone()),
                            Cell::new(row.date.clone()),
                            Cell::new(format!("Delete #{}", row.index)).fg(Color::Red),
                        ])
                    })
                    .collect();

                let table = Table::new(
                    rows,
                    [
                        Constraint::Fill(1),
                        Constraint::Min(12),
                        Constraint::Min(10),
                    ],
                )
                .header(
                    Row::new(["Title", "Date", "Actions"])
                        .bg(Color::DarkGray)
                        .fg(Color::White),
                )
                .block(block)
                .column_spacing(2)
                .highlight_symbol("● ")
                .row_highlight_style(Style::new().add_modifier(Modifier::BOLD))
                .flex(Flex::Legacy);

                frame.render_stateful_widget(table, area, table_state);
            }
        }
    }

    /// Handle an `Action`, updating the app's state
    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return;
                }

                if let Some(popover) = self.popover.take() {
                    self.popover = self.handle_popover_key(popover, key);
                } else if let Some(search) = self.search.take() {
                    self.search = self.handle_search_key(search, key);
                } else {
                    self.handle_key(key);
                }
            }
            Action::Problem(problem) => {
                tracing::error!(%problem, "problem reading input");
                self.status_line = Some(problem);
            }
        }
    }

    /// Handle a key while nothing else has focus
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.exit = Some(ExitCode::SUCCESS);
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.popover = Some(Popover::Help);
            }
            KeyCode::Char('/') => {
                self.search = Some(Input::new(self.campus.query().to_owned()));
            }
            KeyCode::Char('l') => {
                if self.is_admin() {
                    self.status_line = Some("Already logged in".to_owned());
                } else {
                    self.popover = Some(Popover::login());
                }
            }
            KeyCode::Char('o') => {
                if self.is_admin() {
                    self.dispatch(Intent::Logout, refuse);
                } else {
                    self.status_line = Some("Not logged in".to_owned());
                }
            }
            KeyCode::Char('a') => {
                if self.is_admin() {
                    self.popover = Some(Popover::AddEvent(event_form::EventForm::default()));
                } else {
                    self.status_line = Some("Log in (l) to add events".to_owned());
                }
            }
            KeyCode::Tab => {
                if self.is_admin() {
                    self.focus = match self.focus {
                        Focus::Public => Focus::Admin,
                        Focus::Admin => Focus::Public,
                    };
                }
            }
            KeyCode::Char('j') | KeyCode::Down => match self.focus {
                Focus::Public => self.list_state.select_next(),
                Focus::Admin => self.table_state.select_next(),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.focus {
                Focus::Public => self.list_state.select_previous(),
                Focus::Admin => self.table_state.select_previous(),
            },
            KeyCode::Char('d') => {
                // Only offer to delete while logged in; the handler checks
                // again when the answer comes back.
                if self.focus != Focus::Admin || !self.is_admin() {
                    return;
                }

                let selected = self.table_state.selected().and_then(|idx| {
                    self.campus
                        .admin_view()
                        .and_then(|admin| admin.rows().get(idx))
                });

                if let Some(row) = selected {
                    self.popover = Some(Popover::ConfirmDelete {
                        index: row.index,
                        title: row.title.clone(),
                    });
                }
            }
            _ => {
                self.status_line = Some(format!("Unknown key {key:?}"));
            }
        }
    }

    /// Handle a key while the search box has focus. Every edit re-filters.
    fn handle_search_key(&mut self, mut search: Input, key: KeyEvent) -> Option<Input> {
        match key.code {
            KeyCode::Esc => {
                self.dispatch(Intent::Filter(String::new()), refuse);
                None
            }
            KeyCode::Enter => None,
            _ => {
                search.handle_event(&Event::Key(key));
                self.dispatch(Intent::Filter(search.value().to_owned()), refuse);
                self.list_state.select(Some(0));
                Some(search)
            }
        }
    }

    /// Handle a key while a popover is open. Returns the popover to show
    /// next, if any.
    fn handle_popover_key(&mut self, popover: Popover, key: KeyEvent) -> Option<Popover> {
        match popover {
            Popover::Help => match key.code {
                KeyCode::Char('q' | '?') | KeyCode::Esc | KeyCode::F(1) => None,
                _ => Some(Popover::Help),
            },

            Popover::Login { mut code, message } => match key.code {
                KeyCode::Esc => None,
                KeyCode::Enter => match self.campus.dispatch(login(&code), refuse) {
                    Ok(_) => {
                        self.focus = Focus::Admin;
                        self.table_state.select(Some(0));
                        self.status_line = Some("Logged in".to_owned());
                        None
                    }
                    Err(Error::InvalidCode) => Some(Popover::Login {
                        code,
                        message: Some(Error::InvalidCode.to_string()),
                    }),
                    Err(problem) => {
                        self.problem(&problem);
                        None
                    }
                },
                _ => {
                    code.handle_event(&Event::Key(key));
                    Some(Popover::Login { code, message })
                }
            },

            Popover::AddEvent(mut form) => match key.code {
                KeyCode::Esc => None,
                KeyCode::Enter => match self.campus.dispatch(Intent::AddEvent(form.finish()), refuse) {
                    Ok(_) => {
                        self.status_line = Some("Added event".to_owned());
                        None
                    }
                    Err(Error::Validation(invalid)) => Some(Popover::Alert {
                        message: invalid.to_string(),
                        then: Some(Box::new(Popover::AddEvent(form))),
                    }),
                    Err(problem) => {
                        self.problem(&problem);
                        Some(Popover::AddEvent(form))
                    }
                },
                _ => {
                    form.handle_event(key);
                    Some(Popover::AddEvent(form))
                }
            },

            Popover::Alert { message, then } => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => then.map(|next| *next),
                _ => Some(Popover::Alert { message, then }),
            },

            Popover::ConfirmDelete { index, title } => {
                let answer = match key.code {
                    KeyCode::Char('y' | 'Y') => true,
                    KeyCode::Char('n' | 'N') | KeyCode::Esc => false,
                    _ => return Some(Popover::ConfirmDelete { index, title }),
                };

                let before = self.campus.admin_view().map(|admin| admin.rows().len());
                if self.dispatch(Intent::DeleteEvent(index), |_: &str| answer)
                    && self.campus.admin_view().map(|admin| admin.rows().len()) != before
                {
                    self.status_line = Some(format!("Deleted {title}"));
                }

                None
            }
        }
    }

    /// Send an intent through the dispatch table and show whatever comes
    /// back. `confirm` answers the delete prompt, so only pass something
    /// other than `refuse` once the user has actually been asked. Returns
    /// whether the intent was handled without a problem.
    fn dispatch(&mut self, intent: Intent, confirm: impl Confirm) -> bool {
        match self.campus.dispatch(intent, confirm) {
            Ok(Outcome::Updated) => true,
            Ok(Outcome::Acknowledge(message)) => {
                self.focus = Focus::Public;
                self.popover = Some(Popover::alert(message));
                true
            }
            Err(problem) => {
                self.problem(&problem);
                false
            }
        }
    }

    /// Is the admin view showing?
    fn is_admin(&self) -> bool {
        self.campus.admin_view().is_some()
    }

    /// Put a problem on the status line
    fn problem(&mut self, problem: &Error) {
        tracing::error!(?problem, "problem handling intent");
        self.status_line = Some(problem.to_string());
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }
}

/// Build a login intent from the code field
fn login(code: &Input) -> Intent {
    Intent::Login(code.value().to_owned())
}

/// Answer for intents that never ask anything. Deletes are asked about in
/// `ConfirmDelete` and dispatched with the user's answer instead.
fn refuse(_: &str) -> bool {
    false
}

/// Highlight the focused pane
fn border_style(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Yellow)
    } else {
        Style::new().fg(Color::Blue)
    }
}
