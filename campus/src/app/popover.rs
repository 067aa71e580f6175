use super::event_form::EventForm;
use campus_core::campus::DELETE_PROMPT;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Row, Table, Wrap},
    Frame,
};
use tui_input::Input;

/// Things shown on top of the main views. While one is open it gets every
/// key press.
#[derive(Debug)]
pub enum Popover {
    /// Show a table of keyboard shortcuts
    Help,

    /// Entering the admin access code
    Login {
        /// The code typed so far (shown masked)
        code: Input,

        /// Feedback from the last attempt, if it failed
        message: Option<String>,
    },

    /// Filling in a new event
    AddEvent(EventForm),

    /// A message the user has to dismiss. If `then` is set, dismissing goes
    /// back to that popover instead of closing.
    Alert {
        /// What to say
        message: String,

        /// Where to go after dismissing
        then: Option<Box<Popover>>,
    },

    /// Waiting for a yes/no before deleting
    ConfirmDelete {
        /// Position of the row in the admin table
        index: usize,

        /// Title of the event, so the user knows what they're deleting
        title: String,
    },
}

impl Popover {
    /// A fresh login popover
    pub fn login() -> Self {
        Self::Login {
            code: Input::default(),
            message: None,
        }
    }

    /// An alert that just closes when dismissed
    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert {
            message: message.into(),
            then: None,
        }
    }

    /// Render the popover
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, frame: &mut Frame<'_>, body_area: Rect) {
        match self {
            Popover::Help => {
                let popup_area = centered(body_area, Constraint::Percentage(60));

                let popup = Table::new(
                    [
                        Row::new(vec!["? / F1", "Display this help"]),
                        Row::new(vec!["/", "Search events (esc clears, enter keeps)"]),
                        Row::new(vec!["l", "Log in as admin"]),
                        Row::new(vec!["o", "Log out"]),
                        Row::new(vec!["a", "Add an event (admin)"]),
                        Row::new(vec!["tab", "Switch between events and admin table"]),
                        Row::new(vec!["j / down", "Select row below"]),
                        Row::new(vec!["k / up", "Select row above"]),
                        Row::new(vec!["d", "Delete selected event (admin)"]),
                        Row::new(vec!["q", "Quit / Close help"]),
                        Row::new(vec!["tab (form)", "Next field"]),
                        Row::new(vec!["enter (form)", "Save"]),
                        Row::new(vec!["escape (form)", "Cancel"]),
                    ],
                    [Constraint::Max(16), Constraint::Fill(1)],
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Keyboard Shortcuts")
                        .padding(Padding::horizontal(1))
                        .border_style(Style::new().blue()),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }
            Popover::Login { code, message } => {
                let popup_area = centered(body_area, Constraint::Length(4));

                let width = popup_area.width.saturating_sub(2 + 1); // -2 for the border, -1 for the cursor
                let input_scroll = code.visual_scroll(width as usize);

                let mut lines = vec![Line::from("*".repeat(code.value().chars().count()))];
                if let Some(message) = message {
                    lines.push(Line::from(message.as_str()).red());
                }

                let popup = Paragraph::new(lines)
                    .scroll((0, input_scroll as u16))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Admin access code"),
                    )
                    .style(Style::default().blue());

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);

                frame.set_cursor_position((
                    popup_area.x
                        + (code.visual_cursor().max(input_scroll) - input_scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    popup_area.y + 1, // +1 row for the border/title
                ));
            }
            Popover::AddEvent(form) => form.render(body_area, frame),
            Popover::Alert { message, .. } => {
                let popup_area = centered(body_area, Constraint::Length(4));

                let popup = Paragraph::new(message.as_str())
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Notice (enter to dismiss)")
                            .border_style(Style::new().yellow()),
                    );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }
            Popover::ConfirmDelete { title, .. } => {
                let popup_area = centered(body_area, Constraint::Length(4));

                let popup = Paragraph::new(vec![
                    Line::from(DELETE_PROMPT),
                    Line::from(title.as_str()).bold(),
                ])
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Delete event? (y/n)")
                        .border_style(Style::new().red()),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }
        }
    }
}

/// Carve a box out of the middle of `area`, half as wide and `height` tall.
fn centered(area: Rect, height: Constraint) -> Rect {
    let popup_vert = Layout::vertical([height]).flex(Flex::Center);
    let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

    let [popup_area] = popup_vert.areas(area);
    let [popup_area] = popup_horiz.areas(popup_area);

    popup_area
}
