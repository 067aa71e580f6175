use crate::form_fields;
use campus_core::EventDraft;
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// The form admins use to add an event
#[derive(Debug)]
pub struct EventForm {
    /// Which field we're editing
    active: Field,

    /// What's happening?
    title: Input,

    /// When? As `YYYY-MM-DDTHH:MM`
    date: Input,

    /// Where?
    location: Input,

    /// Who's running it?
    organizer: Input,
}

form_fields!(
    Field,
    Title => "Title",
    Date => "Date (YYYY-MM-DDTHH:MM)",
    Location => "Location",
    Organizer => "Organizer",
);

impl EventForm {
    /// Draw the form centered in `body_area`
    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, body_area: Rect, frame: &mut Frame<'_>) {
        let popup_vert = Layout::vertical([Constraint::Length(14)]).flex(Flex::Center);
        let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

        let [popup_area] = popup_vert.areas(body_area);
        let [popup_area] = popup_horiz.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title("New event (enter to save, esc to cancel)")
            .border_style(Style::new().blue());
        let inner_area = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let width = inner_area.width.saturating_sub(2 + 1); // -2 for the border, -1 for the cursor

        let field_areas = Layout::vertical(Constraint::from_lengths([3, 3, 3, 3])).split(inner_area);

        for (field, area) in Field::FIELDS.iter().zip(field_areas.iter()) {
            let input = self.input(*field);
            let scroll = input.visual_scroll(width as usize);

            let border_style = if *field == self.active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Blue)
            };

            let widget = Paragraph::new(input.value())
                .scroll((0, scroll as u16))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(field.label())
                        .border_style(border_style),
                );

            frame.render_widget(widget, *area);

            if *field == self.active {
                frame.set_cursor_position((
                    area.x
                        + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    area.y + 1, // +1 row for the border/title
                ));
            }
        }
    }

    /// Move between fields on tab/shift-tab; everything else goes to the
    /// active field.
    pub fn handle_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.active = self.active.next();
            }
            KeyCode::BackTab => {
                self.active = self.active.prev();
            }
            _ => {
                let event = Event::Key(key);
                let active = self.active;

                self.input_mut(active).handle_event(&event);
            }
        }
    }

    /// What's been typed so far. Validation happens when the draft is
    /// submitted.
    pub fn finish(&self) -> EventDraft {
        EventDraft {
            title: self.title.value().to_owned(),
            date: self.date.value().to_owned(),
            location: self.location.value().to_owned(),
            organizer: self.organizer.value().to_owned(),
        }
    }

    /// The input backing `field`
    fn input(&self, field: Field) -> &Input {
        match field {
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Location => &self.location,
            Field::Organizer => &self.organizer,
        }
    }

    /// The input backing `field`, mutably
    fn input_mut(&mut self, field: Field) -> &mut Input {
        match field {
            Field::Title => &mut self.title,
            Field::Date => &mut self.date,
            Field::Location => &mut self.location,
            Field::Organizer => &mut self.organizer,
        }
    }
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            active: Field::Title,
            title: Input::default(),
            date: Input::default(),
            location: Input::default(),
            organizer: Input::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut EventForm, code: KeyCode) {
        form.handle_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(form: &mut EventForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn starts_empty() {
        assert_eq!(EventForm::default().finish(), EventDraft::default());
    }

    #[test]
    fn tab_moves_between_fields() {
        let mut form = EventForm::default();

        type_str(&mut form, "Fair");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "2099-01-01T10:00");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "Quad");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "SU");

        assert_eq!(
            form.finish(),
            EventDraft {
                title: "Fair".to_string(),
                date: "2099-01-01T10:00".to_string(),
                location: "Quad".to_string(),
                organizer: "SU".to_string(),
            }
        );
    }

    #[test]
    fn back_tab_wraps_to_organizer() {
        let mut form = EventForm::default();

        press(&mut form, KeyCode::BackTab);
        type_str(&mut form, "SU");

        assert_eq!(form.finish().organizer, "SU");
        assert_eq!(form.finish().title, "");
    }
}
