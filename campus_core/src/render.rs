use crate::event::Event;
use chrono::NaiveDateTime;

/// Shown instead of the public list when there are no events.
pub const NO_EVENTS: &str = "No events scheduled. Check back soon!";

/// Shown instead of the admin table when there are no events.
pub const NOTHING_TO_MANAGE: &str = "No events to manage.";

/// How we show the date part of an event
const DATE_FORMAT: &str = "%b %-d, %Y";

/// How we show the time part of an event
const TIME_FORMAT: &str = "%H:%M";

/// Order events for display: ascending by date. The sort is stable, so
/// events at the same moment keep their stored order.
pub fn sorted(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|event| event.date);
    events
}

/// Stored positions of `events` in display order, so that `display_order(e)[i]`
/// is where the `i`th displayed event lives in storage. Agrees with `sorted`.
pub fn display_order(events: &[Event]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&stored| events[stored].date);
    order
}

/// Date and time, as shown on a public card.
pub fn format_when(date: &NaiveDateTime) -> String {
    format!("{} : {}", date.format(DATE_FORMAT), date.format(TIME_FORMAT))
}

/// The read-only listing everyone sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicView {
    /// Nothing to show; display the message instead.
    Empty(&'static str),

    /// One card per event, in display order.
    Cards(Vec<EventCard>),
}

impl PublicView {
    /// Project `events` (in any order) into cards.
    pub fn render(events: Vec<Event>) -> Self {
        if events.is_empty() {
            return Self::Empty(NO_EVENTS);
        }

        Self::Cards(sorted(events).iter().map(EventCard::new).collect())
    }

    /// All cards, shown or not.
    pub fn cards(&self) -> &[EventCard] {
        match self {
            Self::Empty(_) => &[],
            Self::Cards(cards) => cards,
        }
    }

    /// Mutable access to the cards, for toggling visibility.
    pub fn cards_mut(&mut self) -> &mut [EventCard] {
        match self {
            Self::Empty(_) => &mut [],
            Self::Cards(cards) => cards,
        }
    }

    /// Only the cards the search filter currently lets through.
    pub fn visible_cards(&self) -> impl Iterator<Item = &EventCard> {
        self.cards().iter().filter(|card| card.visible)
    }
}

/// One event as shown to the public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    /// Heading
    pub title: String,

    /// Formatted date and time
    pub when: String,

    /// Where it is
    pub location: String,

    /// Who's running it
    pub organizer: String,

    /// Whether the search filter is letting this card through
    pub visible: bool,
}

impl EventCard {
    /// Render a single event. Cards start out visible.
    fn new(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            when: format_when(&event.date),
            location: event.location.clone(),
            organizer: event.organizer.clone(),
            visible: true,
        }
    }

    /// Everything the card displays, labels included, one line per field.
    pub fn text(&self) -> String {
        format!(
            "{}\nWhen: {}\nWhere: {}\nBy: {}",
            self.title, self.when, self.location, self.organizer
        )
    }
}

/// The admin management table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminView {
    /// Nothing to manage; display the message instead.
    Empty(&'static str),

    /// One row per event, in display order.
    Table(Vec<AdminRow>),
}

impl AdminView {
    /// Project `events` (in any order) into table rows.
    pub fn render(events: Vec<Event>) -> Self {
        if events.is_empty() {
            return Self::Empty(NOTHING_TO_MANAGE);
        }

        Self::Table(
            sorted(events)
                .iter()
                .enumerate()
                .map(|(index, event)| AdminRow {
                    index,
                    title: event.title.clone(),
                    date: event.date.format(DATE_FORMAT).to_string(),
                })
                .collect(),
        )
    }

    /// All rows in the table.
    pub fn rows(&self) -> &[AdminRow] {
        match self {
            Self::Empty(_) => &[],
            Self::Table(rows) => rows,
        }
    }
}

/// One row of the admin table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    /// Position of this row in the render it came from. Deleting uses this,
    /// so it's only good until the next render.
    pub index: usize,

    /// Event title
    pub title: String,

    /// Formatted date (no time)
    pub date: String,
}
