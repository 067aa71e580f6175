use crate::error::{Result, ValidationError};
use crate::event::{parse_date, Event};
use crate::filter;
use crate::render::{display_order, AdminView, PublicView};
use crate::session::SessionGate;
use crate::storage::Storage;
use crate::store::EventStore;

/// Asked before an event is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";

/// Shown (and acknowledged) after logging out.
pub const LOGGED_OUT: &str = "Logged out from Admin access.";

/// Something that can ask the user a yes/no question and wait for the
/// answer.
pub trait Confirm {
    /// Ask `prompt`; `true` means go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// What the user typed into the event form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    /// Title field
    pub title: String,

    /// Date field, ideally `YYYY-MM-DDTHH:MM`
    pub date: String,

    /// Location field
    pub location: String,

    /// Organizer field
    pub organizer: String,
}

impl EventDraft {
    /// Turn the draft into an event. Every field must be non-blank once
    /// trimmed, and the date must be readable.
    pub fn validate(&self) -> std::result::Result<Event, ValidationError> {
        let title = self.title.trim();
        let date = self.date.trim();
        let location = self.location.trim();
        let organizer = self.organizer.trim();

        if [title, date, location, organizer].iter().any(|field| field.is_empty()) {
            return Err(ValidationError::MissingField);
        }

        Ok(Event {
            title: title.to_owned(),
            date: parse_date(date).ok_or(ValidationError::InvalidDate)?,
            location: location.to_owned(),
            organizer: organizer.to_owned(),
        })
    }
}

/// Things a user can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Submit the login form
    Login(String),

    /// Press the logout control
    Logout,

    /// Submit the event form
    AddEvent(EventDraft),

    /// Press delete on the admin row with this position
    DeleteEvent(usize),

    /// Type into the search box; carries the whole query
    Filter(String),
}

/// What the user needs to see after an intent has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The views are up to date; nothing else to say.
    Updated,

    /// The views are up to date and the user has to acknowledge this message.
    Acknowledge(&'static str),
}

/// Both views over one event store, plus the gate that unlocks the admin
/// one. Every handler runs start to finish before returning, re-reading
/// storage as it goes, so the views never hold anything storage doesn't.
#[derive(Debug)]
pub struct Campus<S> {
    /// Where the session flag and events live
    storage: S,

    /// Decides whether the admin view is available
    gate: SessionGate,

    /// The event list inside `storage`
    store: EventStore,

    /// The most recent public render
    public: PublicView,

    /// The most recent admin render, if the gate is open
    admin: Option<AdminView>,

    /// The search query currently applied to `public`
    query: String,
}

impl<S: Storage> Campus<S> {
    /// Set up over `storage` and render both views from whatever is already
    /// there.
    pub fn new(storage: S, gate: SessionGate) -> Result<Self> {
        let mut campus = Self {
            storage,
            gate,
            store: EventStore,
            public: PublicView::Empty(crate::render::NO_EVENTS),
            admin: None,
            query: String::new(),
        };

        campus.refresh()?;

        Ok(campus)
    }

    /// The storage backend, for inspection.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The public listing as of the last render.
    pub fn public_view(&self) -> &PublicView {
        &self.public
    }

    /// The admin table as of the last render. `None` while logged out.
    pub fn admin_view(&self) -> Option<&AdminView> {
        self.admin.as_ref()
    }

    /// The search query currently applied to the public view.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Is the admin gate open right now? Reads storage.
    pub fn is_authenticated(&self) -> Result<bool> {
        self.gate.is_authenticated(&self.storage)
    }

    /// Everything in the store, in stored order.
    pub fn events(&self) -> Result<Vec<Event>> {
        self.store.list(&self.storage)
    }

    /// Re-render everything to match the current gate state and store.
    pub fn refresh(&mut self) -> Result<()> {
        self.render_admin_view()?;
        self.render_public_view()
    }

    /// Rebuild the public cards from the store, then re-apply the current
    /// search query to them.
    pub fn render_public_view(&mut self) -> Result<()> {
        self.public = PublicView::render(self.events()?);
        filter::apply(self.public.cards_mut(), &self.query);

        Ok(())
    }

    /// Rebuild the admin table from the store if the gate is open, or drop it
    /// if not.
    pub fn render_admin_view(&mut self) -> Result<()> {
        self.admin = if self.is_authenticated()? {
            Some(AdminView::render(self.events()?))
        } else {
            None
        };

        Ok(())
    }

    /// Try to open the gate. On success both views are re-rendered; on
    /// failure nothing changes.
    pub fn login(&mut self, code: &str) -> Result<()> {
        self.gate.login(&mut self.storage, code)?;
        self.refresh()
    }

    /// Close the gate and re-render. Returns the message the user must
    /// acknowledge.
    pub fn logout(&mut self) -> Result<&'static str> {
        self.gate.logout(&mut self.storage)?;
        self.refresh()?;

        Ok(LOGGED_OUT)
    }

    /// Validate `draft` and append it to the end of the store. Display order
    /// is worked out at render time, so nothing is sorted here.
    pub fn add_event(&mut self, draft: &EventDraft) -> Result<()> {
        let event = draft.validate()?;

        let mut events = self.events()?;
        events.push(event);
        self.store.replace(&mut self.storage, &events)?;

        tracing::info!(count = events.len(), "added event");

        self.refresh()
    }

    /// Delete the event shown at `index` in the most recent render. Does
    /// nothing (without asking) while logged out, and nothing if the user
    /// declines or `index` is past the end. Returns the removed event, if any.
    pub fn delete_event(
        &mut self,
        index: usize,
        mut confirm: impl Confirm,
    ) -> Result<Option<Event>> {
        if !self.is_authenticated()? {
            tracing::debug!(index, "ignoring delete while logged out");
            return Ok(None);
        }

        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(None);
        }

        let mut events = self.events()?;
        let Some(&stored) = display_order(&events).get(index) else {
            tracing::debug!(index, count = events.len(), "ignoring delete past the end");
            return Ok(None);
        };

        let removed = events.remove(stored);
        self.store.replace(&mut self.storage, &events)?;

        tracing::info!(index, title = %removed.title, "deleted event");

        self.refresh()?;

        Ok(Some(removed))
    }

    /// Show only the public cards matching `query`. Leaves the store and the
    /// admin view alone.
    pub fn apply_filter(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        filter::apply(self.public.cards_mut(), query);
    }

    /// Route an intent to its handler.
    pub fn dispatch(&mut self, intent: Intent, confirm: impl Confirm) -> Result<Outcome> {
        match intent {
            Intent::Login(code) => self.login(&code)?,
            Intent::Logout => return Ok(Outcome::Acknowledge(self.logout()?)),
            Intent::AddEvent(draft) => self.add_event(&draft)?,
            Intent::DeleteEvent(index) => {
                self.delete_event(index, confirm)?;
            }
            Intent::Filter(query) => self.apply_filter(&query),
        }

        Ok(Outcome::Updated)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::render::{EventCard, NO_EVENTS, NOTHING_TO_MANAGE};
    use crate::session::DEFAULT_ACCESS_CODE;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::store::EVENTS_KEY;
    use crate::test::{any_event, event};
    use proptest::prelude::*;

    fn campus() -> Campus<MemoryStorage> {
        Campus::new(MemoryStorage::new(), SessionGate::default()).unwrap()
    }

    fn admin() -> Campus<MemoryStorage> {
        let mut campus = campus();
        campus.login(DEFAULT_ACCESS_CODE).unwrap();
        campus
    }

    fn draft(title: &str, date: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            date: date.to_string(),
            location: "Somewhere".to_string(),
            organizer: "Someone".to_string(),
        }
    }

    fn always(answer: bool) -> impl FnMut(&str) -> bool {
        move |_| answer
    }

    fn public_titles<S: Storage>(campus: &Campus<S>) -> Vec<String> {
        campus
            .public_view()
            .visible_cards()
            .map(|card| card.title.clone())
            .collect()
    }

    fn admin_titles(campus: &Campus<MemoryStorage>) -> Vec<String> {
        campus
            .admin_view()
            .unwrap()
            .rows()
            .iter()
            .map(|row| row.title.clone())
            .collect()
    }

    mod startup {
        use super::*;
        use std::fs;
        use tempdir::TempDir;

        #[test]
        fn renders_empty_views() {
            let campus = campus();

            assert_eq!(campus.public_view(), &PublicView::Empty(NO_EVENTS));
            assert_eq!(campus.admin_view(), None);
        }

        #[test]
        fn renders_existing_events() {
            let mut storage = MemoryStorage::new();
            EventStore
                .replace(
                    &mut storage,
                    &[
                        event("Fair", "2099-01-01T10:00"),
                        event("Gala", "2098-06-01T18:00"),
                    ],
                )
                .unwrap();

            let campus = Campus::new(storage, SessionGate::default()).unwrap();

            assert_eq!(public_titles(&campus), vec!["Gala", "Fair"]);
        }

        #[test]
        fn recovers_from_a_corrupt_storage_file() {
            let dir = TempDir::new("campus").unwrap();
            let storage = FileStorage::in_dir(dir.path());
            fs::write(storage.path(), "not json").unwrap();

            let mut campus = Campus::new(storage, SessionGate::default()).unwrap();
            assert_eq!(campus.public_view(), &PublicView::Empty(NO_EVENTS));
            assert!(!campus.is_authenticated().unwrap());

            campus.login(DEFAULT_ACCESS_CODE).unwrap();
            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();

            let reopened =
                Campus::new(FileStorage::in_dir(dir.path()), SessionGate::default()).unwrap();
            assert_eq!(public_titles(&reopened), vec!["Fair"]);
            assert!(reopened.admin_view().is_some());
        }
    }

    mod login {
        use super::*;

        #[test]
        fn correct_code_shows_admin_view() {
            let campus = admin();

            assert!(campus.is_authenticated().unwrap());
            assert_eq!(
                campus.admin_view(),
                Some(&AdminView::Empty(NOTHING_TO_MANAGE))
            );
        }

        #[test]
        fn wrong_code_reports_and_changes_nothing() {
            let mut campus = campus();

            assert!(matches!(campus.login("nope"), Err(Error::InvalidCode)));
            assert!(!campus.is_authenticated().unwrap());
            assert_eq!(campus.admin_view(), None);
        }

        #[test]
        fn logout_hides_admin_view() {
            let mut campus = admin();

            assert_eq!(campus.logout().unwrap(), LOGGED_OUT);
            assert!(!campus.is_authenticated().unwrap());
            assert_eq!(campus.admin_view(), None);
        }

        #[test]
        fn logout_while_logged_out() {
            let mut campus = campus();

            assert_eq!(campus.logout().unwrap(), LOGGED_OUT);
            assert!(!campus.is_authenticated().unwrap());
        }
    }

    mod add_event {
        use super::*;

        #[test]
        fn appends_and_renders_both_views() {
            let mut campus = admin();

            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();
            campus.add_event(&draft("Gala", "2098-06-01T18:00")).unwrap();

            // stored in append order...
            let stored: Vec<String> = campus
                .events()
                .unwrap()
                .into_iter()
                .map(|e| e.title)
                .collect();
            assert_eq!(stored, vec!["Fair", "Gala"]);

            // ...displayed in date order
            assert_eq!(public_titles(&campus), vec!["Gala", "Fair"]);
            assert_eq!(admin_titles(&campus), vec!["Gala", "Fair"]);
        }

        #[test]
        fn trims_fields() {
            let mut campus = campus();

            campus
                .add_event(&EventDraft {
                    title: "  Fair ".to_string(),
                    date: " 2099-01-01T10:00 ".to_string(),
                    location: "\tQuad".to_string(),
                    organizer: "SU\n".to_string(),
                })
                .unwrap();

            assert_eq!(
                campus.events().unwrap(),
                vec![Event {
                    location: "Quad".to_string(),
                    organizer: "SU".to_string(),
                    ..event("Fair", "2099-01-01T10:00")
                }]
            );
        }

        #[test]
        fn blank_field_is_rejected() {
            let mut campus = campus();

            let result = campus.add_event(&EventDraft {
                organizer: "   ".to_string(),
                ..draft("Fair", "2099-01-01T10:00")
            });

            assert!(matches!(
                result,
                Err(Error::Validation(ValidationError::MissingField))
            ));
            assert_eq!(campus.events().unwrap(), Vec::new());
        }

        #[test]
        fn unreadable_date_is_rejected() {
            let mut campus = campus();

            let result = campus.add_event(&draft("Fair", "soon"));

            assert!(matches!(
                result,
                Err(Error::Validation(ValidationError::InvalidDate))
            ));
            assert_eq!(campus.events().unwrap(), Vec::new());
        }

        #[test]
        fn keeps_stored_records_with_utc_dates() {
            let mut storage = MemoryStorage::new();
            storage
                .set(
                    EVENTS_KEY,
                    r#"[
                        {"title":"Fair","date":"2099-01-01T10:00","location":"Somewhere","organizer":"Someone"},
                        {"title":"Gala","date":"2098-06-01T18:00Z","location":"Somewhere","organizer":"Someone"}
                    ]"#,
                )
                .unwrap();
            let mut campus = Campus::new(storage, SessionGate::default()).unwrap();
            assert_eq!(public_titles(&campus), vec!["Gala", "Fair"]);

            campus.add_event(&draft("Talk", "2099-03-01T09:00")).unwrap();

            assert_eq!(
                campus.events().unwrap(),
                vec![
                    event("Fair", "2099-01-01T10:00"),
                    event("Gala", "2098-06-01T18:00"),
                    event("Talk", "2099-03-01T09:00"),
                ]
            );
        }

        #[test]
        fn keeps_readable_records_next_to_a_broken_one() {
            let mut storage = MemoryStorage::new();
            storage
                .set(
                    EVENTS_KEY,
                    r#"[
                        {"title":"Fair","date":"2099-01-01T10:00","location":"Somewhere","organizer":"Someone"},
                        {"title":"Gala"}
                    ]"#,
                )
                .unwrap();
            let mut campus = Campus::new(storage, SessionGate::default()).unwrap();

            campus.add_event(&draft("Talk", "2099-03-01T09:00")).unwrap();

            assert_eq!(
                campus.events().unwrap(),
                vec![
                    event("Fair", "2099-01-01T10:00"),
                    event("Talk", "2099-03-01T09:00"),
                ]
            );
        }

        #[test]
        fn overwrites_malformed_data() {
            let mut storage = MemoryStorage::new();
            storage.set(EVENTS_KEY, "garbage").unwrap();
            let mut campus = Campus::new(storage, SessionGate::default()).unwrap();

            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();

            assert_eq!(
                campus.events().unwrap(),
                vec![event("Fair", "2099-01-01T10:00")]
            );
        }
    }

    mod delete_event {
        use super::*;

        fn with_events() -> Campus<MemoryStorage> {
            let mut campus = admin();
            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();
            campus.add_event(&draft("Gala", "2098-06-01T18:00")).unwrap();
            campus.add_event(&draft("Talk", "2098-09-01T12:00")).unwrap();
            campus
        }

        #[test]
        fn removes_the_displayed_row() {
            let mut campus = with_events();
            assert_eq!(admin_titles(&campus), vec!["Gala", "Talk", "Fair"]);

            let removed = campus.delete_event(1, always(true)).unwrap();

            assert_eq!(removed.map(|e| e.title), Some("Talk".to_string()));
            assert_eq!(admin_titles(&campus), vec!["Gala", "Fair"]);
            assert_eq!(public_titles(&campus), vec!["Gala", "Fair"]);
        }

        #[test]
        fn keeps_stored_order_of_the_rest() {
            let mut campus = with_events();

            campus.delete_event(0, always(true)).unwrap();

            let stored: Vec<String> = campus
                .events()
                .unwrap()
                .into_iter()
                .map(|e| e.title)
                .collect();
            assert_eq!(stored, vec!["Fair", "Talk"]);
        }

        #[test]
        fn asks_first() {
            let mut campus = with_events();
            let mut prompts = Vec::new();

            campus
                .delete_event(0, |prompt: &str| {
                    prompts.push(prompt.to_string());
                    true
                })
                .unwrap();

            assert_eq!(prompts, vec![DELETE_PROMPT.to_string()]);
        }

        #[test]
        fn declining_changes_nothing() {
            let mut campus = with_events();

            assert_eq!(campus.delete_event(0, always(false)).unwrap(), None);
            assert_eq!(campus.events().unwrap().len(), 3);
        }

        #[test]
        fn out_of_range_is_ignored() {
            let mut campus = with_events();

            assert_eq!(campus.delete_event(3, always(true)).unwrap(), None);
            assert_eq!(campus.events().unwrap().len(), 3);
        }

        #[test]
        fn logged_out_does_not_ask() {
            let mut campus = with_events();
            campus.logout().unwrap();
            let mut asked = false;

            let removed = campus
                .delete_event(0, |_: &str| {
                    asked = true;
                    true
                })
                .unwrap();

            assert_eq!(removed, None);
            assert!(!asked);
            assert_eq!(campus.events().unwrap().len(), 3);
        }
    }

    mod filter {
        use super::*;

        #[test]
        fn hides_non_matching_cards() {
            let mut campus = admin();
            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();
            campus.add_event(&draft("Gala", "2098-06-01T18:00")).unwrap();

            campus.apply_filter("FAIR");

            assert_eq!(public_titles(&campus), vec!["Fair"]);
            // the admin table is untouched
            assert_eq!(admin_titles(&campus), vec!["Gala", "Fair"]);
        }

        #[test]
        fn survives_a_re_render() {
            let mut campus = admin();
            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();
            campus.apply_filter("gala");

            campus.add_event(&draft("Gala", "2098-06-01T18:00")).unwrap();

            assert_eq!(public_titles(&campus), vec!["Gala"]);
            assert_eq!(campus.query(), "gala");
        }

        #[test]
        fn empty_query_shows_all() {
            let mut campus = admin();
            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();
            campus.add_event(&draft("Gala", "2098-06-01T18:00")).unwrap();

            campus.apply_filter("gala");
            campus.apply_filter("");

            let all: Vec<&EventCard> = campus.public_view().visible_cards().collect();
            assert_eq!(all.len(), 2);
        }

        #[test]
        fn does_not_touch_storage() {
            let mut campus = admin();
            campus.add_event(&draft("Fair", "2099-01-01T10:00")).unwrap();
            let before = campus.storage().clone();

            campus.apply_filter("nothing matches this");

            assert_eq!(
                EventStore.list(&before).unwrap(),
                campus.events().unwrap()
            );
        }
    }

    mod dispatch {
        use super::*;

        #[test]
        fn routes_every_intent() {
            let mut campus = campus();

            assert_eq!(
                campus
                    .dispatch(Intent::Login(DEFAULT_ACCESS_CODE.to_string()), always(true))
                    .unwrap(),
                Outcome::Updated
            );
            campus
                .dispatch(
                    Intent::AddEvent(draft("Fair", "2099-01-01T10:00")),
                    always(true),
                )
                .unwrap();
            campus
                .dispatch(Intent::Filter("fair".to_string()), always(true))
                .unwrap();
            assert_eq!(public_titles(&campus), vec!["Fair"]);

            campus
                .dispatch(Intent::DeleteEvent(0), always(true))
                .unwrap();
            assert_eq!(campus.events().unwrap(), Vec::new());

            assert_eq!(
                campus.dispatch(Intent::Logout, always(true)).unwrap(),
                Outcome::Acknowledge(LOGGED_OUT)
            );
            assert_eq!(campus.admin_view(), None);
        }

        #[test]
        fn unauthenticated_delete_leaves_store_alone() {
            let mut storage = MemoryStorage::new();
            EventStore
                .replace(&mut storage, &[event("Fair", "2099-01-01T10:00")])
                .unwrap();
            let mut campus = Campus::new(storage, SessionGate::default()).unwrap();

            campus
                .dispatch(Intent::DeleteEvent(0), |_: &str| -> bool {
                    panic!("should not ask while logged out")
                })
                .unwrap();

            assert_eq!(campus.events().unwrap().len(), 1);
        }
    }

    proptest! {
        #[test]
        fn valid_adds_append_in_order(events in proptest::collection::vec(any_event(), 0..8)) {
            let mut campus = campus();

            for (count, event) in events.iter().enumerate() {
                campus.add_event(&EventDraft {
                    title: event.title.clone(),
                    date: crate::event::format_date(&event.date),
                    location: event.location.clone(),
                    organizer: event.organizer.clone(),
                }).unwrap();

                prop_assert_eq!(campus.events().unwrap().len(), count + 1);
            }

            prop_assert_eq!(campus.events().unwrap(), events);
        }

        #[test]
        fn blank_fields_leave_store_alone(
            existing in proptest::collection::vec(any_event(), 0..4),
            blank in 0..4usize,
            whitespace in "[ \t]{0,3}",
        ) {
            let mut storage = MemoryStorage::new();
            EventStore.replace(&mut storage, &existing).unwrap();
            let mut campus = Campus::new(storage, SessionGate::default()).unwrap();

            let mut draft = draft("Fair", "2099-01-01T10:00");
            match blank {
                0 => draft.title = whitespace,
                1 => draft.date = whitespace,
                2 => draft.location = whitespace,
                _ => draft.organizer = whitespace,
            }

            prop_assert!(campus.add_event(&draft).is_err());
            prop_assert_eq!(campus.events().unwrap(), existing);
        }
    }

    mod state_machine {
        use super::*;
        use chrono::NaiveDateTime;
        use proptest_state_machine::{prop_state_machine, ReferenceStateMachine, StateMachineTest};

        #[derive(Debug, Clone)]
        enum Transition {
            Login,
            Logout,
            Add(Event),
            Delete(usize),
        }

        #[derive(Debug, Clone)]
        struct RefState {
            authenticated: bool,
            events: Vec<Event>,
        }

        impl ReferenceStateMachine for RefState {
            type State = RefState;

            type Transition = Transition;

            fn init_state() -> BoxedStrategy<Self::State> {
                Just(RefState {
                    authenticated: false,
                    events: Vec::new(),
                })
                .boxed()
            }

            fn transitions(_: &Self::State) -> BoxedStrategy<Self::Transition> {
                prop_oneof![
                    1 => Just(Transition::Login),
                    1 => Just(Transition::Logout),
                    5 => any_event().prop_map(Transition::Add),
                    3 => (0..6usize).prop_map(Transition::Delete),
                ]
                .boxed()
            }

            fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
                match transition {
                    Transition::Login => state.authenticated = true,
                    Transition::Logout => state.authenticated = false,
                    Transition::Add(event) => state.events.push(event.clone()),
                    Transition::Delete(index) => {
                        if state.authenticated {
                            // earliest first; same-moment events by stored position
                            let mut shown: Vec<(NaiveDateTime, usize)> = state
                                .events
                                .iter()
                                .enumerate()
                                .map(|(stored, event)| (event.date, stored))
                                .collect();
                            shown.sort_unstable();

                            if let Some((_, stored)) = shown.get(*index) {
                                state.events.remove(*stored);
                            }
                        }
                    }
                }

                state
            }
        }

        struct CampusStateMachine {}

        impl StateMachineTest for CampusStateMachine {
            type SystemUnderTest = Campus<MemoryStorage>;

            type Reference = RefState;

            fn init_test(
                _: &<Self::Reference as ReferenceStateMachine>::State,
            ) -> Self::SystemUnderTest {
                campus()
            }

            fn apply(
                mut state: Self::SystemUnderTest,
                _: &<Self::Reference as ReferenceStateMachine>::State,
                transition: <Self::Reference as ReferenceStateMachine>::Transition,
            ) -> Self::SystemUnderTest {
                match transition {
                    Transition::Login => state.login(DEFAULT_ACCESS_CODE).unwrap(),
                    Transition::Logout => {
                        state.logout().unwrap();
                    }
                    Transition::Add(event) => state
                        .add_event(&EventDraft {
                            title: event.title,
                            date: crate::event::format_date(&event.date),
                            location: event.location,
                            organizer: event.organizer,
                        })
                        .unwrap(),
                    Transition::Delete(index) => {
                        state.delete_event(index, always(true)).unwrap();
                    }
                }

                state
            }

            fn check_invariants(
                state: &Self::SystemUnderTest,
                ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            ) {
                assert_eq!(state.events().unwrap(), ref_state.events);
                assert_eq!(state.is_authenticated().unwrap(), ref_state.authenticated);

                // both views come from the same store, in the same order
                let public: Vec<String> = state
                    .public_view()
                    .cards()
                    .iter()
                    .map(|card| card.title.clone())
                    .collect();
                assert_eq!(public.len(), ref_state.events.len());

                match state.admin_view() {
                    Some(admin) => {
                        let admin: Vec<String> =
                            admin.rows().iter().map(|row| row.title.clone()).collect();
                        assert_eq!(public, admin);
                    }
                    None => assert!(!ref_state.authenticated),
                }
            }
        }

        prop_state_machine! {
            #[test]
            fn state_machine(sequential 1..20 => CampusStateMachine);
        }
    }
}
