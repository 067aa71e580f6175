use crate::error::Result;
use crate::event::Event;
use crate::storage::Storage;

/// Where the event list lives in storage.
pub const EVENTS_KEY: &str = "campusEvents";

/// The persisted list of events. Holds no events itself: every `list` reads
/// storage fresh and every `replace` writes the whole list back.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventStore;

impl EventStore {
    /// Get every stored event in stored order. Missing data, or anything that
    /// isn't a JSON array, reads as an empty list. Records that can't be read
    /// are skipped so one bad record doesn't hide the rest. Only backend
    /// failures are errors.
    pub fn list(self, storage: &impl Storage) -> Result<Vec<Event>> {
        let Some(raw) = storage.get(EVENTS_KEY)? else {
            return Ok(Vec::new());
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(?err, "stored events are malformed; treating as empty");
                return Ok(Vec::new());
            }
        };

        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| match serde_json::from_value(record) {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::warn!(position, ?err, "skipping malformed stored event");
                    None
                }
            })
            .collect())
    }

    /// Replace the stored list with `events`, in one write.
    pub fn replace(self, storage: &mut impl Storage, events: &[Event]) -> Result<()> {
        let raw = serde_json::to_string(events).map_err(crate::storage::Error::from)?;
        storage.set(EVENTS_KEY, &raw)?;

        tracing::debug!(count = events.len(), "saved events");

        Ok(())
    }
}
