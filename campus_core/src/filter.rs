use crate::render::EventCard;

/// Show the cards whose text contains `query`, ignoring case, and hide the
/// rest. An empty query shows everything. Only touches card visibility.
pub fn apply(cards: &mut [EventCard], query: &str) {
    let query = query.to_lowercase();

    for card in cards {
        card.visible = card.text().to_lowercase().contains(&query);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::PublicView;
    use crate::test::event;

    fn cards() -> Vec<EventCard> {
        PublicView::render(vec![
            event("Spring Fair", "2099-01-01T10:00"),
            event("Alumni Gala", "2098-06-01T18:00"),
            event("Chess Club", "2099-03-01T17:30"),
        ])
        .cards()
        .to_vec()
    }

    fn visible(cards: &[EventCard]) -> Vec<&str> {
        cards
            .iter()
            .filter(|card| card.visible)
            .map(|card| card.title.as_str())
            .collect()
    }

    #[test]
    fn unique_match_shows_only_that_card() {
        let mut cards = cards();

        apply(&mut cards, "gala");
        assert_eq!(visible(&cards), vec!["Alumni Gala"]);
    }

    #[test]
    fn ignores_case() {
        let mut cards = cards();

        apply(&mut cards, "CHESS");
        assert_eq!(visible(&cards), vec!["Chess Club"]);
    }

    #[test]
    fn matches_other_fields() {
        let mut cards = cards();

        // every test event has the same location
        apply(&mut cards, "where: somewhere");
        assert_eq!(visible(&cards).len(), 3);

        apply(&mut cards, "2098");
        assert_eq!(visible(&cards), vec!["Alumni Gala"]);
    }

    #[test]
    fn no_match_hides_everything() {
        let mut cards = cards();

        apply(&mut cards, "karaoke");
        assert!(visible(&cards).is_empty());
    }

    #[test]
    fn empty_query_restores_everything() {
        let mut cards = cards();

        apply(&mut cards, "gala");
        apply(&mut cards, "");
        assert_eq!(visible(&cards).len(), 3);
    }
}
