use crate::records::Record;

const DIVIDER: &str = "────────────────────────────────────────";
const CONTENT_GUTTER: &str = "  │ ";

/// What a single result shows on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub byline: String,
    pub content: String,
}

impl Card {
    pub fn from_record(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            byline: format!("by {}", record.display_author()),
            content: record.content.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n{}\n", self.title, self.byline);

        // content is shown in full, as a read-only block
        for line in self.content.lines() {
            out.push_str(CONTENT_GUTTER);
            out.push_str(line);
            out.push('\n');
        }
        if self.content.is_empty() {
            out.push_str(CONTENT_GUTTER.trim_end());
            out.push('\n');
        }

        out
    }
}

/// One card per record, in backend order.
pub fn cards(records: &[Record]) -> Vec<Card> {
    records.iter().map(Card::from_record).collect()
}

/// Cards with a divider between consecutive ones.
pub fn render_results(records: &[Record]) -> String {
    cards(records)
        .iter()
        .map(Card::render)
        .collect::<Vec<_>>()
        .join(format!("{DIVIDER}\n").as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, title: &str, author: Option<&str>, content: &str) -> Record {
        Record {
            id,
            title: title.to_string(),
            author: author.map(str::to_string),
            publication_date: None,
            category: None,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_one_card_per_record_in_order() {
        let records = vec![
            record(3, "Third", Some("A"), "x"),
            record(1, "First", None, "y"),
            record(2, "Second", Some(""), "z"),
        ];

        let cards = cards(&records);
        assert_eq!(cards.len(), 3);
        assert_eq!(
            cards.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
            vec!["Third", "First", "Second"]
        );
        assert_eq!(cards[0].byline, "by A");
        assert_eq!(cards[1].byline, "by Unknown Author");
        assert_eq!(cards[2].byline, "by Unknown Author");
    }

    #[test]
    fn test_dividers_only_between_cards() {
        let records = vec![
            record(1, "a", None, ""),
            record(2, "b", None, ""),
            record(3, "c", None, ""),
        ];
        let out = render_results(&records);
        assert_eq!(out.matches(DIVIDER).count(), 2);
        assert!(!out.trim_end().ends_with(DIVIDER));

        assert_eq!(render_results(&records[..1]).matches(DIVIDER).count(), 0);
        assert_eq!(render_results(&[]), "");
    }

    #[test]
    fn test_card_shows_full_content() {
        let card = Card::from_record(&record(
            1,
            "Cat Monthly",
            Some("Jane Doe"),
            "first paragraph\nsecond paragraph",
        ));
        let out = card.render();
        assert_eq!(
            out,
            "Cat Monthly\nby Jane Doe\n  │ first paragraph\n  │ second paragraph\n"
        );
    }
}
