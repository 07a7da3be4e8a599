//! Output document assembly and normalization.
use regex::Regex;
use std::sync::OnceLock;

const UNKNOWN_AUTHOR: &str = "Unknown";
const FALLBACK_HEADER: &str = "=== TICKET CONTENT ===\n";

/// One message as it will appear in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub author: String,
    pub timestamp: String,
    pub body: String,
}

impl MessageRecord {
    /// Build a record from the raw container text.
    ///
    /// When the author name occurs verbatim in the body, its first occurrence
    /// is removed. This also strips the name when it appears as an ordinary
    /// word in the message; partial overlaps are left alone.
    pub fn new(author: Option<String>, timestamp: Option<String>, raw_body: &str) -> Self {
        let author = author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let timestamp = timestamp.unwrap_or_default();

        let mut body = raw_body.trim().to_string();
        if body.contains(author.as_str()) {
            body = body.replacen(author.as_str(), "", 1).trim().to_string();
        }

        Self {
            author,
            timestamp,
            body,
        }
    }

    /// Separator line plus body for the 1-based `position`.
    pub fn render(&self, position: usize) -> String {
        let suffix = if self.timestamp.is_empty() {
            String::new()
        } else {
            format!(" - {}", self.timestamp)
        };
        format!(
            "\n--- Message {position} from {}{suffix} ---\n{}\n",
            self.author, self.body
        )
    }
}

/// Ordered text segments making up one extracted ticket.
#[derive(Debug, Clone)]
pub struct TicketDocument {
    header: String,
    timeline: Vec<String>,
    sections: Vec<String>,
    messages: usize,
}

impl TicketDocument {
    /// Start a document with the ticket title, or the generic header.
    pub fn new(title: Option<&str>) -> Self {
        let header = match title {
            Some(title) => format!("=== TICKET: {title} ===\n"),
            None => FALLBACK_HEADER.to_string(),
        };
        Self {
            header,
            timeline: Vec::new(),
            sections: Vec::new(),
            messages: 0,
        }
    }

    /// Timeline events spliced between the header and the messages.
    ///
    /// An empty list leaves the output untouched.
    pub fn with_timeline<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timeline = events.into_iter().map(Into::into).collect();
        self
    }

    /// Append the next message; numbering follows insertion order.
    pub fn push_message(&mut self, record: &MessageRecord) {
        self.messages += 1;
        self.sections.push(record.render(self.messages));
    }

    /// Append the whole page text verbatim under the raw-content heading.
    pub fn push_raw(&mut self, page_text: &str) {
        self.sections.push("\n--- Raw Page Content ---\n".to_string());
        self.sections.push(page_text.to_string());
    }

    pub fn message_count(&self) -> usize {
        self.messages
    }

    /// Join all segments in emission order and collapse blank-line runs.
    pub fn render(&self) -> String {
        let mut out = self.header.clone();
        if !self.timeline.is_empty() {
            out.push_str("\n=== TIMELINE ===\n");
            for event in &self.timeline {
                out.push_str(event);
                out.push('\n');
            }
            out.push_str("\n=== MESSAGES ===\n");
        }
        for section in &self.sections {
            out.push_str(section);
        }
        normalize_newlines(&out)
    }
}

fn blank_run() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("valid newline-run pattern"))
}

/// Collapse every run of three or more newlines to exactly two.
pub fn normalize_newlines(text: &str) -> String {
    blank_run().replace_all(text, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_long_newline_runs() {
        assert_eq!(normalize_newlines("a\n\n\n\nb\n\n\nc\n\nd"), "a\n\nb\n\nc\n\nd");
        assert_eq!(normalize_newlines("a\nb"), "a\nb");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = ["", "\n\n\n", "x\n\n\n\n\ny\n", "--- a ---\n\n\n\n\n\n\nb"];
        for sample in samples {
            let once = normalize_newlines(sample);
            assert_eq!(normalize_newlines(&once), once);
            assert!(!once.contains("\n\n\n"));
        }
    }

    #[test]
    fn record_defaults_author_and_timestamp() {
        let rec = MessageRecord::new(None, None, "  just text  ");
        assert_eq!(rec.author, "Unknown");
        assert_eq!(rec.timestamp, "");
        assert_eq!(rec.body, "just text");
        assert_eq!(rec.render(3), "\n--- Message 3 from Unknown ---\njust text\n");
    }

    #[test]
    fn record_removes_author_once() {
        let rec = MessageRecord::new(Some("Alice".into()), None, "Alice Alice wrote this");
        assert_eq!(rec.body, "Alice wrote this");
    }

    #[test]
    fn record_strips_author_word_inside_message() {
        let rec = MessageRecord::new(Some("Alice".into()), None, "Hi Alice, got it");
        assert_eq!(rec.body, "Hi , got it");
    }

    #[test]
    fn record_keeps_partial_overlap() {
        let rec = MessageRecord::new(Some("Bob Smith".into()), None, "Bob said hi");
        assert_eq!(rec.body, "Bob said hi");
    }

    #[test]
    fn timestamp_renders_as_suffix() {
        let rec = MessageRecord::new(
            Some("Alice".into()),
            Some("2024-01-01 10:00".into()),
            "Alice Hello",
        );
        assert_eq!(
            rec.render(1),
            "\n--- Message 1 from Alice - 2024-01-01 10:00 ---\nHello\n"
        );
    }

    #[test]
    fn header_falls_back_without_title() {
        let doc = TicketDocument::new(None);
        assert_eq!(doc.render(), "=== TICKET CONTENT ===\n");
    }

    #[test]
    fn empty_timeline_changes_nothing() {
        let mut plain = TicketDocument::new(Some("Outage"));
        let mut spliced = TicketDocument::new(Some("Outage")).with_timeline(Vec::<String>::new());
        let rec = MessageRecord::new(Some("Ops".into()), None, "Ops: rebooted");
        plain.push_message(&rec);
        spliced.push_message(&rec);
        assert_eq!(plain.render(), spliced.render());
    }

    #[test]
    fn timeline_sits_between_header_and_messages_in_order() {
        let mut doc = TicketDocument::new(Some("Outage"))
            .with_timeline(["Opened", "Assigned", "Closed"]);
        doc.push_message(&MessageRecord::new(Some("Ops".into()), None, "done"));

        assert_eq!(
            doc.render(),
            "=== TICKET: Outage ===\n\n=== TIMELINE ===\nOpened\nAssigned\nClosed\n\n\
             === MESSAGES ===\n\n--- Message 1 from Ops ---\ndone\n"
        );
    }

    #[test]
    fn raw_section_keeps_text_verbatim() {
        let mut doc = TicketDocument::new(None);
        doc.push_raw("line one\n   indented\n");
        assert_eq!(doc.message_count(), 0);
        assert_eq!(
            doc.render(),
            "=== TICKET CONTENT ===\n\n--- Raw Page Content ---\nline one\n   indented\n"
        );
    }
}
