//! Event formatting for terminal display.

use chrono::DateTime;

use crate::domain::ServerEvent;

/// Renders incoming events for the terminal
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any server event as one display line.
    pub fn format_event(event: &ServerEvent, current_username: &str) -> String {
        match event {
            ServerEvent::Text {
                content,
                username,
                timestamp,
            } => Self::format_text(username, content, *timestamp, current_username),
            ServerEvent::Image {
                content,
                username,
                timestamp,
            } => Self::format_image(username, content, *timestamp),
            ServerEvent::UserCount { count } => Self::format_user_count(*count),
            ServerEvent::UserJoined { username } => Self::format_user_joined(username),
            ServerEvent::UserLeft { username } => Self::format_user_left(username),
        }
    }

    pub fn format_text(
        username: &str,
        content: &str,
        timestamp: i64,
        current_username: &str,
    ) -> String {
        let me_suffix = if username == current_username {
            " (me)"
        } else {
            ""
        };
        format!(
            "\n[{}] {}{}: {}\n",
            Self::format_clock(timestamp),
            username,
            me_suffix,
            content
        )
    }

    pub fn format_image(username: &str, url: &str, timestamp: i64) -> String {
        format!(
            "\n[{}] {} sent an image: {}\n",
            Self::format_clock(timestamp),
            username,
            url
        )
    }

    pub fn format_user_count(count: usize) -> String {
        let noun = if count == 1 { "user" } else { "users" };
        format!("\n* {count} {noun} online\n")
    }

    pub fn format_user_joined(username: &str) -> String {
        format!("\n+ {username} joined\n")
    }

    pub fn format_user_left(username: &str) -> String {
        format!("\n- {username} left\n")
    }

    /// Fallback for frames that do not parse as a known event
    pub fn format_raw(text: &str) -> String {
        format!("\n{text}\n")
    }

    fn format_clock(timestamp_millis: i64) -> String {
        DateTime::from_timestamp_millis(timestamp_millis)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "??:??:??".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_from_someone_else_shows_their_name() {
        // given:
        let event = ServerEvent::Text {
            content: "hi".to_string(),
            username: "alice".to_string(),
            timestamp: 0,
        };

        // when:
        let line = MessageFormatter::format_event(&event, "bob");

        // then:
        assert!(line.contains("alice: hi"));
        assert!(!line.contains("(me)"));
    }

    #[test]
    fn test_own_text_is_marked() {
        let event = ServerEvent::Text {
            content: "hi".to_string(),
            username: "alice".to_string(),
            timestamp: 0,
        };
        let line = MessageFormatter::format_event(&event, "alice");
        assert!(line.contains("alice (me): hi"));
    }

    #[test]
    fn test_user_count_pluralizes() {
        assert!(MessageFormatter::format_user_count(1).contains("1 user online"));
        assert!(MessageFormatter::format_user_count(3).contains("3 users online"));
    }

    #[test]
    fn test_presence_lines() {
        assert!(MessageFormatter::format_user_joined("alice").contains("+ alice joined"));
        assert!(MessageFormatter::format_user_left("bob").contains("- bob left"));
    }

    #[test]
    fn test_image_line_shows_the_url() {
        let line = MessageFormatter::format_image("alice", "/uploads/cat.png", 0);
        assert!(line.contains("alice sent an image: /uploads/cat.png"));
    }
}
