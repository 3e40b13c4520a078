//! Canned reply shown when the backend cannot be reached.

/// Offline reply for `message`, picked by keyword.
pub fn fallback_reply(message: &str) -> &'static str {
    if message.trim().is_empty() {
        return "Say something!";
    }
    let lower = message.to_lowercase();
    if lower.contains("hello") {
        "Hi there! How can I help today?"
    } else if lower.contains("weather") {
        "It’s always sunny in AIVY land ☀️"
    } else if lower.contains("bye") {
        "Goodbye! Come back soon 👋"
    } else {
        "This is a dummy AI response. Soon this will be replaced by a real model 🤖."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(fallback_reply("Hello AIVY"), "Hi there! How can I help today?");
        assert_eq!(
            fallback_reply("what's the WEATHER like"),
            "It’s always sunny in AIVY land ☀️"
        );
        assert_eq!(fallback_reply("ok bye"), "Goodbye! Come back soon 👋");
    }

    #[test]
    fn test_first_keyword_wins() {
        assert_eq!(
            fallback_reply("hello, bye"),
            "Hi there! How can I help today?"
        );
    }

    #[test]
    fn test_empty_and_default() {
        assert_eq!(fallback_reply("   "), "Say something!");
        assert!(fallback_reply("explain mitosis").starts_with("This is a dummy AI response"));
    }
}
