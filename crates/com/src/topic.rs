//! Topic names and MQTT-style topic filters.
//!
//! Levels are separated by `/`. In a filter, `+` matches exactly one level
//! and `#` (last level only) matches the parent level and everything below.

/// Check a concrete topic name used for publishing.
pub fn validate_topic(topic: &str) -> Result<(), String> {
    if topic.is_empty() {
        return Err("topic is empty".to_string());
    }
    if topic.contains(['+', '#']) {
        return Err(format!("topic {topic:?} contains a wildcard"));
    }
    Ok(())
}

/// Check a subscription filter.
pub fn validate_filter(filter: &str) -> Result<(), String> {
    if filter.is_empty() {
        return Err("topic filter is empty".to_string());
    }
    let levels: Vec<&str> = filter.split('/').collect();
    for (i, level) in levels.iter().enumerate() {
        if level.contains('#') && (*level != "#" || i != levels.len() - 1) {
            return Err(format!("{filter:?}: '#' must be the whole last level"));
        }
        if level.contains('+') && *level != "+" {
            return Err(format!("{filter:?}: '+' must be a whole level"));
        }
    }
    Ok(())
}

/// Whether `topic` is selected by `filter`.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');
    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(topic_matches("webcam/stream", "webcam/stream"));
        assert!(!topic_matches("webcam/stream", "webcam/hand_status"));
        assert!(!topic_matches("webcam", "webcam/stream"));
        assert!(!topic_matches("webcam/stream/x", "webcam/stream"));
    }

    #[test]
    fn test_single_level_wildcard() {
        assert!(topic_matches("webcam/+", "webcam/stream"));
        assert!(topic_matches("+/stream", "webcam/stream"));
        assert!(!topic_matches("webcam/+", "webcam"));
        assert!(!topic_matches("webcam/+", "webcam/a/b"));
    }

    #[test]
    fn test_multi_level_wildcard() {
        assert!(topic_matches("#", "webcam/stream"));
        assert!(topic_matches("webcam/#", "webcam/stream"));
        assert!(topic_matches("webcam/#", "webcam/a/b"));
        assert!(topic_matches("webcam/#", "webcam"));
        assert!(!topic_matches("webcam/#", "other/stream"));
    }

    #[test]
    fn test_validate() {
        assert!(validate_topic("webcam/stream").is_ok());
        assert!(validate_topic("").is_err());
        assert!(validate_topic("webcam/+").is_err());
        assert!(validate_filter("webcam/+/x").is_ok());
        assert!(validate_filter("webcam/#").is_ok());
        assert!(validate_filter("webcam/#/x").is_err());
        assert!(validate_filter("webcam/a+").is_err());
        assert!(validate_filter("webcam#").is_err());
    }
}
