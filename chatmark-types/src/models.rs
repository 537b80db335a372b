use serde::{Deserialize, Serialize};

/// A hyperlink found in a message, paired with the title of the page it points to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// HTTP or HTTPS URL exactly as it appeared in the message
    pub url: String,
    /// Title of the linked page, empty when it could not be determined
    pub title: String,
}

impl Link {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Entities extracted from a single chat message.
///
/// Mentions and emotions keep the order in which they appear in the message.
/// Links carry no ordering guarantee once more than one was found, so compare
/// them as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    /// Mentioned usernames, without the leading `@`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    /// Emotion tags, without the surrounding parentheses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl MessageInfo {
    /// True when the message contained no recognised entity at all
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty() && self.emotions.is_empty() && self.links.is_empty()
    }

    /// Decode a value previously produced by the JSON serializer
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Compare two results treating the link lists as unordered
    pub fn same_entities(&self, other: &MessageInfo) -> bool {
        if self.mentions != other.mentions || self.emotions != other.emotions {
            return false;
        }
        if self.links.len() != other.links.len() {
            return false;
        }
        let mut ours = self.links.clone();
        let mut theirs = other.links.clone();
        ours.sort_by(|a, b| (&a.url, &a.title).cmp(&(&b.url, &b.title)));
        theirs.sort_by(|a, b| (&a.url, &a.title).cmp(&(&b.url, &b.title)));
        ours == theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_are_omitted() {
        let info = MessageInfo::default();
        assert_eq!(serde_json::to_string(&info).unwrap(), "{}");

        let info = MessageInfo {
            mentions: vec!["alice".to_string()],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&info).unwrap(),
            r#"{"mentions":["alice"]}"#
        );
    }

    #[test]
    fn test_link_field_names() {
        let info = MessageInfo {
            links: vec![Link::new("http://x.test", "T")],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&info).unwrap(),
            r#"{"links":[{"url":"http://x.test","title":"T"}]}"#
        );
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let info = MessageInfo::from_json(r#"{"emotions":["fry"]}"#).unwrap();
        assert_eq!(info.emotions, vec!["fry"]);
        assert!(info.mentions.is_empty());
        assert!(info.links.is_empty());
        assert!(!info.is_empty());
        assert!(MessageInfo::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_same_entities_ignores_link_order() {
        let a = MessageInfo {
            links: vec![Link::new("http://a.test", "A"), Link::new("http://b.test", "B")],
            ..Default::default()
        };
        let b = MessageInfo {
            links: vec![Link::new("http://b.test", "B"), Link::new("http://a.test", "A")],
            ..Default::default()
        };
        assert!(a.same_entities(&b));
        assert_ne!(a, b);

        let c = MessageInfo {
            links: vec![Link::new("http://b.test", ""), Link::new("http://a.test", "A")],
            ..Default::default()
        };
        assert!(!a.same_entities(&c));
    }
}
