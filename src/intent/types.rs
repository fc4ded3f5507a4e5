//! Intent model shared by both classifier tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Business-domain category an incoming request is routed on.
///
/// `Prompts` and `Content` are two spellings of the content-generation
/// category; the registry binds both to the same capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Email,
    Calendar,
    Phone,
    Research,
    Social,
    ClientManagement,
    BusinessIntelligence,
    Productivity,
    Prompts,
    Content,
    General,
}

impl Category {
    /// Every category, in taxonomy order.
    pub const ALL: [Category; 11] = [
        Self::Email,
        Self::Calendar,
        Self::Phone,
        Self::Research,
        Self::Social,
        Self::ClientManagement,
        Self::BusinessIntelligence,
        Self::Productivity,
        Self::Prompts,
        Self::Content,
        Self::General,
    ];

    /// Wire label (snake_case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Calendar => "calendar",
            Self::Phone => "phone",
            Self::Research => "research",
            Self::Social => "social",
            Self::ClientManagement => "client_management",
            Self::BusinessIntelligence => "business_intelligence",
            Self::Productivity => "productivity",
            Self::Prompts => "prompts",
            Self::Content => "content",
            Self::General => "general",
        }
    }

    /// Parse a wire label, tolerating case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the business a request belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Business {
    /// The marketing agency.
    Agency,
    /// The AI automation consultancy.
    Ai,
    #[default]
    Both,
    /// Work delivered for a specific client.
    Client,
}

impl Business {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agency => "agency",
            Self::Ai => "ai",
            Self::Both => "both",
            Self::Client => "client",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "agency" => Some(Self::Agency),
            "ai" => Some(Self::Ai),
            "both" => Some(Self::Both),
            "client" => Some(Self::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Action label used whenever nothing more specific is known.
pub const GENERAL_ASSISTANCE: &str = "general_assistance";

/// Structured classification result that drives dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub category: Category,
    /// Always within `[0.0, 1.0]`.
    pub confidence: f32,
    pub action: String,
    pub business: Business,
    pub priority: Priority,
}

impl Intent {
    /// Build an intent, clamping confidence into `[0, 1]`.
    pub fn new(category: Category, confidence: f32, action: impl Into<String>) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            category,
            confidence,
            action: action.into(),
            business: Business::Both,
            priority: Priority::Medium,
        }
    }

    pub fn with_business(mut self, business: Business) -> Self {
        self.business = business;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Low-confidence stand-in returned when remote classification fails.
    pub fn degraded() -> Self {
        Self::new(Category::General, 0.5, GENERAL_ASSISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip_through_parse() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("  Client_Management "), Some(Category::ClientManagement));
        assert_eq!(Category::parse("marketing"), None);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_value(Category::BusinessIntelligence).unwrap();
        assert_eq!(json, "business_intelligence");
    }

    #[test]
    fn intent_clamps_confidence() {
        assert_eq!(Intent::new(Category::Email, 1.7, "x").confidence, 1.0);
        assert_eq!(Intent::new(Category::Email, -0.2, "x").confidence, 0.0);
        assert_eq!(Intent::new(Category::Email, f32::NAN, "x").confidence, 0.0);
    }

    #[test]
    fn degraded_intent_shape() {
        let intent = Intent::degraded();
        assert_eq!(intent.category, Category::General);
        assert_eq!(intent.confidence, 0.5);
        assert_eq!(intent.action, "general_assistance");
        assert_eq!(intent.business, Business::Both);
        assert_eq!(intent.priority, Priority::Medium);
    }

    #[test]
    fn intent_serialization() {
        let intent = Intent::new(Category::Calendar, 0.9, "book_meeting")
            .with_business(Business::Agency)
            .with_priority(Priority::Urgent);
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["category"], "calendar");
        assert_eq!(json["business"], "agency");
        assert_eq!(json["priority"], "urgent");
        assert_eq!(json["action"], "book_meeting");
    }
}
