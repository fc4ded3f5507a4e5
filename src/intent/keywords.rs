//! Keyword classifier: the offline tier.
//!
//! Used when the text-generation service is not configured. Case-insensitive
//! substring search over an ordered rule list; the first rule with any
//! matching keyword wins. Rule order is a contract: "schedule a call" is a
//! calendar request because the calendar rule precedes the phone rule.

use async_trait::async_trait;
use tracing::debug;

use super::types::{Category, GENERAL_ASSISTANCE, Intent};
use super::IntentClassifier;
use crate::error::ClassifyError;

/// Confidence assigned to any keyword hit.
pub const KEYWORD_MATCH_CONFIDENCE: f32 = 0.7;

/// Confidence assigned when no keyword matches.
pub const NO_MATCH_CONFIDENCE: f32 = 0.6;

/// A single keyword rule.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub category: Category,
    pub action: &'static str,
}

/// Rules in precedence order.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["email"],
        category: Category::Email,
        action: "email_management",
    },
    KeywordRule {
        keywords: &["calendar", "schedule"],
        category: Category::Calendar,
        action: "schedule_management",
    },
    KeywordRule {
        keywords: &["call", "phone"],
        category: Category::Phone,
        action: "call_management",
    },
    KeywordRule {
        keywords: &["research", "analyze"],
        category: Category::Research,
        action: "research_analysis",
    },
    KeywordRule {
        keywords: &["social", "content"],
        category: Category::Social,
        action: "social_media_management",
    },
    KeywordRule {
        keywords: &["client", "project"],
        category: Category::ClientManagement,
        action: "client_management",
    },
    KeywordRule {
        keywords: &["prompt", "generate"],
        category: Category::Prompts,
        action: "prompt_generation",
    },
    KeywordRule {
        keywords: &["productive", "goal"],
        category: Category::Productivity,
        action: "productivity_optimization",
    },
];

/// Deterministic, side-effect-free keyword classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message. Never fails.
    pub fn classify(&self, message: &str) -> Intent {
        let lowered = message.to_lowercase();

        for rule in KEYWORD_RULES {
            if let Some(keyword) = rule.keywords.iter().find(|k| lowered.contains(*k)) {
                debug!(
                    keyword = %keyword,
                    category = %rule.category,
                    "Keyword rule matched"
                );
                return Intent::new(rule.category, KEYWORD_MATCH_CONFIDENCE, rule.action);
            }
        }

        Intent::new(Category::General, NO_MATCH_CONFIDENCE, GENERAL_ASSISTANCE)
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(
        &self,
        message: &str,
        _context: &serde_json::Value,
    ) -> Result<Intent, ClassifyError> {
        Ok(KeywordClassifier::classify(self, message))
    }
}
