//! Canned capabilities for integrations that run in demo mode.
//!
//! Email, calendar, phone, research, client management, business intelligence
//! and productivity have no live backend. Each one picks a reply template by
//! substring triggers over the lowercased message (first match wins) and
//! interpolates the business context into `{business}`.

use async_trait::async_trait;
use tracing::debug;

use super::{Capability, CapabilityOutput, CapabilityRequest};
use crate::error::CapabilityError;

/// Placeholder replaced with the request's business context.
const BUSINESS_PLACEHOLDER: &str = "{business}";

pub const EMAIL_DEFAULT: &str = "I can help manage email for {business}: triaging your inbox, \
drafting replies, and flagging anything urgent. Email integration is running in demo mode, \
so connect your mail account to let me act on real messages.";

pub const CALENDAR_DEFAULT: &str = "I can help manage the calendar for {business}: scheduling \
meetings, finding open slots, and sending invites. Calendar integration is running in demo mode. \
Tell me who should attend, when, and for how long, and I'll prepare the event.";

pub const PHONE_DEFAULT: &str = "I can help with calls for {business}: placing follow-up calls, \
logging call notes, and preparing talking points. Phone integration is running in demo mode, \
so add your telephony credentials to place real calls.";

pub const RESEARCH_DEFAULT: &str = "I can research and analyze topics for {business}: competitors, \
market trends, and audience insights. Tell me what you want to know and how deep to go.";

pub const CLIENT_MANAGEMENT_DEFAULT: &str = "I can help manage clients and projects for {business}: \
status updates, deliverable tracking, and onboarding checklists. Which client or project should \
we look at?";

pub const BUSINESS_INTELLIGENCE_DEFAULT: &str = "I can put together business insights for \
{business}: revenue trends, pipeline health, and campaign performance. Which metrics matter \
most this week?";

pub const PRODUCTIVITY_DEFAULT: &str = "Let's make {business} more productive. I can help set \
goals, plan your week, and prioritize tasks. What's the most important outcome for today?";

/// Interpolate the business context into a template.
pub fn render(template: &str, business: &str) -> String {
    template.replace(BUSINESS_PLACEHOLDER, business)
}

/// A trigger-selected reply template.
#[derive(Debug, Clone, Copy)]
pub struct CannedReply {
    pub triggers: &'static [&'static str],
    pub template: &'static str,
}

/// Capability answering from a fixed set of templates.
#[derive(Debug, Clone)]
pub struct CannedCapability {
    name: &'static str,
    replies: Vec<CannedReply>,
    default: &'static str,
}

impl CannedCapability {
    pub fn new(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            replies: Vec::new(),
            default,
        }
    }

    /// Add a trigger-selected reply. Earlier replies take precedence.
    pub fn with_reply(mut self, triggers: &'static [&'static str], template: &'static str) -> Self {
        self.replies.push(CannedReply { triggers, template });
        self
    }

    /// Template selected for a message.
    pub fn select(&self, message: &str) -> &'static str {
        let lowered = message.to_lowercase();
        self.replies
            .iter()
            .find(|reply| reply.triggers.iter().any(|t| lowered.contains(t)))
            .map(|reply| reply.template)
            .unwrap_or(self.default)
    }
}

#[async_trait]
impl Capability for CannedCapability {
    fn name(&self) -> &str {
        self.name
    }

    async fn handle(
        &self,
        request: &CapabilityRequest<'_>,
    ) -> Result<CapabilityOutput, CapabilityError> {
        let template = self.select(request.message);
        debug!(
            capability = self.name,
            action = %request.intent.action,
            "Answering from canned template"
        );
        Ok(CapabilityOutput::Text(render(template, request.business())))
    }
}

pub fn email() -> CannedCapability {
    CannedCapability::new("email", EMAIL_DEFAULT)
        .with_reply(
            &["draft", "reply", "respond", "write"],
            "Here's a draft for {business}:\n\nHi,\n\nThanks for reaching out. I've reviewed your \
             message and will follow up with details shortly.\n\nBest regards\n\nWant me to adjust \
             the tone before it goes out?",
        )
        .with_reply(
            &["inbox", "unread", "summar"],
            "Inbox summary for {business}: 3 messages need a reply today, 2 are client updates, \
             and the rest are newsletters you can archive.",
        )
}

pub fn calendar() -> CannedCapability {
    CannedCapability::new("calendar", CALENDAR_DEFAULT)
        .with_reply(
            &["availability", "available", "free time", "open slot"],
            "Open slots for {business} this week: Tuesday 10:00-11:30, Wednesday 14:00-16:00, \
             and Friday 09:00-10:00.",
        )
        .with_reply(
            &["reschedule", "move my", "postpone"],
            "I can move that meeting for {business}. Which new time works, and should I notify \
             the attendees?",
        )
        .with_reply(
            &["remind"],
            "Reminder noted for {business}. I'll nudge you 15 minutes before it starts.",
        )
}

pub fn phone() -> CannedCapability {
    CannedCapability::new("phone", PHONE_DEFAULT)
        .with_reply(
            &["voicemail", "missed"],
            "You have 2 missed calls for {business}: one prospect and one existing client. \
             Want talking points for the callbacks?",
        )
        .with_reply(
            &["script", "talking point"],
            "Call outline for {business}: open with the goal of the call, confirm their current \
             priorities, present one clear next step, and agree on a follow-up date.",
        )
}

pub fn research() -> CannedCapability {
    CannedCapability::new("research", RESEARCH_DEFAULT)
        .with_reply(
            &["competitor"],
            "Competitor scan for {business}: I'd compare positioning, pricing, channel mix, and \
             recent launches for your top three competitors. Who should be on the list?",
        )
        .with_reply(
            &["trend", "market"],
            "Market trends relevant to {business}: rising demand for AI-assisted services, \
             shorter sales cycles for productized offers, and growth in short-form video.",
        )
}

pub fn client_management() -> CannedCapability {
    CannedCapability::new("client_management", CLIENT_MANAGEMENT_DEFAULT)
        .with_reply(
            &["onboard"],
            "Onboarding checklist for a new {business} client: kickoff call, access and \
             credentials, goals document, reporting cadence, and a 30-day review.",
        )
        .with_reply(
            &["status", "update", "progress"],
            "Project status for {business}: 4 active projects, 1 awaiting client feedback, and \
             1 due this week.",
        )
}

pub fn business_intelligence() -> CannedCapability {
    CannedCapability::new("business_intelligence", BUSINESS_INTELLIGENCE_DEFAULT)
        .with_reply(
            &["revenue", "sales", "profit"],
            "Revenue snapshot for {business}: recurring revenue is steady month over month, with \
             most new income coming from retainers.",
        )
        .with_reply(
            &["kpi", "metric", "dashboard", "report"],
            "KPI overview for {business}: lead volume, conversion rate, average deal size, and \
             client retention. Want a weekly report on these?",
        )
}

pub fn productivity() -> CannedCapability {
    CannedCapability::new("productivity", PRODUCTIVITY_DEFAULT)
        .with_reply(
            &["goal"],
            "Goal framework for {business}: pick one outcome for the quarter, break it into \
             weekly milestones, and review progress every Friday.",
        )
        .with_reply(
            &["focus", "prioriti", "todo", "to-do"],
            "Focus plan for {business}: block 2 hours of deep work each morning, batch email \
             twice a day, and keep a top-three list for every day.",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Category, Intent};

    async fn run(capability: &CannedCapability, message: &str, business: Option<&str>) -> String {
        let intent = Intent::new(Category::General, 0.7, "test");
        let context = serde_json::Value::Null;
        let request = CapabilityRequest {
            intent: &intent,
            message,
            business_context: business,
            context: &context,
        };
        match capability.handle(&request).await.unwrap() {
            CapabilityOutput::Text(text) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn calendar_default_for_plain_scheduling() {
        let text = run(&calendar(), "I need to schedule a call", None).await;
        assert_eq!(text, render(CALENDAR_DEFAULT, "your business"));
    }

    #[tokio::test]
    async fn triggers_select_specific_template() {
        let text = run(&calendar(), "What's my availability Tuesday?", Some("Acme")).await;
        assert!(text.starts_with("Open slots for Acme"));

        let text = run(&email(), "Draft a reply to Sam", Some("Acme")).await;
        assert!(text.contains("Here's a draft for Acme"));
    }

    #[tokio::test]
    async fn business_context_is_interpolated() {
        let text = run(&research(), "look into something", Some("Northwind")).await;
        assert!(text.contains("Northwind"));
        assert!(!text.contains("{business}"));
    }

    #[test]
    fn first_matching_reply_wins() {
        let capability = CannedCapability::new("t", "default")
            .with_reply(&["alpha"], "first")
            .with_reply(&["alpha", "beta"], "second");
        assert_eq!(capability.select("ALPHA beta"), "first");
        assert_eq!(capability.select("beta"), "second");
        assert_eq!(capability.select("gamma"), "default");
    }

    #[test]
    fn every_builder_has_a_name_and_default() {
        let all = [
            email(),
            calendar(),
            phone(),
            research(),
            client_management(),
            business_intelligence(),
            productivity(),
        ];
        for capability in &all {
            assert!(!capability.name().is_empty());
            assert!(capability.select("zzz").contains("{business}"));
        }
    }
}
