//! Voyage narratives
//!
//! [`LlmNarrator`] asks a chat model for a short status paragraph;
//! [`TemplateNarrator`] produces a fixed sentence and never fails.

use std::sync::Arc;

use async_trait::async_trait;
use llm::{ChatMessage, ChatModel, ChatRequest, LlmError};
use serde::Serialize;

use super::VoyageProgress;
use crate::db::models::{Port, Vessel};

const SYSTEM_PROMPT: &str = "You are a maritime operations analyst for an oil-trading desk. \
Write two or three factual sentences on a tanker's voyage status for a broker. \
Use only the figures provided and do not invent cargo, incidents or weather.";

/// Facts handed to a narrator
#[derive(Debug, Clone, Serialize)]
pub struct VoyageContext {
    pub vessel_name: String,
    pub vessel_type: String,
    pub cargo_type: Option<String>,
    pub departure_port: Option<String>,
    pub destination_port: Option<String>,
    pub percent: f64,
    pub distance_remaining_km: Option<f64>,
    pub speed_knots: f64,
    pub eta: Option<String>,
}

impl VoyageContext {
    pub fn new(
        vessel: &Vessel,
        departure_port: Option<&Port>,
        destination_port: Option<&Port>,
        progress: &VoyageProgress,
    ) -> Self {
        Self {
            vessel_name: vessel.name.clone(),
            vessel_type: vessel.vessel_type.clone(),
            cargo_type: vessel.cargo_type.clone(),
            departure_port: departure_port.map(|p| p.name.clone()),
            destination_port: destination_port.map(|p| p.name.clone()),
            percent: progress.percent,
            distance_remaining_km: progress.distance_remaining_km,
            speed_knots: vessel.speed_knots,
            eta: progress.eta.clone(),
        }
    }

    fn prompt(&self) -> String {
        let mut lines = vec![
            format!("Vessel: {} ({})", self.vessel_name, self.vessel_type),
            format!("Progress: {:.0}%", self.percent),
            format!("Speed: {:.1} knots", self.speed_knots),
        ];
        if let Some(cargo) = &self.cargo_type {
            lines.push(format!("Cargo: {}", cargo));
        }
        if let Some(from) = &self.departure_port {
            lines.push(format!("From: {}", from));
        }
        if let Some(to) = &self.destination_port {
            lines.push(format!("To: {}", to));
        }
        if let Some(km) = self.distance_remaining_km {
            lines.push(format!("Remaining distance: {:.0} km", km));
        }
        if let Some(eta) = &self.eta {
            lines.push(format!("ETA: {}", eta));
        }
        lines.join("\n")
    }
}

/// Writes a human-readable voyage summary
#[async_trait]
pub trait VoyageNarrator: Send + Sync {
    async fn narrate(&self, context: &VoyageContext) -> Result<String, LlmError>;

    /// Identifier for logs
    fn name(&self) -> &str;
}

/// Narrator backed by a chat model
pub struct LlmNarrator {
    model: Arc<dyn ChatModel>,
}

impl LlmNarrator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl VoyageNarrator for LlmNarrator {
    async fn narrate(&self, context: &VoyageContext) -> Result<String, LlmError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(context.prompt()),
        ])
        .with_temperature(0.4)
        .with_max_tokens(200);

        let response = self.model.chat(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(LlmError::InvalidResponse("empty narrative".to_string()));
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        self.model.model_name()
    }
}

/// Deterministic narrator used when no model is configured or the model fails
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn render(context: &VoyageContext) -> String {
        let route = match (&context.departure_port, &context.destination_port) {
            (Some(from), Some(to)) => format!(" from {} to {}", from, to),
            (None, Some(to)) => format!(" bound for {}", to),
            (Some(from), None) => format!(" out of {}", from),
            (None, None) => String::new(),
        };
        let cargo = context
            .cargo_type
            .as_deref()
            .map(|c| format!(" carrying {}", c))
            .unwrap_or_default();

        let mut text = format!(
            "{} ({}){}{} is {:.0}% through its voyage at {:.1} knots.",
            context.vessel_name,
            context.vessel_type,
            cargo,
            route,
            context.percent,
            context.speed_knots
        );
        if let Some(km) = context.distance_remaining_km {
            text.push_str(&format!(" About {:.0} km remain", km));
            match &context.eta {
                Some(eta) => text.push_str(&format!(", ETA {}.", eta)),
                None => text.push('.'),
            }
        }
        text
    }
}

#[async_trait]
impl VoyageNarrator for TemplateNarrator {
    async fn narrate(&self, context: &VoyageContext) -> Result<String, LlmError> {
        Ok(Self::render(context))
    }

    fn name(&self) -> &str {
        "template"
    }
}

/// Narrate with `narrator`, falling back to the template on failure
///
/// Rejected credentials log at error level, other failures at warn.
pub async fn narrate_or_template(
    narrator: Option<&dyn VoyageNarrator>,
    context: &VoyageContext,
) -> String {
    let Some(narrator) = narrator else {
        return TemplateNarrator::render(context);
    };
    match narrator.narrate(context).await {
        Ok(text) => text,
        Err(e) if e.is_auth_error() => {
            tracing::error!(
                vessel = %context.vessel_name,
                narrator = narrator.name(),
                "Narrator credentials rejected, using template: {}",
                e
            );
            TemplateNarrator::render(context)
        }
        Err(e) => {
            tracing::warn!(
                vessel = %context.vessel_name,
                narrator = narrator.name(),
                "Narrative generation failed, using template: {}",
                e
            );
            TemplateNarrator::render(context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm::ChatResponse;
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: Result<String, String>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(ChatResponse {
                    content: text.clone(),
                    model: "scripted".to_string(),
                    finish_reason: Some("stop".to_string()),
                    usage: None,
                }),
                Err(msg) => Err(LlmError::ProviderError(msg.clone())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn context() -> VoyageContext {
        VoyageContext {
            vessel_name: "Aegean Star".to_string(),
            vessel_type: "VLCC".to_string(),
            cargo_type: Some("Arab Light".to_string()),
            departure_port: Some("Ras Tanura".to_string()),
            destination_port: Some("Singapore".to_string()),
            percent: 42.0,
            distance_remaining_km: Some(3900.0),
            speed_knots: 13.5,
            eta: None,
        }
    }

    #[tokio::test]
    async fn test_llm_narrator_sends_facts() {
        let model = Arc::new(ScriptedModel {
            reply: Ok("  On schedule.  ".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let narrator = LlmNarrator::new(model.clone());

        let text = narrator.narrate(&context()).await.unwrap();
        assert_eq!(text, "On schedule.");
        assert_eq!(narrator.name(), "scripted");

        let seen = model.seen.lock().unwrap();
        let prompt = &seen[0].messages[1].content;
        assert!(prompt.contains("Aegean Star"));
        assert!(prompt.contains("Progress: 42%"));
        assert!(prompt.contains("To: Singapore"));
    }

    #[tokio::test]
    async fn test_llm_narrator_propagates_failure() {
        let narrator = LlmNarrator::new(Arc::new(ScriptedModel {
            reply: Err("boom".to_string()),
            seen: Mutex::new(Vec::new()),
        }));
        assert!(narrator.narrate(&context()).await.is_err());
    }

    #[tokio::test]
    async fn test_llm_narrator_rejects_blank_reply() {
        let narrator = LlmNarrator::new(Arc::new(ScriptedModel {
            reply: Ok("   ".to_string()),
            seen: Mutex::new(Vec::new()),
        }));
        let err = narrator.narrate(&context()).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    struct RejectedKeyNarrator;

    #[async_trait]
    impl VoyageNarrator for RejectedKeyNarrator {
        async fn narrate(&self, _context: &VoyageContext) -> Result<String, LlmError> {
            Err(LlmError::AuthenticationError("invalid key".to_string()))
        }

        fn name(&self) -> &str {
            "rejected"
        }
    }

    #[tokio::test]
    async fn test_narrate_or_template_falls_back() {
        let expected = TemplateNarrator::render(&context());

        assert_eq!(narrate_or_template(None, &context()).await, expected);
        assert_eq!(narrate_or_template(Some(&RejectedKeyNarrator), &context()).await, expected);

        let failing = LlmNarrator::new(Arc::new(ScriptedModel {
            reply: Err("boom".to_string()),
            seen: Mutex::new(Vec::new()),
        }));
        assert_eq!(narrate_or_template(Some(&failing), &context()).await, expected);

        let working = LlmNarrator::new(Arc::new(ScriptedModel {
            reply: Ok("On schedule.".to_string()),
            seen: Mutex::new(Vec::new()),
        }));
        assert_eq!(narrate_or_template(Some(&working), &context()).await, "On schedule.");
    }

    #[tokio::test]
    async fn test_template_narrator() {
        let text = TemplateNarrator.narrate(&context()).await.unwrap();
        assert_eq!(
            text,
            "Aegean Star (VLCC) carrying Arab Light from Ras Tanura to Singapore is 42% \
             through its voyage at 13.5 knots. About 3900 km remain."
        );
    }
}
