//! AI task enhancement with a rule-based fallback.
//!
//! [`AiDelegate::enhance`] sends the raw task text and the user's
//! scheduling preferences to the completion API and merges the reply into
//! the parser's drafts. The primary model gets one attempt, the fallback
//! model one more. Every failure mode (no key, network, HTTP status,
//! timeout, unparseable reply) ends in a [`DelegateOutcome`] carrying the
//! untouched rule-based drafts and a [`Provenance::RuleBased`] reason; the
//! caller never sees an error from this path.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use starcrunch_core::{
    defaults, Error, GenerationBackend, PreferredPeriod, Result, TaskCategory, TaskDraft,
    TaskPriority, UserPreferences,
};

use crate::config::AiConfig;
use crate::openai::OpenAIBackend;

/// System prompt for the primary model.
pub const PRIMARY_SYSTEM_PROMPT: &str = "You are Starcrunch, a friendly dinosaur astronaut \
who helps people with ADHD schedule their tasks. Be encouraging and keep the advice practical.";

/// Shorter system prompt for the fallback model.
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are Starcrunch, a helpful task scheduling assistant.";

/// Where the final drafts came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Drafts were enhanced by this model.
    Ai { model: String },
    /// Drafts are the parser/categorizer output.
    RuleBased { reason: String },
}

impl Provenance {
    pub fn is_ai(&self) -> bool {
        matches!(self, Provenance::Ai { .. })
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Ai { model } => write!(f, "AI ({})", model),
            Provenance::RuleBased { reason } => write!(f, "rule-based ({})", reason),
        }
    }
}

/// Result of [`AiDelegate::enhance`].
#[derive(Debug, Clone)]
pub struct DelegateOutcome {
    pub drafts: Vec<TaskDraft>,
    pub provenance: Provenance,
    /// General advice for the whole batch.
    pub overall_suggestions: Vec<String>,
    pub motivation: Option<String>,
}

impl DelegateOutcome {
    fn rule_based(drafts: Vec<TaskDraft>, reason: impl Into<String>) -> Self {
        Self {
            drafts,
            provenance: Provenance::RuleBased {
                reason: reason.into(),
            },
            overall_suggestions: Vec::new(),
            motivation: None,
        }
    }
}

/// Calls the completion API on behalf of the planner.
#[derive(Clone)]
pub struct AiDelegate {
    primary: Option<Arc<dyn GenerationBackend>>,
    fallback: Option<Arc<dyn GenerationBackend>>,
    timeout: Duration,
}

impl AiDelegate {
    /// A delegate that always answers rule-based.
    pub fn disabled() -> Self {
        Self {
            primary: None,
            fallback: None,
            timeout: Duration::from_secs(defaults::AI_TIMEOUT_SECS),
        }
    }

    pub fn new(
        primary: Arc<dyn GenerationBackend>,
        fallback: Option<Arc<dyn GenerationBackend>>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary: Some(primary),
            fallback,
            timeout,
        }
    }

    /// Build the Groq-backed delegate, or a disabled one when no key is set.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        if !config.is_enabled() {
            info!(
                subsystem = "inference",
                component = "delegate",
                "No GROQ_API_KEY configured, using rule-based scheduling only"
            );
            return Ok(Self::disabled());
        }
        config.validate()?;

        let primary = OpenAIBackend::new(config.backend_config())?;
        let fallback: Option<Arc<dyn GenerationBackend>> = if config.fallback_model != config.model {
            Some(Arc::new(primary.with_model(config.fallback_model.clone())))
        } else {
            None
        };

        Ok(Self::new(
            Arc::new(primary),
            fallback,
            Duration::from_secs(config.timeout_seconds),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.primary.is_some()
    }

    /// Enhance parsed drafts. Never fails.
    pub async fn enhance(
        &self,
        tasks_text: &str,
        drafts: Vec<TaskDraft>,
        prefs: &UserPreferences,
    ) -> DelegateOutcome {
        let Some(primary) = self.primary.as_ref() else {
            debug!(
                subsystem = "inference",
                component = "delegate",
                "AI disabled, keeping rule-based drafts"
            );
            return DelegateOutcome::rule_based(drafts, "No AI client configured");
        };
        if drafts.is_empty() {
            return DelegateOutcome::rule_based(drafts, "No tasks to enhance");
        }

        let prompt = build_prompt(tasks_text, prefs);

        let primary_error = match self.attempt(primary.as_ref(), PRIMARY_SYSTEM_PROMPT, &prompt).await {
            Ok(analysis) => return merge(drafts, analysis, primary.model_name()),
            Err(e) => e,
        };

        let Some(fallback) = self.fallback.as_ref() else {
            warn!(
                subsystem = "inference",
                component = "delegate",
                model = primary.model_name(),
                error = %primary_error,
                fallback_reason = "primary_failed",
                "AI scheduling failed, using rule-based scheduling"
            );
            return DelegateOutcome::rule_based(drafts, format!("AI error: {}", primary_error));
        };

        warn!(
            subsystem = "inference",
            component = "delegate",
            model = primary.model_name(),
            fallback_model = fallback.model_name(),
            error = %primary_error,
            "Primary model failed, retrying with fallback model"
        );

        match self.attempt(fallback.as_ref(), FALLBACK_SYSTEM_PROMPT, &prompt).await {
            Ok(analysis) => merge(drafts, analysis, fallback.model_name()),
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "delegate",
                    model = fallback.model_name(),
                    error = %e,
                    fallback_reason = "fallback_failed",
                    "Fallback model also failed, using rule-based scheduling"
                );
                DelegateOutcome::rule_based(drafts, format!("AI error: {}", e))
            }
        }
    }

    /// One bounded call plus reply parsing.
    async fn attempt(
        &self,
        backend: &dyn GenerationBackend,
        system: &str,
        prompt: &str,
    ) -> Result<AiAnalysis> {
        let start = Instant::now();
        let reply = tokio::time::timeout(self.timeout, backend.generate_with_system(system, prompt))
            .await
            .map_err(|_| {
                Error::Inference(format!(
                    "{} timed out after {}ms",
                    backend.model_name(),
                    self.timeout.as_millis()
                ))
            })??;

        let analysis = parse_analysis(&reply)?;
        debug!(
            subsystem = "inference",
            component = "delegate",
            model = backend.model_name(),
            response_len = reply.len(),
            result_count = analysis.tasks.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "AI reply parsed"
        );
        Ok(analysis)
    }
}

/// Render the user prompt sent to the model.
pub fn build_prompt(tasks_text: &str, prefs: &UserPreferences) -> String {
    let excluded = if prefs.excluded_times.is_empty() {
        "None specified".to_string()
    } else {
        prefs
            .excluded_times
            .iter()
            .map(|e| format!("{} {}", e.day, e.time_range))
            .collect::<Vec<_>>()
            .join("; ")
    };
    let durations = prefs
        .task_durations
        .iter()
        .map(|(category, minutes)| format!("{} {} min", category, minutes))
        .collect::<Vec<_>>()
        .join(", ");
    let periods = prefs
        .preferred_task_times
        .iter()
        .map(|(category, period)| format!("{} {}", category, period.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"I need help scheduling these tasks for a space explorer with ADHD.

TASKS TO SCHEDULE: "{tasks_text}"

USER PREFERENCES:
- Excluded times: {excluded}
- Task durations: {durations}
- Preferred times: {periods}

For each task, in the order given, provide:
1. Category (appointment, cleaning, errand, work, personal, generic)
2. Priority (high, medium, low) based on urgency words
3. A realistic duration in minutes
4. The best time period (morning, afternoon, evening, weekend, any)
5. Two or three ADHD-friendly tips for getting it done

Respond with JSON only:
{{
  "tasks": [
    {{
      "text": "original task text",
      "category": "category",
      "priority": "priority",
      "duration": 30,
      "optimal_time": "morning",
      "adhd_tips": ["tip 1", "tip 2"],
      "energy_level": "high|medium|low"
    }}
  ],
  "overall_suggestions": ["general scheduling advice"],
  "motivation": "a short encouraging message"
}}"#
    )
}

/// The outermost `{ ... }` span of a model reply.
pub fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

#[derive(Debug, Default, Deserialize)]
struct AiAnalysis {
    #[serde(default)]
    tasks: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    overall_suggestions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    motivation: Option<String>,
}

/// One task entry. Every field tolerates wrong types.
#[derive(Debug, Default, Deserialize)]
struct AiTask {
    #[serde(default, deserialize_with = "lenient")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    priority: Option<String>,
    #[serde(default)]
    duration: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    optimal_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    adhd_tips: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    energy_level: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn parse_analysis(reply: &str) -> Result<AiAnalysis> {
    let json = extract_json(reply)
        .ok_or_else(|| Error::Inference("AI reply contained no JSON object".to_string()))?;
    let analysis: AiAnalysis = serde_json::from_str(json)
        .map_err(|e| Error::Inference(format!("Malformed AI reply: {}", e)))?;
    if analysis.tasks.is_empty() {
        return Err(Error::Inference("AI reply contained no tasks".to_string()));
    }
    Ok(analysis)
}

/// Minutes from a number or a string like "30 minutes". Non-positive values
/// are rejected; the rest are clamped into the accepted task range.
fn duration_minutes(value: &serde_json::Value) -> Option<u32> {
    let minutes = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if !minutes.is_finite() || minutes < 1.0 {
        return None;
    }
    let minutes = minutes.round().min(defaults::MAX_TASK_DURATION as f64) as u32;
    Some(minutes.max(defaults::MIN_TASK_DURATION))
}

/// First word of a period suggestion, e.g. "morning (before 10am)".
fn period_of(text: &str) -> Option<PreferredPeriod> {
    let word = text
        .trim()
        .split(|c: char| !c.is_ascii_alphabetic())
        .find(|w| !w.is_empty())?;
    word.parse().ok()
}

fn energy_of(text: &str) -> Option<String> {
    let level = text.trim().to_lowercase();
    matches!(level.as_str(), "high" | "medium" | "low").then_some(level)
}

fn apply(draft: &mut TaskDraft, ai: AiTask) {
    if let Some(category) = ai.category.and_then(|s| s.parse::<TaskCategory>().ok()) {
        draft.category = category;
    }
    if let Some(priority) = ai.priority.and_then(|s| s.parse::<TaskPriority>().ok()) {
        draft.priority = priority;
    }
    if let Some(minutes) = ai.duration.as_ref().and_then(duration_minutes) {
        draft.duration = Some(minutes);
    }
    if let Some(period) = ai.optimal_time.as_deref().and_then(period_of) {
        draft.preferred_time = Some(period);
    }
    let tips: Vec<String> = ai
        .adhd_tips
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if !tips.is_empty() {
        draft.adhd_tips = tips;
    }
    if let Some(level) = ai.energy_level.as_deref().and_then(energy_of) {
        draft.energy_level = Some(level);
    }
    draft.ai_enhanced = true;
}

/// Merge positionally: the i-th AI entry enhances the i-th draft.
fn merge(drafts: Vec<TaskDraft>, analysis: AiAnalysis, model: &str) -> DelegateOutcome {
    let mut entries = analysis.tasks.into_iter();
    let mut enhanced = 0usize;
    let drafts: Vec<TaskDraft> = drafts
        .into_iter()
        .map(|mut draft| {
            let entry = entries
                .next()
                .and_then(|v| serde_json::from_value::<AiTask>(v).ok());
            if let Some(ai) = entry {
                apply(&mut draft, ai);
                enhanced += 1;
            }
            draft
        })
        .collect();

    info!(
        subsystem = "inference",
        component = "delegate",
        model,
        task_count = drafts.len(),
        enhanced,
        "Tasks enhanced by AI"
    );

    DelegateOutcome {
        drafts,
        provenance: Provenance::Ai {
            model: model.to_string(),
        },
        overall_suggestions: analysis.overall_suggestions.unwrap_or_default(),
        motivation: analysis.motivation.filter(|m| !m.trim().is_empty()),
    }
}
