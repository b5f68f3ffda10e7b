// SYNOID Correction Store - Learned Rule Memory
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Append-only log of user corrections plus the "validated rules" projection
// derived from them. The whole document is read, modified and written back
// on every mutation.
//
// Single-writer only: two processes recording corrections against the same
// backend will lose updates (last writer wins). Hosts that share a store must
// serialize access themselves.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::motion::keys::{element_key, transition_key};
use crate::motion::spec::Size;

pub const DOCUMENT_VERSION: &str = "1.0";

pub type ParamBag = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Crop,
    TransitionType,
    Timing,
    CompoundScaling,
    Positioning,
    Typography,
    Color,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// Element the correction was about; keys size-specific rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementContext {
    #[serde(rename = "type")]
    pub element_type: String,
    pub width: u32,
    pub height: u32,
}

impl ElementContext {
    pub fn new(element_type: &str, width: u32, height: u32) -> Self {
        Self {
            element_type: element_type.to_string(),
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Caller-supplied fields of a correction; identity and time are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCorrection {
    pub issue_type: IssueType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub original_params: ParamBag,
    #[serde(default)]
    pub corrected_params: ParamBag,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub element_context: Option<ElementContext>,
}

impl NewCorrection {
    pub fn new(issue_type: IssueType, description: &str) -> Self {
        Self {
            issue_type,
            description: description.to_string(),
            original_params: ParamBag::new(),
            corrected_params: ParamBag::new(),
            confidence: Confidence::default(),
            element_context: None,
        }
    }

    pub fn original(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.original_params.insert(key.to_string(), value.into());
        self
    }

    pub fn corrected(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.corrected_params.insert(key.to_string(), value.into());
        self
    }

    pub fn on_element(mut self, context: ElementContext) -> Self {
        self.element_context = Some(context);
        self
    }
}

/// An immutable, recorded correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub issue_type: IssueType,
    pub description: String,
    pub original_params: ParamBag,
    pub corrected_params: ParamBag,
    pub learned_rule: Option<String>,
    pub confidence: Confidence,
    pub element_context: Option<ElementContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScaleIsolation {
    pub enforce_scale_isolation: bool,
    pub max_levels_with_scale: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidatedRules {
    /// `element_key` -> highest scale that did not crop.
    pub max_scales_by_element: BTreeMap<String, f64>,
    /// `transition_key` -> transition tag.
    pub preferred_transitions: BTreeMap<String, String>,
    pub timing_preferences: ParamBag,
    pub scale_isolation: ScaleIsolation,
}

impl ValidatedRules {
    pub fn max_scale_for(&self, element_type: &str, size: Size) -> Option<f64> {
        self.max_scales_by_element
            .get(&element_key(element_type, size))
            .copied()
    }

    pub fn preferred_transition(&self, from: &str, to: &str) -> Option<&str> {
        self.preferred_transitions
            .get(&transition_key(from, to))
            .map(String::as_str)
    }

    pub fn enforces_scale_isolation(&self) -> bool {
        self.scale_isolation.enforce_scale_isolation
    }
}

/// A rule derived from a single correction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedRule {
    MaxScale { key: String, max_scale: f64 },
    PreferredTransition { key: String, transition: String },
    Timing { preferences: ParamBag },
    ScaleIsolation { max_levels_with_scale: u32 },
}

impl ExtractedRule {
    /// Derive zero or one rule from a correction's payload.
    pub fn extract(correction: &NewCorrection) -> Option<Self> {
        let corrected = &correction.corrected_params;
        match correction.issue_type {
            IssueType::Crop => {
                let ctx = correction.element_context.as_ref()?;
                let max_scale = corrected.get("scale")?.as_f64()?;
                Some(Self::MaxScale {
                    key: element_key(&ctx.element_type, ctx.size()),
                    max_scale,
                })
            }
            IssueType::TransitionType => {
                let from = param_str(correction, "transition_from")?;
                let to = param_str(correction, "transition_to")?;
                let transition = corrected
                    .get("transition_type")
                    .or_else(|| corrected.get("transition"))?
                    .as_str()?;
                Some(Self::PreferredTransition {
                    key: transition_key(from, to),
                    transition: transition.to_string(),
                })
            }
            IssueType::Timing => {
                if corrected.contains_key("duration") || corrected.contains_key("delay") {
                    Some(Self::Timing {
                        preferences: corrected.clone(),
                    })
                } else {
                    None
                }
            }
            IssueType::CompoundScaling => Some(Self::ScaleIsolation {
                max_levels_with_scale: 1,
            }),
            _ => None,
        }
    }

    pub fn merge_into(&self, rules: &mut ValidatedRules) {
        match self {
            Self::MaxScale { key, max_scale } => {
                rules.max_scales_by_element.insert(key.clone(), *max_scale);
            }
            Self::PreferredTransition { key, transition } => {
                rules
                    .preferred_transitions
                    .insert(key.clone(), transition.clone());
            }
            Self::Timing { preferences } => {
                rules
                    .timing_preferences
                    .extend(preferences.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            Self::ScaleIsolation {
                max_levels_with_scale,
            } => {
                rules.scale_isolation = ScaleIsolation {
                    enforce_scale_isolation: true,
                    max_levels_with_scale: Some(*max_levels_with_scale),
                };
            }
        }
    }

    /// Human-readable form stored on the correction.
    pub fn describe(&self) -> String {
        match self {
            Self::MaxScale { key, max_scale } => {
                format!("max_scale[{}] = {}", key, max_scale)
            }
            Self::PreferredTransition { key, transition } => {
                format!("preferred_transition[{}] = {}", key, transition)
            }
            Self::Timing { preferences } => {
                let keys: Vec<&str> = preferences.keys().map(String::as_str).collect();
                format!("timing_preferences <- {}", keys.join(", "))
            }
            Self::ScaleIsolation {
                max_levels_with_scale,
            } => format!(
                "enforce_scale_isolation = true (max_levels_with_scale = {})",
                max_levels_with_scale
            ),
        }
    }
}

/// Transition endpoints may be given on either side of the correction.
fn param_str<'a>(correction: &'a NewCorrection, key: &str) -> Option<&'a str> {
    correction
        .corrected_params
        .get(key)
        .or_else(|| correction.original_params.get(key))
        .and_then(Value::as_str)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LearningMetadata {
    pub total_corrections: u64,
    pub total_generations: u64,
    pub success_rate: f64,
    pub most_common_issue: Option<IssueType>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl LearningMetadata {
    fn recompute(&mut self, corrections: &[Correction]) {
        self.success_rate = if self.total_generations > 0 {
            (1.0 - self.total_corrections as f64 / self.total_generations as f64).max(0.0)
        } else {
            0.0
        };
        self.most_common_issue = most_common_issue(corrections);
        self.last_updated = Some(Utc::now());
    }
}

/// Mode of issue types; ties go to the type seen first.
fn most_common_issue(corrections: &[Correction]) -> Option<IssueType> {
    let mut counts: HashMap<IssueType, usize> = HashMap::new();
    let mut order = Vec::new();
    for c in corrections {
        let count = counts.entry(c.issue_type).or_insert(0);
        if *count == 0 {
            order.push(c.issue_type);
        }
        *count += 1;
    }

    let mut best: Option<(IssueType, usize)> = None;
    for issue in order {
        let count = counts[&issue];
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((issue, count));
        }
    }
    best.map(|(issue, _)| issue)
}

/// The persisted unit: log + projection + aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnedRulesDocument {
    pub version: String,
    pub corrections: Vec<Correction>,
    pub validated_rules: ValidatedRules,
    pub learning_metadata: LearningMetadata,
}

impl Default for LearnedRulesDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            corrections: Vec::new(),
            validated_rules: ValidatedRules::default(),
            learning_metadata: LearningMetadata::default(),
        }
    }
}

/// Where the document lives. `Ok(None)` means nothing has been stored yet.
pub trait CorrectionBackend {
    fn load(&self) -> Result<Option<LearnedRulesDocument>>;
    fn save(&self, document: &LearnedRulesDocument) -> Result<()>;
}

/// Pretty-printed JSON file on disk.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorrectionBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<LearnedRulesDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        let document = serde_json::from_str(&data)
            .with_context(|| format!("Corrupt learned rules document {:?}", self.path))?;
        Ok(Some(document))
    }

    fn save(&self, document: &LearnedRulesDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }
        let data = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, data).with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }
}

/// Keeps the serialized document in memory. Useful for tests and for hosts
/// that persist elsewhere.
#[derive(Default)]
pub struct MemoryBackend {
    raw: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw document text (which may be corrupt).
    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|r| r.clone())
    }
}

impl CorrectionBackend for MemoryBackend {
    fn load(&self) -> Result<Option<LearnedRulesDocument>> {
        let guard = self
            .raw
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        match guard.as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(
                serde_json::from_str(raw).context("Corrupt in-memory document")?,
            )),
        }
    }

    fn save(&self, document: &LearnedRulesDocument) -> Result<()> {
        let data = serde_json::to_string(document)?;
        let mut guard = self
            .raw
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        *guard = Some(data);
        Ok(())
    }
}

/// Typed point query against the validated rules.
#[derive(Debug, Clone, Copy)]
pub enum RuleLookup<'a> {
    MaxScale { element_type: &'a str, size: Size },
    PreferredTransition { from: &'a str, to: &'a str },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    MaxScale(f64),
    Transition(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningStats {
    pub total_corrections: u64,
    pub total_generations: u64,
    pub success_rate: f64,
    pub most_common_issue: Option<IssueType>,
    pub max_scale_rules: usize,
    pub transition_rules: usize,
    pub timing_preferences: usize,
    pub scale_isolation_enforced: bool,
}

pub struct CorrectionStore<B: CorrectionBackend> {
    backend: B,
    document: LearnedRulesDocument,
    /// Last save failed; the in-memory document is ahead of the backend.
    unsaved: bool,
}

impl<B: CorrectionBackend> CorrectionStore<B> {
    pub fn open(backend: B) -> Self {
        let document = load_or_default(&backend);
        info!(
            "[STORE] 🧠 Loaded {} correction(s), {} scale rule(s), {} transition rule(s)",
            document.corrections.len(),
            document.validated_rules.max_scales_by_element.len(),
            document.validated_rules.preferred_transitions.len()
        );
        Self {
            backend,
            document,
            unsaved: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn document(&self) -> &LearnedRulesDocument {
        &self.document
    }

    pub fn rules(&self) -> &ValidatedRules {
        &self.document.validated_rules
    }

    pub fn corrections(&self) -> &[Correction] {
        &self.document.corrections
    }

    pub fn metadata(&self) -> &LearningMetadata {
        &self.document.learning_metadata
    }

    /// Re-read the backing document.
    pub fn reload(&mut self) {
        self.document = load_or_default(&self.backend);
        self.unsaved = false;
    }

    /// Whether the last save failed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Starting point for a read-modify-write. Unsaved memory wins over the backend.
    fn working_copy(&self) -> LearnedRulesDocument {
        if self.unsaved {
            self.document.clone()
        } else {
            load_or_default(&self.backend)
        }
    }

    /// Log a correction and fold whatever rule it implies into the projection.
    pub fn record_correction(&mut self, new: NewCorrection) -> Correction {
        let mut document = self.working_copy();

        let sequence = document.learning_metadata.total_corrections + 1;
        let rule = ExtractedRule::extract(&new);

        let correction = Correction {
            id: format!("correction-{:03}", sequence),
            timestamp: Utc::now(),
            issue_type: new.issue_type,
            description: new.description,
            original_params: new.original_params,
            corrected_params: new.corrected_params,
            learned_rule: rule.as_ref().map(ExtractedRule::describe),
            confidence: new.confidence,
            element_context: new.element_context,
        };

        match &rule {
            Some(rule) => {
                rule.merge_into(&mut document.validated_rules);
                info!("[STORE] 📚 Learned from {}: {}", correction.id, rule.describe());
            }
            None => info!(
                "[STORE] Logged {} ({:?}) without a derivable rule",
                correction.id, correction.issue_type
            ),
        }

        document.corrections.push(correction.clone());
        document.learning_metadata.total_corrections = sequence;
        document
            .learning_metadata
            .recompute(&document.corrections);

        self.persist(document);
        correction
    }

    /// Count one generation run; feeds the success rate.
    pub fn record_generation(&mut self) -> u64 {
        let mut document = self.working_copy();
        document.learning_metadata.total_generations += 1;
        document
            .learning_metadata
            .recompute(&document.corrections);
        let total = document.learning_metadata.total_generations;
        self.persist(document);
        total
    }

    /// Direct key lookup, no fuzzy matching.
    pub fn find_matching_rule(&self, lookup: RuleLookup<'_>) -> Option<RuleValue> {
        let rules = &self.document.validated_rules;
        match lookup {
            RuleLookup::MaxScale { element_type, size } => {
                rules.max_scale_for(element_type, size).map(RuleValue::MaxScale)
            }
            RuleLookup::PreferredTransition { from, to } => rules
                .preferred_transition(from, to)
                .map(|t| RuleValue::Transition(t.to_string())),
        }
    }

    pub fn stats(&self) -> LearningStats {
        let meta = &self.document.learning_metadata;
        let rules = &self.document.validated_rules;
        LearningStats {
            total_corrections: meta.total_corrections,
            total_generations: meta.total_generations,
            success_rate: meta.success_rate,
            most_common_issue: meta.most_common_issue,
            max_scale_rules: rules.max_scales_by_element.len(),
            transition_rules: rules.preferred_transitions.len(),
            timing_preferences: rules.timing_preferences.len(),
            scale_isolation_enforced: rules.enforces_scale_isolation(),
        }
    }

    /// Discard all learning and persist a fresh document.
    pub fn reset(&mut self) {
        warn!("[STORE] Resetting learned rules to a fresh document");
        self.persist(LearnedRulesDocument::default());
    }

    fn persist(&mut self, document: LearnedRulesDocument) {
        match self.backend.save(&document) {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                error!("[STORE] Failed to persist learned rules: {:#}", e);
                self.unsaved = true;
            }
        }
        self.document = document;
    }
}

fn load_or_default<B: CorrectionBackend>(backend: &B) -> LearnedRulesDocument {
    match backend.load() {
        Ok(Some(document)) => document,
        Ok(None) => LearnedRulesDocument::default(),
        Err(e) => {
            warn!("[STORE] ⚠️ Learned rules unreadable, starting fresh: {:#}", e);
            LearnedRulesDocument::default()
        }
    }
}
