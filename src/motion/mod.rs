// SYNOID Motion Rules Engine
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Adaptive rule enforcement and template selection for generated
// motion-graphics clips.

pub mod catalog;
pub mod content;
pub mod enforcer;
pub mod keys;
pub mod library;
pub mod preferences;
pub mod spec;
pub mod store;
pub mod templates;

pub use catalog::{calculate_duration, evaluate_base_rules, DurationBreakdown, RuleCatalog};
pub use content::{analyze_content, ContentAnalysis, ContentAnalyzer};
pub use enforcer::{enforce_all, EnforcementReport, RuleEnforcer, Severity, Violation};
pub use preferences::{apply_preferences, AppliedRule, PreferenceOutcome};
pub use spec::{AnimationSpec, Element, Scene};
pub use store::{CorrectionStore, JsonFileBackend, MemoryBackend, NewCorrection};
pub use templates::{TemplateMatch, TemplateSelector};
