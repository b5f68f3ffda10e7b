// SYNOID Rule Enforcer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Single verdict over an AnimationSpec: base catalog hits plus checks driven
// by learned rules, graded into critical violations, warnings and advisory
// recommendations. Only critical violations affect validity.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::motion::catalog::RuleCatalog;
use crate::motion::spec::{AnimationSpec, Element, Scene};
use crate::motion::store::ValidatedRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub location: String,
    pub issue: String,
    pub fix: String,
}

impl Violation {
    fn critical(rule_id: &str, location: String, issue: String, fix: String) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Critical,
            location,
            issue,
            fix,
        }
    }

    fn warning(rule_id: &str, location: String, issue: String, fix: String) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Warning,
            location,
            issue,
            fix,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementReport {
    pub valid: bool,
    /// Critical violations from both tiers.
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
    /// One line per critical violation: `"{location}: {issue}"`.
    pub must_fix: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Exit direction -> the entry that reads as its continuation.
const DIRECTION_PAIRS: &[(&str, &str)] = &[
    ("wipe_up", "slide_up"),
    ("wipe_down", "slide_down"),
    ("wipe_left", "wipe_right"),
    ("wipe_right", "wipe_left"),
    ("slide_out_left", "slide_in_right"),
    ("slide_out_right", "slide_in_left"),
    ("zoom_out", "zoom_in"),
    ("fade_out", "fade_in"),
];

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace([' ', '-'], "_")
}

/// The entry that should follow a given exit, if the pairing table knows it.
pub fn paired_entry(exit: &str) -> Option<&'static str> {
    let exit = normalize_tag(exit);
    DIRECTION_PAIRS
        .iter()
        .find(|(out, _)| *out == exit)
        .map(|(_, entry)| *entry)
}

pub struct RuleEnforcer<'a> {
    catalog: RuleCatalog,
    rules: &'a ValidatedRules,
}

impl<'a> RuleEnforcer<'a> {
    pub fn new(rules: &'a ValidatedRules) -> Self {
        Self::with_catalog(RuleCatalog::professional(), rules)
    }

    pub fn with_catalog(catalog: RuleCatalog, rules: &'a ValidatedRules) -> Self {
        Self { catalog, rules }
    }

    pub fn enforce_all(&self, spec: &AnimationSpec) -> EnforcementReport {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        // 1. Base tier
        let base = self.catalog.evaluate(spec);
        for hit in base.violations {
            violations.push(Violation::critical(
                &hit.rule_id,
                hit.location,
                hit.message,
                format!(
                    "See professional rule '{}' (catalog v{})",
                    hit.rule_id, self.catalog.version
                ),
            ));
        }

        // 2. Learned tier; a hit the base tier already reported is not repeated
        let mut learned = Vec::new();
        for scene in &spec.scenes {
            self.check_scene(scene, &mut learned);
        }
        for v in learned {
            let seen = violations
                .iter()
                .any(|b| b.rule_id == v.rule_id && b.location == v.location);
            if !seen {
                violations.push(v);
            }
        }
        for pair in spec.scenes.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start_frame > prev.end_frame {
                let gap = next.start_frame - prev.end_frame;
                warnings.push(Violation::warning(
                    "timing.dead_space",
                    format!("between '{}' and '{}'", prev.name, next.name),
                    format!("{} frame gap of dead space", gap),
                    format!(
                        "Start '{}' at frame {} or extend '{}'",
                        next.name, prev.end_frame, prev.name
                    ),
                ));
            }
        }

        // 3. Recommendations
        let recommendations = recommend_pairings(&spec.scenes);

        let must_fix: Vec<String> = violations
            .iter()
            .map(|v| format!("{}: {}", v.location, v.issue))
            .collect();
        let valid = violations.is_empty();

        for v in &violations {
            debug!("[ENFORCER] ❌ {} @ {}: {}", v.rule_id, v.location, v.issue);
        }
        if valid {
            info!(
                "[ENFORCER] ✅ Spec passed ({} warning(s), {} recommendation(s))",
                warnings.len(),
                recommendations.len()
            );
        } else {
            warn!(
                "[ENFORCER] Spec rejected: {} critical violation(s)",
                violations.len()
            );
        }

        EnforcementReport {
            valid,
            violations,
            warnings,
            must_fix,
            recommendations,
        }
    }

    fn check_scene(&self, scene: &Scene, out: &mut Vec<Violation>) {
        let scene_loc = format!("scene '{}'", scene.name);

        if self
            .catalog
            .is_missing_transition(scene.entry_transition.as_deref())
        {
            out.push(Violation::critical(
                "transition.entry_required",
                scene_loc.clone(),
                format!(
                    "Entry transition is {}",
                    scene.entry_transition.as_deref().unwrap_or("missing")
                ),
                format!("Give '{}' a fade, slide or wipe entry", scene.name),
            ));
        }

        for (idx, element) in scene.elements.iter().enumerate() {
            let loc = format!("{} / element {} ({})", scene_loc, idx, element.element_type);
            self.check_element(scene, element, loc, out);
        }
    }

    fn check_element(&self, scene: &Scene, element: &Element, loc: String, out: &mut Vec<Violation>) {
        if let Some(velocity) = element.velocity {
            if velocity > self.catalog.max_velocity_without_blur && !scene.motion_blur {
                out.push(Violation::critical(
                    "motion.blur_required",
                    loc.clone(),
                    format!(
                        "{} moves at {:.1} units/frame without motion blur",
                        element.element_type, velocity
                    ),
                    format!("Enable motion blur on scene '{}'", scene.name),
                ));
            }
        }

        let scale = match element.scale {
            Some(scale) => scale,
            None => return,
        };

        if self.rules.enforces_scale_isolation() && element.has_non_identity_scale() {
            out.push(Violation::critical(
                "scale.compound",
                loc.clone(),
                format!(
                    "{} carries scale {} while scale isolation is enforced",
                    element.element_type, scale
                ),
                "Move the scale to the scene level and reset the element to 1.0".to_string(),
            ));
        }

        if let Some(max) = self.rules.max_scale_for(&element.element_type, element.size()) {
            if scale > max {
                out.push(Violation::critical(
                    "scale.will_crop",
                    loc,
                    format!(
                        "{} at {} with scale {} will crop (learned max {})",
                        element.element_type,
                        element.size(),
                        scale,
                        max
                    ),
                    format!("Reduce scale to {} or less", max),
                ));
            }
        }
    }
}

fn recommend_pairings(scenes: &[Scene]) -> Vec<String> {
    let mut recommendations = Vec::new();
    for pair in scenes.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let (exit, entry) = match (prev.exit_transition.as_deref(), next.entry_transition.as_deref()) {
            (Some(exit), Some(entry)) => (exit, entry),
            _ => continue,
        };
        if let Some(expected) = paired_entry(exit) {
            if normalize_tag(entry) != expected {
                recommendations.push(format!(
                    "'{}' exits with {} - enter '{}' with {} instead of {}",
                    prev.name, exit, next.name, expected, entry
                ));
            }
        }
    }
    recommendations
}

/// Shorthand for `RuleEnforcer::new(rules).enforce_all(spec)`.
pub fn enforce_all(spec: &AnimationSpec, rules: &ValidatedRules) -> EnforcementReport {
    RuleEnforcer::new(rules).enforce_all(spec)
}
