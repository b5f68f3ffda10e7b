// SYNOID Preference Applier - Learned Auto-Repair
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Rewrites out-of-bound parameters of a spec using the validated rules and
// records every change. The input spec is never touched; a fixed spec stays
// fixed when run through again.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::motion::spec::{AnimationSpec, Element, Scene};
use crate::motion::store::{ParamBag, ValidatedRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedRuleType {
    MaxScale,
    ScaleIsolation,
    PreferredTransition,
    Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub rule_type: AppliedRuleType,
    pub location: String,
    pub before: Value,
    pub after: Value,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceOutcome {
    pub original: AnimationSpec,
    pub modified: AnimationSpec,
    pub applied_rules: Vec<AppliedRule>,
    pub prevented_issues: Vec<String>,
}

impl PreferenceOutcome {
    pub fn changed(&self) -> bool {
        !self.applied_rules.is_empty()
    }
}

pub fn apply_preferences(spec: &AnimationSpec, rules: &ValidatedRules) -> PreferenceOutcome {
    let mut modified = spec.clone();
    let mut applied = Vec::new();
    let mut prevented = Vec::new();

    let names: Vec<String> = modified.scenes.iter().map(|s| s.name.clone()).collect();

    for (scene_idx, scene) in modified.scenes.iter_mut().enumerate() {
        for idx in 0..scene.elements.len() {
            let loc = format!(
                "scene '{}' / element {} ({})",
                scene.name, idx, scene.elements[idx].element_type
            );

            // 1. Learned max scale
            if let Some(rule) = clamp_scale(&mut scene.elements[idx], rules, &loc) {
                prevented.push(format!(
                    "Prevented crop at {}: scale {} -> {}",
                    loc, rule.before, rule.after
                ));
                applied.push(rule);
            }

            // 2. Scale isolation
            if let Some(rule) = strip_compound_scale(scene, idx, rules, &loc) {
                prevented.push(format!(
                    "Prevented compound scaling at {}: removed scale {}",
                    loc, rule.before
                ));
                applied.push(rule);
            }

            // 3. Timing
            applied.extend(apply_timing_preferences(
                &mut scene.elements[idx],
                &rules.timing_preferences,
            ));
        }

        if let Some(next) = names.get(scene_idx + 1) {
            if let Some(rule) = prefer_transition(scene, next, rules) {
                applied.push(rule);
            }
        }
    }

    if !applied.is_empty() {
        info!(
            "[PREFS] 🔧 Applied {} learned preference(s), prevented {} issue(s)",
            applied.len(),
            prevented.len()
        );
    }

    PreferenceOutcome {
        original: spec.clone(),
        modified,
        applied_rules: applied,
        prevented_issues: prevented,
    }
}

fn clamp_scale(element: &mut Element, rules: &ValidatedRules, loc: &str) -> Option<AppliedRule> {
    let max = rules.max_scale_for(&element.element_type, element.size())?;
    let scale = element.scale?;
    if scale <= max {
        return None;
    }
    element.scale = Some(max);
    Some(AppliedRule {
        rule_type: AppliedRuleType::MaxScale,
        location: loc.to_string(),
        before: Value::from(scale),
        after: Value::from(max),
        reason: "learned max safe scale from previous crop issue".to_string(),
    })
}

fn strip_compound_scale(
    scene: &mut Scene,
    idx: usize,
    rules: &ValidatedRules,
    loc: &str,
) -> Option<AppliedRule> {
    if !rules.enforces_scale_isolation() || !scene.elements[idx].has_non_identity_scale() {
        return None;
    }
    let sibling_scaled = scene
        .elements
        .iter()
        .enumerate()
        .any(|(i, e)| i != idx && e.scale.is_some());
    if !sibling_scaled {
        return None;
    }

    let before = scene.elements[idx].scale.take()?;
    Some(AppliedRule {
        rule_type: AppliedRuleType::ScaleIsolation,
        location: loc.to_string(),
        before: Value::from(before),
        after: Value::Null,
        reason: "scale isolation enforced after compound scaling correction".to_string(),
    })
}

/// Elements carry no timing properties yet, so there is nothing to merge.
fn apply_timing_preferences(_element: &mut Element, _preferences: &ParamBag) -> Vec<AppliedRule> {
    Vec::new()
}

fn prefer_transition(scene: &mut Scene, next: &str, rules: &ValidatedRules) -> Option<AppliedRule> {
    let preferred = rules.preferred_transition(&scene.name, next)?;
    if scene.exit_transition.as_deref() == Some(preferred) {
        return None;
    }
    let before = scene
        .exit_transition
        .replace(preferred.to_string())
        .map(Value::from)
        .unwrap_or(Value::Null);
    Some(AppliedRule {
        rule_type: AppliedRuleType::PreferredTransition,
        location: format!("scene '{}' -> '{}'", scene.name, next),
        before,
        after: Value::from(preferred),
        reason: "learned preferred transition from previous correction".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolation_rules() -> ValidatedRules {
        let mut rules = ValidatedRules::default();
        rules.scale_isolation.enforce_scale_isolation = true;
        rules.scale_isolation.max_levels_with_scale = Some(1);
        rules
    }

    #[test]
    fn test_clamps_to_learned_max() {
        let mut rules = ValidatedRules::default();
        rules
            .max_scales_by_element
            .insert("text_block_800x200".to_string(), 1.3);
        let spec = AnimationSpec::new(vec![Scene::new("intro", 0, 75)
            .with_element(Element::new("text_block", 800, 200).with_scale(1.5))]);

        let outcome = apply_preferences(&spec, &rules);
        assert_eq!(outcome.modified.scenes[0].elements[0].scale, Some(1.3));
        assert_eq!(outcome.original.scenes[0].elements[0].scale, Some(1.5));
        assert_eq!(outcome.applied_rules.len(), 1);
        assert_eq!(outcome.applied_rules[0].rule_type, AppliedRuleType::MaxScale);
        assert_eq!(outcome.prevented_issues.len(), 1);
    }

    #[test]
    fn test_strips_only_while_a_sibling_is_scaled() {
        let spec = AnimationSpec::new(vec![Scene::new("a", 0, 75)
            .with_element(Element::new("card", 400, 300).with_scale(1.2))
            .with_element(Element::new("card", 400, 300).with_scale(1.4))]);

        let outcome = apply_preferences(&spec, &isolation_rules());
        let elements = &outcome.modified.scenes[0].elements;
        assert_eq!(elements[0].scale, None);
        assert_eq!(elements[1].scale, Some(1.4));
        assert_eq!(outcome.applied_rules.len(), 1);
        assert_eq!(
            outcome.applied_rules[0].rule_type,
            AppliedRuleType::ScaleIsolation
        );
    }

    #[test]
    fn test_lone_scaled_element_is_kept() {
        let spec = AnimationSpec::new(vec![Scene::new("a", 0, 75)
            .with_element(Element::new("card", 400, 300).with_scale(1.2))
            .with_element(Element::new("label", 400, 80))]);
        assert!(!apply_preferences(&spec, &isolation_rules()).changed());
    }

    #[test]
    fn test_overwrites_exit_transition() {
        let mut rules = ValidatedRules::default();
        rules
            .preferred_transitions
            .insert("intro_to_demo".to_string(), "wipe_right".to_string());
        let spec = AnimationSpec::new(vec![Scene::new("intro", 0, 75), Scene::new("demo", 75, 150)]);

        let outcome = apply_preferences(&spec, &rules);
        assert_eq!(
            outcome.modified.scenes[0].exit_transition.as_deref(),
            Some("wipe_right")
        );
        assert_eq!(outcome.applied_rules[0].before, Value::Null);
        assert!(outcome.prevented_issues.is_empty());
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut rules = isolation_rules();
        rules
            .max_scales_by_element
            .insert("text_block_800x200".to_string(), 1.3);
        rules
            .preferred_transitions
            .insert("a_to_b".to_string(), "slide_up".to_string());
        let spec = AnimationSpec::new(vec![
            Scene::new("a", 0, 75)
                .with_element(Element::new("text_block", 800, 200).with_scale(1.5))
                .with_element(Element::new("card", 400, 300).with_scale(1.0))
                .with_element(Element::new("card", 400, 300).with_scale(2.0)),
            Scene::new("b", 75, 150),
        ]);

        let first = apply_preferences(&spec, &rules);
        assert!(first.changed());
        let second = apply_preferences(&first.modified, &rules);
        assert!(second.applied_rules.is_empty(), "{:?}", second.applied_rules);
        assert_eq!(second.modified, first.modified);
    }
}
