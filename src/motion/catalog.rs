// SYNOID Rule Catalog - Professional Motion Standards
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Fixed, versioned table of layout and motion constraints plus the single
// evaluation pass over an AnimationSpec. Every hit from this tier is
// critical; nothing here can be demoted to a warning.

use crate::motion::spec::{AnimationSpec, ScaleLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CATALOG_VERSION: &str = "1.2.0";

/// Frames spent on each transition between consecutive scenes.
pub const FRAMES_PER_TRANSITION: u32 = 15;
pub const MIN_FRAMES_PER_SCENE: u32 = 60;
pub const MAX_FRAMES_PER_SCENE: u32 = 90;

/// Speed (units/frame) above which an element needs motion blur.
pub const MOTION_BLUR_VELOCITY: f64 = 3.0;

/// The fixed professional-standards table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleCatalog {
    pub version: String,
    pub min_font_size: f64,
    pub min_element_spacing: f64,
    pub max_velocity_without_blur: f64,
    pub frames_per_scene_range: (u32, u32),
    pub frames_per_transition: u32,
    /// Entry transition tags that count as "no transition at all".
    pub forbidden_entry_transitions: Vec<String>,
    pub serif_families: Vec<String>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::professional()
    }
}

impl RuleCatalog {
    pub fn professional() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            min_font_size: 48.0,
            min_element_spacing: 40.0,
            max_velocity_without_blur: MOTION_BLUR_VELOCITY,
            frames_per_scene_range: (MIN_FRAMES_PER_SCENE, MAX_FRAMES_PER_SCENE),
            frames_per_transition: FRAMES_PER_TRANSITION,
            forbidden_entry_transitions: vec!["instant".to_string(), "none".to_string()],
            serif_families: [
                "serif",
                "times",
                "georgia",
                "garamond",
                "baskerville",
                "palatino",
                "playfair",
                "merriweather",
                "cambria",
                "didot",
                "bodoni",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Whether an entry transition tag counts as missing.
    pub fn is_missing_transition(&self, tag: Option<&str>) -> bool {
        match tag.map(str::trim) {
            None | Some("") => true,
            Some(t) => self
                .forbidden_entry_transitions
                .iter()
                .any(|f| f.eq_ignore_ascii_case(t)),
        }
    }

    pub fn is_serif(&self, family: &str) -> bool {
        let lower = family.to_lowercase();
        if lower.contains("sans") {
            return false;
        }
        self.serif_families.iter().any(|s| lower.contains(s.as_str()))
    }

    /// Evaluate a spec against every base rule.
    pub fn evaluate(&self, spec: &AnimationSpec) -> BaseRuleReport {
        let mut hits = Vec::new();

        if let Some(family) = spec.typography.font_family.as_deref() {
            if !spec.typography.serif_requested && self.is_serif(family) {
                hits.push(BaseRuleHit::new(
                    "typography.no_serif",
                    "typography",
                    format!("Serif font '{}' used without an explicit request", family),
                ));
            }
        }

        for scene in &spec.scenes {
            let scene_loc = format!("scene '{}'", scene.name);

            if !scene.uses_layout_container {
                hits.push(BaseRuleHit::new(
                    "structure.layout_container",
                    &scene_loc,
                    "Scene content is not wrapped in the no-overlap layout container",
                ));
            }
            if !scene.continuous_motion {
                hits.push(BaseRuleHit::new(
                    "motion.continuous",
                    &scene_loc,
                    "Scene does not declare continuous motion",
                ));
            }

            for (idx, element) in scene.elements.iter().enumerate() {
                let loc = format!("{} / element {} ({})", scene_loc, idx, element.element_type);

                if spec.scale_level == ScaleLevel::Scene && element.has_non_identity_scale() {
                    hits.push(BaseRuleHit::new(
                        "scale.isolation",
                        &loc,
                        format!(
                            "Element scale {} set while scale is reserved for the scene level",
                            element.scale.unwrap_or(1.0)
                        ),
                    ));
                }

                if let Some(velocity) = element.velocity {
                    if velocity > self.max_velocity_without_blur && !scene.motion_blur {
                        hits.push(BaseRuleHit::new(
                            "motion.blur_required",
                            &loc,
                            format!(
                                "Velocity {:.1} units/frame exceeds {} without scene motion blur",
                                velocity, self.max_velocity_without_blur
                            ),
                        ));
                    }
                }

                if let Some(font_size) = element.font_size {
                    if font_size < self.min_font_size {
                        hits.push(BaseRuleHit::new(
                            "typography.min_font_size",
                            &loc,
                            format!(
                                "Font size {} is below the {} minimum",
                                font_size, self.min_font_size
                            ),
                        ));
                    }
                }

                if let Some(padding) = element.padding {
                    if padding < self.min_element_spacing {
                        hits.push(BaseRuleHit::new(
                            "spacing.min_padding",
                            &loc,
                            format!(
                                "Padding {} is below the {} minimum",
                                padding, self.min_element_spacing
                            ),
                        ));
                    }
                }
            }
        }

        match spec.duration {
            None => hits.push(BaseRuleHit::new(
                "duration.formula",
                "duration",
                "Total duration was not declared through the duration formula",
            )),
            Some(decl) => {
                if decl.scene_count as usize != spec.scenes.len() {
                    hits.push(BaseRuleHit::new(
                        "duration.formula",
                        "duration",
                        format!(
                            "Declared scene count {} does not match {} scenes",
                            decl.scene_count,
                            spec.scenes.len()
                        ),
                    ));
                }
                match self.try_calculate_duration(decl.scene_count, decl.frames_per_scene) {
                    Some(expected) if decl.total_frames != expected.total_frames => {
                        hits.push(BaseRuleHit::new(
                            "duration.formula",
                            "duration",
                            format!(
                                "Total of {} frames is arbitrary; formula gives {}",
                                decl.total_frames, expected.total_frames
                            ),
                        ))
                    }
                    Some(_) => {}
                    None => hits.push(BaseRuleHit::new(
                        "duration.formula",
                        "duration",
                        format!(
                            "{} scenes at {} frames overflows the frame counter",
                            decl.scene_count, decl.frames_per_scene
                        ),
                    )),
                }
            }
        }

        debug!("[CATALOG] v{} evaluation: {} hit(s)", self.version, hits.len());

        BaseRuleReport {
            valid: hits.is_empty(),
            violations: hits,
        }
    }

    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn calculate_duration(&self, scene_count: u32, frames_per_scene: u32) -> DurationBreakdown {
        self.try_calculate_duration(scene_count, frames_per_scene)
            .unwrap_or_else(|| {
                let breakdown = self.breakdown_parts(scene_count, frames_per_scene);
                DurationBreakdown {
                    scene_frames: scene_count.saturating_mul(breakdown.frames_per_scene),
                    transition_frames: breakdown
                        .transition_count
                        .saturating_mul(self.frames_per_transition),
                    total_frames: u32::MAX,
                    ..breakdown
                }
            })
    }

    /// `None` when the frame total does not fit in a `u32`.
    pub fn try_calculate_duration(
        &self,
        scene_count: u32,
        frames_per_scene: u32,
    ) -> Option<DurationBreakdown> {
        let breakdown = self.breakdown_parts(scene_count, frames_per_scene);
        let scene_frames = scene_count.checked_mul(breakdown.frames_per_scene)?;
        let transition_frames = breakdown
            .transition_count
            .checked_mul(self.frames_per_transition)?;
        Some(DurationBreakdown {
            scene_frames,
            transition_frames,
            total_frames: scene_frames.checked_add(transition_frames)?,
            ..breakdown
        })
    }

    fn breakdown_parts(&self, scene_count: u32, frames_per_scene: u32) -> DurationBreakdown {
        let (lo, hi) = self.frames_per_scene_range;
        DurationBreakdown {
            scene_count,
            frames_per_scene: frames_per_scene.clamp(lo, hi),
            transition_count: scene_count.saturating_sub(1),
            frames_per_transition: self.frames_per_transition,
            scene_frames: 0,
            transition_frames: 0,
            total_frames: 0,
        }
    }
}

/// `total = scenes * frames_per_scene + (scenes - 1) * 15`, frames per
/// scene clamped to [60, 90].
pub fn calculate_duration(scene_count: u32, frames_per_scene: u32) -> DurationBreakdown {
    RuleCatalog::professional().calculate_duration(scene_count, frames_per_scene)
}

/// Shorthand for `RuleCatalog::professional().evaluate(spec)`.
pub fn evaluate_base_rules(spec: &AnimationSpec) -> BaseRuleReport {
    RuleCatalog::professional().evaluate(spec)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBreakdown {
    pub scene_count: u32,
    pub frames_per_scene: u32,
    pub transition_count: u32,
    pub frames_per_transition: u32,
    pub scene_frames: u32,
    pub transition_frames: u32,
    pub total_frames: u32,
}

impl DurationBreakdown {
    pub fn seconds(&self, fps: u32) -> f64 {
        if fps == 0 {
            return 0.0;
        }
        self.total_frames as f64 / fps as f64
    }

    /// The declaration a spec should carry for this breakdown.
    pub fn declaration(&self) -> crate::motion::spec::DurationDeclaration {
        crate::motion::spec::DurationDeclaration {
            scene_count: self.scene_count,
            frames_per_scene: self.frames_per_scene,
            total_frames: self.total_frames,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRuleHit {
    pub rule_id: String,
    pub location: String,
    pub message: String,
}

impl BaseRuleHit {
    fn new(rule_id: &str, location: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            location: location.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BaseRuleHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.rule_id, self.location, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRuleReport {
    pub valid: bool,
    pub violations: Vec<BaseRuleHit>,
}

impl BaseRuleReport {
    /// Violations as display strings.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::spec::{Element, Scene};

    fn compliant_spec() -> AnimationSpec {
        let mut spec = AnimationSpec::new(vec![
            Scene::new("intro", 0, 75).with_element(Element::new("text_block", 800, 200)),
            Scene::new("outro", 90, 165),
        ]);
        spec.duration = Some(calculate_duration(2, 75).declaration());
        spec
    }

    #[test]
    fn test_duration_three_scenes() {
        let d = calculate_duration(3, 75);
        assert_eq!(d.total_frames, 255);
        assert_eq!(d.transition_frames, 30);
    }

    #[test]
    fn test_duration_formula_holds_across_range() {
        for scenes in 1..=8u32 {
            for fps in 60..=90u32 {
                let d = calculate_duration(scenes, fps);
                assert_eq!(d.total_frames, scenes * fps + (scenes - 1) * 15);
            }
        }
    }

    #[test]
    fn test_frames_per_scene_is_clamped() {
        assert_eq!(calculate_duration(2, 30).frames_per_scene, 60);
        assert_eq!(calculate_duration(2, 200).frames_per_scene, 90);
        assert_eq!(calculate_duration(1, 75).total_frames, 75);
    }

    #[test]
    fn test_compliant_spec_passes() {
        let report = evaluate_base_rules(&compliant_spec());
        assert!(report.valid, "unexpected hits: {:?}", report.messages());
    }

    #[test]
    fn test_serif_rejected_unless_requested() {
        let mut spec = compliant_spec();
        spec.typography.font_family = Some("Playfair Display".to_string());
        assert!(!evaluate_base_rules(&spec).valid);

        spec.typography.serif_requested = true;
        assert!(evaluate_base_rules(&spec).valid);

        spec.typography.serif_requested = false;
        spec.typography.font_family = Some("Open Sans".to_string());
        assert!(evaluate_base_rules(&spec).valid);
    }

    #[test]
    fn test_structural_and_motion_rules() {
        let mut spec = compliant_spec();
        spec.scenes[0].uses_layout_container = false;
        spec.scenes[1].continuous_motion = false;
        let report = evaluate_base_rules(&spec);
        let ids: Vec<_> = report.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert!(ids.contains(&"structure.layout_container"));
        assert!(ids.contains(&"motion.continuous"));
    }

    #[test]
    fn test_scene_level_scale_rejects_element_scale() {
        let mut spec = compliant_spec();
        spec.scenes[0].elements[0].scale = Some(1.2);
        assert!(evaluate_base_rules(&spec).valid);

        spec.scale_level = ScaleLevel::Scene;
        let report = evaluate_base_rules(&spec);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "scale.isolation");
    }

    #[test]
    fn test_fast_element_needs_blur() {
        let mut spec = compliant_spec();
        spec.scenes[0].elements[0].velocity = Some(4.5);
        assert!(!evaluate_base_rules(&spec).valid);

        spec.scenes[0].motion_blur = true;
        assert!(evaluate_base_rules(&spec).valid);
    }

    #[test]
    fn test_arbitrary_duration_rejected() {
        let mut spec = compliant_spec();
        spec.duration = Some(crate::motion::spec::DurationDeclaration {
            scene_count: 2,
            frames_per_scene: 75,
            total_frames: 150,
        });
        assert!(!evaluate_base_rules(&spec).valid);

        spec.duration = None;
        assert!(!evaluate_base_rules(&spec).valid);
    }

    #[test]
    fn test_minimums_only_checked_when_declared() {
        let mut spec = compliant_spec();
        spec.scenes[0].elements[0].font_size = Some(32.0);
        spec.scenes[0].elements[0].padding = Some(12.0);
        let report = evaluate_base_rules(&spec);
        assert_eq!(report.violations.len(), 2);
    }

    #[test]
    fn test_oversized_declaration_is_a_hit_not_a_panic() {
        let mut spec = compliant_spec();
        spec.duration = Some(crate::motion::spec::DurationDeclaration {
            scene_count: 50_000_000,
            frames_per_scene: 90,
            total_frames: 0,
        });
        let report = evaluate_base_rules(&spec);
        assert!(!report.valid);
        assert!(report
            .violations
            .iter()
            .any(|v| v.rule_id == "duration.formula" && v.message.contains("overflows")));
    }

    #[test]
    fn test_duration_saturates_on_overflow() {
        let catalog = RuleCatalog::professional();
        assert_eq!(catalog.try_calculate_duration(u32::MAX, 90), None);
        assert_eq!(calculate_duration(u32::MAX, 90).total_frames, u32::MAX);
        assert_eq!(
            catalog.try_calculate_duration(3, 75).map(|d| d.total_frames),
            Some(255)
        );
    }
}
