// SYNOID Content Analyzer
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Side-effect-free feature extraction from raw script text: energy,
// complexity tier, content flags, keywords and the formula-driven duration.
// The heuristics sit behind `ContentHeuristics` so a different classifier
// can replace them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use crate::motion::catalog::{DurationBreakdown, RuleCatalog};

const HIGH_ENERGY_WORDS: &[&str] = &[
    "exciting",
    "amazing",
    "powerful",
    "fast",
    "dynamic",
    "energetic",
    "explosive",
    "incredible",
    "revolutionary",
    "breakthrough",
    "launch",
    "boost",
    "transform",
];

const LOW_ENERGY_WORDS: &[&str] = &[
    "calm",
    "gentle",
    "simple",
    "quiet",
    "peaceful",
    "relaxed",
    "subtle",
    "slow",
    "soft",
    "minimal",
    "steady",
    "careful",
    "serene",
];

pub const MIN_ENERGY: f64 = 0.3;
pub const MAX_ENERGY: f64 = 0.8;
const MAX_KEYWORDS: usize = 10;
/// Jaccard similarity at or above which consecutive scenes read as continuous.
const CONTINUITY_SIMILARITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentFeatures {
    pub technical: bool,
    pub lists: bool,
    pub code_examples: bool,
    pub questions: bool,
    pub call_to_action: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub energy: f64,
    pub complexity: Complexity,
    pub features: ContentFeatures,
    pub word_count: usize,
    pub keywords: Vec<String>,
    pub duration: DurationBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneRole {
    Intro,
    Body,
    Climax,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionHint {
    /// Shared vocabulary with the previous scene: soft transition.
    Continuous,
    /// Topic shift: a directional or contrasting transition.
    Contrast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAnalysis {
    pub index: usize,
    pub role: SceneRole,
    pub energy: f64,
    pub word_count: usize,
    pub similarity_to_previous: Option<f64>,
    pub transition_hint: Option<TransitionHint>,
}

/// Swappable classifier behind the analyzer.
pub trait ContentHeuristics {
    fn energy(&self, text: &str) -> f64;
    fn features(&self, text: &str) -> ContentFeatures;
    fn complexity(&self, text: &str, scene_count: usize) -> Complexity;
}

/// Fixed keyword lists and regex presence tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordHeuristics;

fn technical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(api|algorithm|database|server|software|framework|function|code|data|system|architecture|deploy\w*|integration)\b")
            .expect("valid regex")
    })
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:[-*•]|\d+[.)])\s+\S").expect("valid regex")
    })
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```|=>|\b(?:fn|def|function|class|const|let|import|return)\s+\w|\w+\([^)]*\)\s*[;{]")
            .expect("valid regex")
    })
}

fn question_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)\?|^\s*(?:how|why|what|when|where|who|can|should|is|are|do|does)\b")
            .expect("valid regex")
    })
}

fn cta_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(subscribe|sign up|click|buy now|learn more|get started|join|download|try it|follow|visit|shop now)\b")
            .expect("valid regex")
    })
}

impl ContentHeuristics for KeywordHeuristics {
    fn energy(&self, text: &str) -> f64 {
        let words = word_set(text);
        let high = HIGH_ENERGY_WORDS.iter().filter(|w| words.contains(**w)).count();
        let low = LOW_ENERGY_WORDS.iter().filter(|w| words.contains(**w)).count();
        let raw = 0.5 + 0.1 * high as f64 - 0.1 * low as f64;
        round2(raw.clamp(MIN_ENERGY, MAX_ENERGY))
    }

    fn features(&self, text: &str) -> ContentFeatures {
        ContentFeatures {
            technical: technical_re().is_match(text),
            lists: list_re().is_match(text),
            code_examples: code_re().is_match(text),
            questions: question_re().is_match(text),
            call_to_action: cta_re().is_match(text),
        }
    }

    fn complexity(&self, text: &str, scene_count: usize) -> Complexity {
        let words = text.split_whitespace().count();
        let code = code_re().is_match(text);
        let lists = list_re().is_match(text);

        if scene_count > 4 || words > 200 || (code && lists) {
            Complexity::Complex
        } else if scene_count == 1 && words < 50 && !code && !lists {
            Complexity::Simple
        } else {
            Complexity::Medium
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Lower-cased tokens with punctuation removed.
fn tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

fn word_set(text: &str) -> HashSet<String> {
    tokens(text).into_iter().collect()
}

/// Top ten tokens longer than three characters, most frequent first; ties
/// keep first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in tokens(text) {
        if token.chars().count() <= 3 {
            continue;
        }
        match index.get(&token) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(token.clone(), order.len());
                order.push((token, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a = word_set(a);
    let b = word_set(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Base frames per scene by tier, shortened for high energy and stretched
/// for low energy, then held inside the catalog range.
pub fn frames_per_scene_for(complexity: Complexity, energy: f64) -> u32 {
    let base: i64 = match complexity {
        Complexity::Simple => 60,
        Complexity::Medium => 75,
        Complexity::Complex => 90,
    };
    let adjusted = if energy >= 0.7 {
        base - 10
    } else if energy <= 0.4 {
        base + 10
    } else {
        base
    };
    adjusted.clamp(60, 90) as u32
}

pub fn scene_role(index: usize, scene_count: usize) -> SceneRole {
    if index == 0 {
        return SceneRole::Intro;
    }
    if index + 1 == scene_count {
        return SceneRole::Outro;
    }
    let climax = ((scene_count - 1) as f64 * 0.7).round() as usize;
    if index == climax {
        SceneRole::Climax
    } else {
        SceneRole::Body
    }
}

pub struct ContentAnalyzer<H: ContentHeuristics = KeywordHeuristics> {
    heuristics: H,
    catalog: RuleCatalog,
}

impl Default for ContentAnalyzer<KeywordHeuristics> {
    fn default() -> Self {
        Self::new(KeywordHeuristics)
    }
}

impl<H: ContentHeuristics> ContentAnalyzer<H> {
    pub fn new(heuristics: H) -> Self {
        Self {
            heuristics,
            catalog: RuleCatalog::professional(),
        }
    }

    pub fn analyze(&self, text: &str, scene_count: usize) -> ContentAnalysis {
        let energy = self.heuristics.energy(text);
        let complexity = self.heuristics.complexity(text, scene_count);
        let features = self.heuristics.features(text);
        let frames = frames_per_scene_for(complexity, energy);
        let duration = self
            .catalog
            .calculate_duration(scene_count.max(1) as u32, frames);

        debug!(
            "[CONTENT] energy={:.2} complexity={:?} frames/scene={} total={}",
            energy, complexity, frames, duration.total_frames
        );

        ContentAnalysis {
            energy,
            complexity,
            features,
            word_count: text.split_whitespace().count(),
            keywords: extract_keywords(text),
            duration,
        }
    }

    pub fn analyze_scenes(&self, scenes: &[&str]) -> Vec<SceneAnalysis> {
        scenes
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let similarity = index
                    .checked_sub(1)
                    .map(|prev| jaccard_similarity(scenes[prev], text));
                SceneAnalysis {
                    index,
                    role: scene_role(index, scenes.len()),
                    energy: self.heuristics.energy(text),
                    word_count: text.split_whitespace().count(),
                    similarity_to_previous: similarity,
                    transition_hint: similarity.map(|s| {
                        if s >= CONTINUITY_SIMILARITY {
                            TransitionHint::Continuous
                        } else {
                            TransitionHint::Contrast
                        }
                    }),
                }
            })
            .collect()
    }
}

/// Analyze with the default keyword heuristics.
pub fn analyze_content(text: &str, scene_count: usize) -> ContentAnalysis {
    ContentAnalyzer::default().analyze(text, scene_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_starts_neutral() {
        assert_eq!(KeywordHeuristics.energy("A product overview"), 0.5);
    }

    #[test]
    fn test_energy_counts_distinct_hits_and_clamps() {
        let h = KeywordHeuristics;
        assert_eq!(h.energy("fast fast fast"), 0.6);
        assert_eq!(h.energy("An exciting, powerful and fast launch!"), 0.8);
        assert_eq!(h.energy("calm, gentle, quiet and slow"), 0.3);
        assert_eq!(h.energy("fast but calm"), 0.5);
    }

    #[test]
    fn test_complexity_tiers() {
        let h = KeywordHeuristics;
        assert_eq!(h.complexity("Meet our new app", 1), Complexity::Simple);
        assert_eq!(h.complexity("Meet our new app", 2), Complexity::Medium);
        assert_eq!(h.complexity("Meet our new app", 5), Complexity::Complex);

        let listy = "Steps:\n- install\n- run";
        assert_eq!(h.complexity(listy, 1), Complexity::Medium);

        let both = "Steps:\n- install\n- call `fn main() {`\n```rust\nlet x = 1;\n```";
        assert_eq!(h.complexity(both, 1), Complexity::Complex);

        let long = "word ".repeat(201);
        assert_eq!(h.complexity(&long, 2), Complexity::Complex);
    }

    #[test]
    fn test_feature_flags() {
        let f = KeywordHeuristics.features("How does our API work? Sign up today.");
        assert!(f.technical);
        assert!(f.questions);
        assert!(f.call_to_action);
        assert!(!f.lists);
        assert!(!f.code_examples);
    }

    #[test]
    fn test_question_word_on_later_line() {
        let f = KeywordHeuristics.features("Meet the new editor.\nWhy it matters for teams.");
        assert!(f.questions);
        let f = KeywordHeuristics.features("Meet the new editor.\nThe result matters.");
        assert!(!f.questions);
    }

    #[test]
    fn test_keywords_frequency_then_first_seen() {
        let kw = extract_keywords("Rust makes tools. Tools, tools! Rust is fast; speed matters and the cat sat.");
        assert_eq!(kw[0], "tools");
        assert_eq!(kw[1], "rust");
        assert_eq!(kw[2], "makes");
        assert_eq!(kw[3], "fast");
        assert!(!kw.iter().any(|k| k == "cat" || k == "the" || k == "and"));
    }

    #[test]
    fn test_keywords_capped_at_ten() {
        let text = "alpha bravo charlie delta echoes foxtrot golf hotel india juliet kilo lima mike";
        assert_eq!(extract_keywords(text).len(), 10);
    }

    #[test]
    fn test_scene_roles() {
        let roles: Vec<_> = (0..5).map(|i| scene_role(i, 5)).collect();
        assert_eq!(
            roles,
            vec![
                SceneRole::Intro,
                SceneRole::Body,
                SceneRole::Body,
                SceneRole::Climax,
                SceneRole::Outro
            ]
        );
        assert_eq!(scene_role(0, 1), SceneRole::Intro);
        assert_eq!(scene_role(1, 2), SceneRole::Outro);
    }

    #[test]
    fn test_scene_similarity_and_hint() {
        let analysis = ContentAnalyzer::default().analyze_scenes(&[
            "our fast new editor",
            "our fast new editor ships today",
            "pricing and plans",
        ]);
        assert_eq!(analysis[0].similarity_to_previous, None);
        let s1 = analysis[1].similarity_to_previous.unwrap();
        assert!((s1 - 4.0 / 6.0).abs() < 1e-9);
        assert_eq!(analysis[1].transition_hint, Some(TransitionHint::Continuous));
        assert_eq!(analysis[2].transition_hint, Some(TransitionHint::Contrast));
    }

    #[test]
    fn test_duration_follows_tier() {
        let a = analyze_content("Meet our new app", 1);
        assert_eq!(a.complexity, Complexity::Simple);
        assert_eq!(a.duration.frames_per_scene, 60);
        assert_eq!(a.duration.total_frames, 60);

        let b = analyze_content("A calm, gentle walkthrough of the dashboard", 3);
        assert_eq!(b.duration.frames_per_scene, 85);
        assert_eq!(b.duration.total_frames, 3 * 85 + 2 * 15);
    }
}
