// SYNOID Template Selector
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Ranks a template library against one free-text request using a weighted
// rubric: keyword overlap, content-type fit, platform fit and style fit.
// Request parsing lives behind `RequestAnalyzer`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info};

pub const DEFAULT_TOP_N: usize = 3;

const KEYWORD_WEIGHT: f64 = 0.50;
const CONTENT_WEIGHT: f64 = 0.30;
const PLATFORM_WEIGHT: f64 = 0.20;
const STYLE_WEIGHT: f64 = 0.10;
const WEIGHT_TOTAL: f64 = KEYWORD_WEIGHT + CONTENT_WEIGHT + PLATFORM_WEIGHT + STYLE_WEIGHT;

/// Flat bonus once two or more template keywords match.
const MULTI_KEYWORD_BONUS: f64 = 0.15;
const ASPECT_ONLY_CREDIT: f64 = 0.7;
const ENERGY_MISMATCH: u8 = 4;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "for", "with", "to", "of", "in", "on", "at", "by", "my",
    "our", "me", "i", "we", "is", "it", "this", "that", "be", "make", "create", "want", "need",
    "please", "some",
];

const HIGH_ENERGY: &[&str] = &[
    "fast", "energetic", "dynamic", "exciting", "hype", "bold", "punchy", "explosive", "upbeat",
    "intense",
];
const LOW_ENERGY: &[&str] = &[
    "calm", "slow", "gentle", "relaxed", "minimal", "subtle", "elegant", "soft",
];
const CORPORATE: &[&str] = &[
    "corporate", "professional", "business", "enterprise", "formal", "executive", "b2b",
    "investor",
];
const CASUAL: &[&str] = &[
    "casual", "fun", "playful", "quirky", "silly", "meme", "friendly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
    Linkedin,
    Twitter,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Youtube,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Facebook,
    ];

    fn terms(self) -> &'static [&'static str] {
        match self {
            Platform::Youtube => &["youtube", "yt"],
            Platform::Instagram => &["instagram", "insta", "reels", "ig"],
            Platform::Tiktok => &["tiktok", "tik tok"],
            Platform::Linkedin => &["linkedin"],
            Platform::Twitter => &["twitter", "tweet"],
            Platform::Facebook => &["facebook", "fb"],
        }
    }

    pub fn default_aspect(self) -> AspectRatio {
        match self {
            Platform::Youtube | Platform::Twitter | Platform::Facebook => AspectRatio::Landscape,
            Platform::Instagram | Platform::Linkedin => AspectRatio::Square,
            Platform::Tiktok => AspectRatio::Portrait,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Youtube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AspectRatio::Landscape => write!(f, "16:9"),
            AspectRatio::Portrait => write!(f, "9:16"),
            AspectRatio::Square => write!(f, "1:1"),
        }
    }
}

/// Catalog entry. Authored elsewhere; only read and ranked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub keywords: Vec<String>,
    pub aspect_ratio: AspectRatio,
    /// 1-10
    pub energy: u8,
    /// 1-10
    pub professionalism: u8,
    /// 1-10
    pub colorfulness: u8,
    #[serde(default)]
    pub text_heavy: bool,
    #[serde(default)]
    pub data_visualization: bool,
    #[serde(default)]
    pub has_characters: bool,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    /// Opaque reference to the composition that renders this template.
    pub implementation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestProfile {
    pub keywords: Vec<String>,
    pub platform: Option<Platform>,
    pub aspect_ratio: AspectRatio,
    pub energy: u8,
    pub professionalism: u8,
    pub needs_data_visualization: bool,
}

pub trait RequestAnalyzer {
    fn analyze(&self, request: &str) -> RequestProfile;
}

/// Fixed keyword groups and a data-visualization regex.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRequestAnalyzer;

fn data_viz_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\d+(?:\.\d+)?\s*%|\b(?:percent(?:age)?s?|charts?|graphs?|data|statistics?|stats|metrics?|numbers|growth|revenue|analytics|dashboards?|kpis?|comparisons?|trends?|infographics?)\b")
            .expect("valid regex")
    })
}

fn strip_non_word(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

impl KeywordRequestAnalyzer {
    fn tokenize(request: &str) -> Vec<String> {
        request
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .map(|t| strip_non_word(&t))
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn detect_platform(lower: &str, tokens: &HashSet<&str>) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| {
            p.terms().iter().any(|term| {
                if term.contains(' ') {
                    lower.contains(term)
                } else {
                    tokens.contains(term)
                }
            })
        })
    }

    fn detect_aspect(lower: &str, tokens: &HashSet<&str>, platform: Option<Platform>) -> AspectRatio {
        let has = |words: &[&str]| words.iter().any(|w| tokens.contains(w));
        if lower.contains("9:16") || has(&["vertical", "portrait", "story", "stories"]) {
            AspectRatio::Portrait
        } else if lower.contains("1:1") || has(&["square"]) {
            AspectRatio::Square
        } else if lower.contains("16:9") || has(&["horizontal", "landscape", "widescreen"]) {
            AspectRatio::Landscape
        } else {
            platform
                .map(Platform::default_aspect)
                .unwrap_or(AspectRatio::Landscape)
        }
    }
}

impl RequestAnalyzer for KeywordRequestAnalyzer {
    fn analyze(&self, request: &str) -> RequestProfile {
        let lower = request.to_lowercase();
        let keywords = Self::tokenize(request);
        let tokens: HashSet<&str> = keywords.iter().map(String::as_str).collect();
        let has = |words: &[&str]| words.iter().any(|w| tokens.contains(w));

        let platform = Self::detect_platform(&lower, &tokens);
        let aspect_ratio = Self::detect_aspect(&lower, &tokens, platform);

        let energy = if has(HIGH_ENERGY) {
            8
        } else if has(LOW_ENERGY) {
            3
        } else {
            5
        };
        let professionalism = if has(CORPORATE) {
            9
        } else if has(CASUAL) {
            3
        } else {
            6
        };

        RequestProfile {
            platform,
            aspect_ratio,
            energy,
            professionalism,
            needs_data_visualization: data_viz_re().is_match(request),
            keywords,
        }
    }
}

/// Exact, substring either way, or shared four-character stem.
pub fn keywords_match(user: &str, template: &str) -> bool {
    if user.is_empty() || template.is_empty() {
        return false;
    }
    if user == template || user.contains(template) || template.contains(user) {
        return true;
    }
    let stem = |s: &str| s.chars().take(4).collect::<String>();
    user.chars().count() >= 4 && template.chars().count() >= 4 && stem(user) == stem(template)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword: f64,
    pub content: f64,
    pub platform: f64,
    pub style: f64,
    /// Weighted sum of the four components, normalized to [0, 1].
    pub weighted: f64,
    pub bonus: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.weighted + self.bonus
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMatch {
    pub template: AnimationTemplate,
    /// Unbounded: the keyword bonus can lift it above 1.0.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub matched_keywords: Vec<String>,
    pub justification: String,
    pub warnings: Vec<String>,
}

impl TemplateMatch {
    /// Score as a percentage, clamped for display.
    pub fn display_percent(&self) -> u32 {
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

pub fn score_template(template: &AnimationTemplate, request: &RequestProfile) -> TemplateMatch {
    let matched: Vec<String> = template
        .keywords
        .iter()
        .filter(|tk| {
            let tk = tk.to_lowercase();
            request.keywords.iter().any(|uk| keywords_match(uk, &tk))
        })
        .cloned()
        .collect();

    let keyword = if template.keywords.is_empty() {
        0.0
    } else {
        matched.len() as f64 / template.keywords.len() as f64
    };
    let bonus = if matched.len() >= 2 {
        MULTI_KEYWORD_BONUS
    } else {
        0.0
    };

    let content = match (request.needs_data_visualization, template.data_visualization) {
        (true, true) => 1.0,
        (false, false) => 0.5,
        _ => 0.0,
    };

    let platform_match = request
        .platform
        .map(|p| template.platforms.contains(&p))
        .unwrap_or(false);
    let platform = if platform_match {
        1.0
    } else if template.aspect_ratio == request.aspect_ratio {
        ASPECT_ONLY_CREDIT
    } else {
        0.0
    };

    let energy_gap = template.energy.abs_diff(request.energy);
    let prof_gap = template.professionalism.abs_diff(request.professionalism);
    let style = ((1.0 - energy_gap as f64 / 10.0) + (1.0 - prof_gap as f64 / 10.0)) / 2.0;

    let weighted = (KEYWORD_WEIGHT * keyword
        + CONTENT_WEIGHT * content
        + PLATFORM_WEIGHT * platform
        + STYLE_WEIGHT * style)
        / WEIGHT_TOTAL;

    let breakdown = ScoreBreakdown {
        keyword,
        content,
        platform,
        style,
        weighted,
        bonus,
    };

    let justification = justify(template, request, &breakdown, &matched);

    let mut warnings = Vec::new();
    if template.aspect_ratio != request.aspect_ratio {
        warnings.push(format!(
            "Template is {} but the request calls for {}",
            template.aspect_ratio, request.aspect_ratio
        ));
    }
    if let Some(p) = request.platform {
        if !platform_match {
            warnings.push(format!("Template is not tagged for {}", p));
        }
    }
    if energy_gap > ENERGY_MISMATCH {
        warnings.push(format!(
            "Energy mismatch: template {} vs requested {}",
            template.energy, request.energy
        ));
    }

    TemplateMatch {
        template: template.clone(),
        score: breakdown.total(),
        breakdown,
        matched_keywords: matched,
        justification,
        warnings,
    }
}

fn justify(
    template: &AnimationTemplate,
    request: &RequestProfile,
    breakdown: &ScoreBreakdown,
    matched: &[String],
) -> String {
    let mut reasons = Vec::new();

    if !matched.is_empty() {
        reasons.push(format!("Matches your keywords: {}", matched.join(", ")));
    }

    if breakdown.platform >= 1.0 {
        if let Some(p) = request.platform {
            reasons.push(format!("Built for {}", p));
        }
    } else if breakdown.platform > 0.0 {
        reasons.push(format!("Fits the {} format", template.aspect_ratio));
    }

    if breakdown.content >= 1.0 {
        reasons.push("Includes data visualization for your numbers".to_string());
    } else if breakdown.content > 0.0 {
        reasons.push("Clean layout without charts".to_string());
    }

    if breakdown.style >= 0.8 {
        reasons.push("Style matches the requested energy and tone".to_string());
    }

    if reasons.is_empty() {
        return format!("{} is a general-purpose fallback", template.name);
    }
    reasons.join(". ")
}

pub struct TemplateSelector<A: RequestAnalyzer = KeywordRequestAnalyzer> {
    library: Vec<AnimationTemplate>,
    analyzer: A,
}

impl TemplateSelector<KeywordRequestAnalyzer> {
    pub fn new(library: Vec<AnimationTemplate>) -> Self {
        Self::with_analyzer(library, KeywordRequestAnalyzer)
    }
}

impl<A: RequestAnalyzer> TemplateSelector<A> {
    pub fn with_analyzer(library: Vec<AnimationTemplate>, analyzer: A) -> Self {
        Self { library, analyzer }
    }

    pub fn library(&self) -> &[AnimationTemplate] {
        &self.library
    }

    pub fn analyze_request(&self, request: &str) -> RequestProfile {
        self.analyzer.analyze(request)
    }

    /// Top `top_n` templates by descending score.
    pub fn select(&self, request: &str, top_n: usize) -> Vec<TemplateMatch> {
        let profile = self.analyzer.analyze(request);
        debug!("[SELECTOR] Request profile: {:?}", profile);

        let mut matches: Vec<TemplateMatch> = self
            .library
            .iter()
            .map(|t| score_template(t, &profile))
            .collect();
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_n);

        if let Some(best) = matches.first() {
            info!(
                "[SELECTOR] 🎬 Best template '{}' ({}%) of {}",
                best.template.id,
                best.display_percent(),
                self.library.len()
            );
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, keywords: &[&str], aspect: AspectRatio, energy: u8) -> AnimationTemplate {
        AnimationTemplate {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            aspect_ratio: aspect,
            energy,
            professionalism: 6,
            colorfulness: 5,
            text_heavy: false,
            data_visualization: false,
            has_characters: false,
            platforms: Vec::new(),
            implementation: format!("{}Composition", id),
        }
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_punctuation() {
        let profile = KeywordRequestAnalyzer.analyze("Make a video for the launch!");
        assert_eq!(profile.keywords, vec!["video", "launch"]);
    }

    #[test]
    fn test_platform_and_aspect_detection() {
        let p = KeywordRequestAnalyzer.analyze("clip for TikTok");
        assert_eq!(p.platform, Some(Platform::Tiktok));
        assert_eq!(p.aspect_ratio, AspectRatio::Portrait);

        let p = KeywordRequestAnalyzer.analyze("square youtube teaser");
        assert_eq!(p.platform, Some(Platform::Youtube));
        assert_eq!(p.aspect_ratio, AspectRatio::Square);

        let p = KeywordRequestAnalyzer.analyze("a teaser");
        assert_eq!(p.platform, None);
        assert_eq!(p.aspect_ratio, AspectRatio::Landscape);
    }

    #[test]
    fn test_energy_and_tone_detection() {
        let p = KeywordRequestAnalyzer.analyze("calm corporate recap");
        assert_eq!(p.energy, 3);
        assert_eq!(p.professionalism, 9);

        let p = KeywordRequestAnalyzer.analyze("recap");
        assert_eq!((p.energy, p.professionalism), (5, 6));
    }

    #[test]
    fn test_data_viz_detection() {
        assert!(KeywordRequestAnalyzer.analyze("show 40% revenue growth").needs_data_visualization);
        assert!(!KeywordRequestAnalyzer.analyze("motion graphics intro").needs_data_visualization);
    }

    #[test]
    fn test_keyword_match_rules() {
        assert!(keywords_match("demo", "demo"));
        assert!(keywords_match("demos", "demo"));
        assert!(keywords_match("tutor", "tutorial"));
        assert!(keywords_match("analysis", "analytics"));
        assert!(!keywords_match("cat", "car"));
    }

    #[test]
    fn test_multi_keyword_bonus_is_additive() {
        let t = template("promo", &["product", "demo"], AspectRatio::Landscape, 5);
        let profile = KeywordRequestAnalyzer.analyze("product demo");
        let m = score_template(&t, &profile);
        assert_eq!(m.breakdown.keyword, 1.0);
        assert_eq!(m.breakdown.bonus, 0.15);
        assert!(m.breakdown.weighted <= 1.0);
        assert!((m.score - (m.breakdown.weighted + 0.15)).abs() < 1e-12);
        assert!(m.display_percent() <= 100);
    }

    #[test]
    fn test_aspect_only_platform_credit() {
        let t = template("wide", &[], AspectRatio::Landscape, 5);
        let m = score_template(&t, &KeywordRequestAnalyzer.analyze("youtube recap"));
        assert_eq!(m.breakdown.platform, 0.7);
        assert!(m.warnings.iter().any(|w| w.contains("YouTube")));
    }

    #[test]
    fn test_energy_warning() {
        let t = template("sleepy", &[], AspectRatio::Landscape, 1);
        let m = score_template(&t, &KeywordRequestAnalyzer.analyze("explosive hype reel"));
        assert!(m.warnings.iter().any(|w| w.starts_with("Energy mismatch")));
    }

    #[test]
    fn test_select_orders_and_truncates() {
        let selector = TemplateSelector::new(vec![
            template("a", &["zebra"], AspectRatio::Square, 5),
            template("b", &["launch", "product"], AspectRatio::Landscape, 5),
            template("c", &["launch"], AspectRatio::Landscape, 5),
        ]);
        let picks = selector.select("product launch", 2);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].template.id, "b");
        assert_eq!(picks[1].template.id, "c");
        assert!(picks[0].justification.starts_with("Matches your keywords"));
    }
}
