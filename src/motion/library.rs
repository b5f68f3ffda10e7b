// SYNOID Template Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Built-in animation templates, plus loading a replacement library from JSON.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::motion::templates::{AnimationTemplate, AspectRatio, Platform};

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    name: &str,
    description: &str,
    keywords: &[&str],
    aspect_ratio: AspectRatio,
    (energy, professionalism, colorfulness): (u8, u8, u8),
    (text_heavy, data_visualization, has_characters): (bool, bool, bool),
    platforms: &[Platform],
    implementation: &str,
) -> AnimationTemplate {
    AnimationTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        aspect_ratio,
        energy,
        professionalism,
        colorfulness,
        text_heavy,
        data_visualization,
        has_characters,
        platforms: platforms.to_vec(),
        implementation: implementation.to_string(),
    }
}

pub fn builtin_library() -> Vec<AnimationTemplate> {
    use AspectRatio::*;
    use Platform::*;

    vec![
        entry(
            "product-pop",
            "Product Pop",
            "Punchy vertical product reveal with bouncing feature callouts",
            &["product", "demo", "showcase", "launch", "unboxing"],
            Portrait,
            (8, 5, 8),
            (false, false, false),
            &[Tiktok, Instagram],
            "ProductPop",
        ),
        entry(
            "explainer-cast",
            "Explainer Cast",
            "Character-led explainer with narrated steps",
            &["explainer", "tutorial", "education", "howto", "walkthrough"],
            Landscape,
            (5, 7, 6),
            (true, false, true),
            &[Youtube],
            "ExplainerCast",
        ),
        entry(
            "data-story",
            "Data Story",
            "Animated charts building a narrative around key numbers",
            &["data", "statistics", "growth", "report", "quarterly", "metrics"],
            Square,
            (4, 9, 4),
            (true, true, false),
            &[Linkedin],
            "DataStory",
        ),
        entry(
            "code-walkthrough",
            "Code Walkthrough",
            "Editor window with typed code and highlighted lines",
            &["code", "programming", "developer", "tutorial", "syntax"],
            Landscape,
            (4, 8, 5),
            (true, false, false),
            &[Youtube, Twitter],
            "CodeEditorWalkthrough",
        ),
        entry(
            "kinetic-type",
            "Kinetic Type",
            "Word-by-word kinetic typography for quotes and announcements",
            &["quote", "typography", "text", "lyrics", "motivation", "announcement"],
            Portrait,
            (7, 5, 7),
            (true, false, false),
            &[Instagram, Tiktok],
            "KineticType",
        ),
        entry(
            "corporate-overview",
            "Corporate Overview",
            "Measured brand overview with team and mission beats",
            &["company", "corporate", "overview", "brand", "team", "mission"],
            Landscape,
            (4, 9, 4),
            (false, false, true),
            &[Linkedin, Youtube, Facebook],
            "CorporateOverview",
        ),
        entry(
            "promo-burst",
            "Promo Burst",
            "Loud, colorful sale and event promo",
            &["sale", "promo", "offer", "discount", "event"],
            Square,
            (9, 3, 9),
            (false, false, false),
            &[Instagram, Facebook, Twitter],
            "PromoBurst",
        ),
        entry(
            "metrics-dashboard",
            "Metrics Dashboard",
            "Live-dashboard style KPI tiles and trend lines",
            &["dashboard", "analytics", "kpi", "revenue", "chart"],
            Landscape,
            (5, 8, 5),
            (false, true, false),
            &[Youtube, Linkedin],
            "MetricsDashboard",
        ),
    ]
}

/// Load a library from a JSON array of templates.
pub fn load_library(path: &Path) -> Result<Vec<AnimationTemplate>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template library {:?}", path))?;
    let library: Vec<AnimationTemplate> = serde_json::from_str(&data)
        .with_context(|| format!("Invalid template library {:?}", path))?;
    info!("[SELECTOR] Loaded {} template(s) from {:?}", library.len(), path);
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_unique_and_attributes_in_range() {
        let library = builtin_library();
        let ids: HashSet<_> = library.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), library.len());
        for t in &library {
            for v in [t.energy, t.professionalism, t.colorfulness] {
                assert!((1..=10).contains(&v), "{} out of range", t.id);
            }
            assert!(!t.keywords.is_empty());
        }
    }

    #[test]
    fn test_load_library_from_json() {
        let dir = std::env::temp_dir().join("synoid_motion_library_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("library.json");
        fs::write(&path, serde_json::to_string(&builtin_library()[..2]).unwrap()).unwrap();

        let loaded = load_library(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].aspect_ratio, AspectRatio::Portrait);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_library_missing_file_errors() {
        assert!(load_library(Path::new("__no_such_library.json")).is_err());
    }
}
