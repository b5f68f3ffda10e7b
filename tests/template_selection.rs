use synoid_motion::motion::library::builtin_library;
use synoid_motion::motion::templates::{AspectRatio, Platform, TemplateSelector};
use synoid_motion::motion::{analyze_content, calculate_duration};

#[test]
fn test_tiktok_product_request_prefers_product_pop() {
    let selector = TemplateSelector::new(builtin_library());
    let profile = selector.analyze_request("energetic product demo for TikTok");
    assert_eq!(profile.platform, Some(Platform::Tiktok));
    assert_eq!(profile.aspect_ratio, AspectRatio::Portrait);
    assert_eq!(profile.energy, 8);

    let picks = selector.select("energetic product demo for TikTok", 3);
    assert_eq!(picks.len(), 3);

    let best = &picks[0];
    assert_eq!(best.template.id, "product-pop");
    assert_eq!(best.breakdown.platform, 1.0);
    assert!((best.breakdown.style - 0.95).abs() < 1e-9);
    assert_eq!(best.matched_keywords, vec!["product", "demo"]);
    assert_eq!(best.breakdown.bonus, 0.15);
    assert!(best.warnings.is_empty(), "{:?}", best.warnings);
    assert!(best.justification.contains("Built for TikTok"));

    for pair in picks.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_vertical_tiktok_request_ranks_product_pop_first() {
    let selector = TemplateSelector::new(builtin_library());
    let request = "vertical tiktok product demo with fast energetic style";

    let profile = selector.analyze_request(request);
    assert_eq!(profile.platform, Some(Platform::Tiktok));
    assert_eq!(profile.aspect_ratio, AspectRatio::Portrait);
    assert_eq!(profile.energy, 8);

    let best = &selector.select(request, 3)[0];
    assert_eq!(best.template.id, "product-pop");
    assert_eq!(best.template.aspect_ratio, AspectRatio::Portrait);
    assert!(!best.template.data_visualization);
    assert_eq!(best.breakdown.platform, 1.0);
    assert!((best.breakdown.style - 0.95).abs() < 1e-9);
}

#[test]
fn test_pre_bonus_score_stays_in_unit_range() {
    let selector = TemplateSelector::new(builtin_library());
    let requests = [
        "",
        "quarterly revenue growth chart for linkedin investors",
        "calm corporate company overview for youtube",
        "explosive hype sale promo square instagram",
        "code tutorial walkthrough for developers",
        "motivation quote in vertical 9:16",
        "product launch demo showcase unboxing on tiktok",
    ];
    for request in requests {
        for m in selector.select(request, usize::MAX) {
            let b = m.breakdown;
            assert!(
                (0.0..=1.0).contains(&b.weighted),
                "{} scored {} for {:?}",
                m.template.id,
                b.weighted,
                request
            );
            assert!(b.bonus == 0.0 || b.bonus == 0.15);
            assert!((m.score - b.total()).abs() < 1e-12);
            assert!(m.display_percent() <= 100);
        }
    }
}

#[test]
fn test_data_request_surfaces_chart_templates() {
    let selector = TemplateSelector::new(builtin_library());
    let picks = selector.select("show our 40% revenue growth with a chart", 2);
    assert!(picks
        .iter()
        .all(|m| m.template.data_visualization && m.breakdown.content == 1.0));
}

#[test]
fn test_empty_library_selects_nothing() {
    let selector = TemplateSelector::new(Vec::new());
    assert!(selector.select("anything", 3).is_empty());
}

#[test]
fn test_script_analysis_feeds_duration_formula() {
    let script = "Learn how our API works. First, install the SDK. \
                  Then call the endpoint from your code. Sign up today!";
    let analysis = analyze_content(script, 4);

    assert!((0.3..=0.8).contains(&analysis.energy));
    assert!(analysis.features.technical);
    assert!(analysis.features.call_to_action);
    assert_eq!(analysis.duration.scene_count, 4);
    assert!((60..=90).contains(&analysis.duration.frames_per_scene));
    assert_eq!(
        analysis.duration,
        calculate_duration(4, analysis.duration.frames_per_scene)
    );
}
