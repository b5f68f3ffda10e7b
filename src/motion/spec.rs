// SYNOID Motion Spec - Animation Description Model
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The structured description of a motion-graphics clip as produced by the
// spec assembly step. Everything here is plain serde data; the checks that
// run over it live in `catalog` and `enforcer`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Level at which scale transforms are allowed to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScaleLevel {
    /// Only the scene/shot may scale; element scales compound and are rejected.
    Scene,
    /// Elements may carry their own scale.
    #[default]
    Element,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Typography {
    pub font_family: Option<String>,
    /// Set when the brief explicitly asks for a serif face.
    #[serde(default)]
    pub serif_requested: bool,
}

/// How the spec's total duration was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationDeclaration {
    pub scene_count: u32,
    pub frames_per_scene: u32,
    pub total_frames: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single visual element. Elements are flat; they never own children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Peak speed in units per frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    /// Any other transform values the assembler attached.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl Element {
    pub fn new(element_type: &str, width: u32, height: u32) -> Self {
        Self {
            element_type: element_type.to_string(),
            width,
            height,
            scale: None,
            velocity: None,
            font_size: None,
            padding: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the element carries a scale other than 1.0.
    pub fn has_non_identity_scale(&self) -> bool {
        self.scale
            .map(|s| (s - 1.0).abs() > f64::EPSILON)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub start_frame: u32,
    pub end_frame: u32,
    #[serde(default)]
    pub entry_transition: Option<String>,
    #[serde(default)]
    pub exit_transition: Option<String>,
    #[serde(default)]
    pub motion_blur: bool,
    /// Scene content is laid out through the no-overlap container.
    #[serde(default)]
    pub uses_layout_container: bool,
    /// Scene declares continuous (never fully static) motion.
    #[serde(default)]
    pub continuous_motion: bool,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Scene {
    /// A scene that satisfies every structural base rule, ready for elements.
    pub fn new(name: &str, start_frame: u32, end_frame: u32) -> Self {
        Self {
            name: name.to_string(),
            start_frame,
            end_frame,
            entry_transition: Some("fade".to_string()),
            exit_transition: None,
            motion_blur: false,
            uses_layout_container: true,
            continuous_motion: true,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub scale_level: ScaleLevel,
    #[serde(default)]
    pub duration: Option<DurationDeclaration>,
    pub scenes: Vec<Scene>,
}

impl AnimationSpec {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self {
            typography: Typography::default(),
            scale_level: ScaleLevel::default(),
            duration: None,
            scenes,
        }
    }
}
