// SYNOID Motion Engine Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::motion::library::{builtin_library, load_library};
use crate::motion::templates::{AnimationTemplate, DEFAULT_TOP_N};

pub const CONFIG_FILE: &str = "motion_config.json";
pub const CONFIG_ENV: &str = "SYNOID_MOTION_CONFIG";
pub const STORE_ENV: &str = "SYNOID_MOTION_STORE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub store_path: PathBuf,
    pub fps: u32,
    pub default_frames_per_scene: u32,
    pub top_n: usize,
    pub template_library: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            fps: 30,
            default_frames_per_scene: 75,
            top_n: DEFAULT_TOP_N,
            template_library: None,
        }
    }
}

/// `<local data dir>/synoid/learned_rules.json`, or the working directory
/// when the platform has no data dir.
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("synoid").join("learned_rules.json"))
        .unwrap_or_else(|| PathBuf::from("learned_rules.json"))
}

impl EngineConfig {
    /// Config file (or `SYNOID_MOTION_CONFIG`), then the store override.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
        let mut config = Self::load_from(Path::new(&path));
        if let Ok(store) = std::env::var(STORE_ENV) {
            if !store.trim().is_empty() {
                config.store_path = PathBuf::from(store);
            }
        }
        config
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str(&content) {
                Ok(config) => {
                    info!("[CONFIG] Loaded engine config from {:?}", path);
                    return config;
                }
                Err(e) => warn!("[CONFIG] Ignoring invalid {:?}: {}", path, e),
            }
        }
        info!("[CONFIG] Using default engine config");
        Self::default()
    }

    /// The configured template library, or the built-in one.
    pub fn library(&self) -> Vec<AnimationTemplate> {
        match &self.template_library {
            Some(path) => load_library(path).unwrap_or_else(|e| {
                warn!("[CONFIG] {:#}; using built-in templates", e);
                builtin_library()
            }),
            None => builtin_library(),
        }
    }
}
