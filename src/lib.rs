// SYNOID Motion Library
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod config;
pub mod motion;
