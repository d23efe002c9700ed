// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EasyDoc — Core types, option families, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod options;
pub mod types;

pub use config::EngineConfig;
pub use error::EasydocError;
pub use options::ConversionOptions;
pub use types::*;
