// ABOUTME: Render function settings: architecture, log group, memory, timeout.
// ABOUTME: Every field is defaulted so a bare `lambda:` block is valid.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    #[default]
    Arm64,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Arm64 => write!(f, "arm64"),
            Architecture::X86_64 => write!(f, "x86_64"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaSettings {
    #[serde(default)]
    pub architecture: Architecture,

    #[serde(default = "default_create_log_group")]
    pub create_cloud_watch_log_group: bool,

    #[serde(default = "default_memory_size")]
    pub memory_size_in_mb: u32,

    #[serde(default = "default_timeout")]
    pub timeout_in_seconds: u32,
}

fn default_create_log_group() -> bool {
    true
}

fn default_memory_size() -> u32 {
    2048
}

fn default_timeout() -> u32 {
    240
}

impl Default for LambdaSettings {
    fn default() -> Self {
        LambdaSettings {
            architecture: Architecture::default(),
            create_cloud_watch_log_group: default_create_log_group(),
            memory_size_in_mb: default_memory_size(),
            timeout_in_seconds: default_timeout(),
        }
    }
}
