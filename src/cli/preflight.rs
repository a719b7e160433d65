//! Pre-flight checks before expensive operations.
//!
//! Catches a missing API key or caption tool before a transcript is fetched
//! or the first model call is made.

use crate::config::LlmSettings;
use crate::error::{Result, StudyError};
use std::process::Command;

/// Check that the API key variable named in the settings is set.
pub fn check_api_key(llm: &LlmSettings) -> Result<()> {
    match std::env::var(&llm.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(StudyError::Config(format!(
            "{} is empty. Set it with: export {}='sk-...'",
            llm.api_key_env, llm.api_key_env
        ))),
        Err(_) => Err(StudyError::Config(format!(
            "{} not set. Set it with: export {}='sk-...'",
            llm.api_key_env, llm.api_key_env
        ))),
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(StudyError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StudyError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(StudyError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
