//! Environment variable access with a server-owned overlay.
//!
//! Writes never touch the process environment. They land in an overlay that
//! lives exactly as long as the server process: reads merge the overlay over
//! the inherited environment, and the command runner applies the overlay to
//! children spawned after the write. Children spawned earlier are
//! unaffected, and nothing is persisted.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use crate::types::{CommandResult, EnvVar};

#[derive(Debug, Default)]
pub struct EnvOverlay {
    vars: RwLock<HashMap<String, String>>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable, overlay first, inherited environment second.
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.read().expect("env overlay poisoned").get(name) {
            return Some(value.clone());
        }
        std::env::var(name).ok()
    }

    /// Record a variable in the overlay.
    pub fn set(&self, name: &str, value: &str) -> CommandResult {
        let start = Instant::now();
        let command = format!("export {}={}", name, value);

        if name.is_empty() || name.contains('=') || name.contains('\0') {
            return CommandResult::failed(
                command,
                format!("Error setting environment variable: invalid name '{}'", name),
                start.elapsed().as_secs_f64(),
            );
        }

        self.vars
            .write()
            .expect("env overlay poisoned")
            .insert(name.to_string(), value.to_string());

        CommandResult::succeeded(
            command,
            format!("Environment variable '{}' set to '{}'", name, value),
            start.elapsed().as_secs_f64(),
        )
    }

    /// All variables visible to this server: the inherited environment with
    /// the overlay applied on top, sorted by name.
    pub fn all(&self) -> Vec<EnvVar> {
        let mut merged: HashMap<String, String> = std::env::vars().collect();
        for (name, value) in self.vars.read().expect("env overlay poisoned").iter() {
            merged.insert(name.clone(), value.clone());
        }

        let mut vars: Vec<EnvVar> = merged
            .into_iter()
            .map(|(name, value)| EnvVar { name, value })
            .collect();
        vars.sort_by(|a, b| a.name.cmp(&b.name));
        vars
    }

    /// The overlay pairs to apply to spawned children.
    pub fn overlay_pairs(&self) -> Vec<(String, String)> {
        self.vars
            .read()
            .expect("env overlay poisoned")
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let env = EnvOverlay::new();
        let result = env.set("SYSTOOLS_OVERLAY_TEST", "v1");
        assert!(result.success);
        assert_eq!(result.return_code, 0);
        assert_eq!(env.get("SYSTOOLS_OVERLAY_TEST").as_deref(), Some("v1"));
    }

    #[test]
    fn test_overlay_does_not_touch_process_env() {
        let env = EnvOverlay::new();
        env.set("SYSTOOLS_OVERLAY_PRIVATE", "hidden");
        assert!(std::env::var("SYSTOOLS_OVERLAY_PRIVATE").is_err());
    }

    #[test]
    fn test_get_falls_back_to_inherited() {
        let env = EnvOverlay::new();
        // PATH is set in any realistic test environment
        assert!(env.get("PATH").is_some());
    }

    #[test]
    fn test_overlay_wins_in_all() {
        let env = EnvOverlay::new();
        env.set("SYSTOOLS_OVERLAY_ALL", "yes");
        let vars = env.all();
        assert!(vars
            .iter()
            .any(|v| v.name == "SYSTOOLS_OVERLAY_ALL" && v.value == "yes"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let env = EnvOverlay::new();
        let result = env.set("BAD=NAME", "x");
        assert!(!result.success);
        assert_eq!(result.return_code, 1);
        assert!(result.stderr.contains("invalid name"));
    }
}
