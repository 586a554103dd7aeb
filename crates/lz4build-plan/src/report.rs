//! Human-readable rendering of a build plan.

use std::fmt;

use crate::assemble::BuildPlan;
use crate::artifact::ArtifactDescriptor;

impl fmt::Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.configuration;
        writeln!(f, "=== Build Plan ===")?;
        writeln!(f, "Target: {}", c.platform)?;
        writeln!(f, "Optimize: {}", c.optimize)?;
        writeln!(
            f,
            "Freestanding: {}",
            if c.freestanding { "yes" } else { "no" }
        )?;
        writeln!(f, "Heap mode: {}", c.heap_mode.as_str())?;
        writeln!(
            f,
            "Memory access: {}",
            c.memory_access.map_or("default", |m| m.as_str())
        )?;

        for artifact in &self.artifacts {
            writeln!(f)?;
            write!(f, "{artifact}")?;
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            for warning in &self.warnings {
                writeln!(f, "warning: {warning}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} artifact: {} ---", self.kind, self.file_name())?;
        let units: Vec<&str> = self.sources.units.iter().map(|u| u.file_name()).collect();
        writeln!(f, "  Sources: {}", units.join(", "))?;
        writeln!(f, "  Headers: {}", self.header_files().join(", "))?;
        let defines: Vec<String> = self
            .defines
            .iter()
            .map(|d| format!("{}={}", d.name, d.value))
            .collect();
        writeln!(f, "  Defines: {}", defines.join(" "))?;
        if !self.macros.is_empty() {
            let names: Vec<&str> = self.macros.iter().map(|(_, d)| d.name.as_str()).collect();
            writeln!(f, "  Memory primitives: {}", names.join(", "))?;
        }
        let sanitizers = self.sanitizers.flags();
        writeln!(
            f,
            "  Sanitizers: {}",
            if sanitizers.is_empty() {
                "none".to_string()
            } else {
                sanitizers.join(" ")
            }
        )?;
        writeln!(f, "  Strip: {}", if self.strip { "yes" } else { "no" })?;
        writeln!(
            f,
            "  Libc: {}",
            if self.links_libc() { "linked" } else { "none" }
        )?;
        match self.fingerprint() {
            Ok(fingerprint) => writeln!(
                f,
                "  Fingerprint: {}",
                fingerprint.get(..16).unwrap_or(&fingerprint)
            ),
            Err(e) => writeln!(f, "  Fingerprint: unavailable ({e})"),
        }
    }
}
