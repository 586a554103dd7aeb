//! `lz4build plan`: show what would be built.

use anyhow::Result;
use clap::ValueEnum;

use crate::manifest::Lz4buildManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

pub fn run(
    manifest: Option<&Lz4buildManifest>,
    assignments: &[String],
    format: OutputFormat,
    deny_warnings: bool,
) -> Result<()> {
    print!("{}", render(manifest, assignments, format, deny_warnings)?);
    Ok(())
}

pub(crate) fn render(
    manifest: Option<&Lz4buildManifest>,
    assignments: &[String],
    format: OutputFormat,
    deny_warnings: bool,
) -> Result<String> {
    let plan = super::resolve_plan(manifest, assignments, deny_warnings)?;
    Ok(match format {
        OutputFormat::Human => plan.to_string(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&plan)?;
            json.push('\n');
            json
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_plan_lists_both_artifacts() {
        let out = render(None, &[], OutputFormat::Human, false).unwrap();
        assert!(out.contains("static artifact"));
        assert!(out.contains("dynamic artifact"));
    }

    #[test]
    fn json_plan_is_parseable() {
        let sets = ["freestanding=true".to_string(), "shared=false".to_string()];
        let out = render(None, &sets, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let artifacts = value["artifacts"].as_array().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0]["kind"], "static");
        assert_eq!(artifacts[0]["sources"]["units"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn empty_plan_warns_unless_denied() {
        let sets = ["static=no".to_string(), "shared=no".to_string()];
        let out = render(None, &sets, OutputFormat::Human, false).unwrap();
        assert!(out.contains("warning:"));
        assert!(render(None, &sets, OutputFormat::Human, true).is_err());
    }
}
