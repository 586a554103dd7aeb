//! Rendering artifact descriptors into toolchain commands.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use lz4build_plan::{ArtifactDescriptor, ArtifactKind};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolchainError};
use crate::tree::SourceTree;

/// Command-line dialect of the C compiler driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerFamily {
    /// GCC and drivers that only accept its options. Cross builds use a
    /// triple-prefixed driver.
    Gnu,
    /// Clang, which selects the target with `--target=`.
    Clang,
    /// `cl.exe` and `clang-cl`.
    Msvc,
}

impl CompilerFamily {
    /// Guess the family from the driver's file name. `cc` counts as GCC.
    pub fn detect(cc: &str) -> Self {
        let name = Path::new(cc)
            .file_stem()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name == "cl" || name.ends_with("clang-cl") {
            CompilerFamily::Msvc
        } else if name.contains("clang") {
            CompilerFamily::Clang
        } else {
            CompilerFamily::Gnu
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompilerFamily::Gnu => "gnu",
            CompilerFamily::Clang => "clang",
            CompilerFamily::Msvc => "msvc",
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The external programs used to compile, archive, and link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    /// C compiler driver, also used to link shared objects.
    #[serde(default = "default_cc")]
    pub cc: String,
    /// Static archiver.
    #[serde(default = "default_ar")]
    pub ar: String,
    /// Overrides the family detected from `cc`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<CompilerFamily>,
}

fn default_cc() -> String {
    "cc".to_string()
}

fn default_ar() -> String {
    "ar".to_string()
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            cc: default_cc(),
            ar: default_ar(),
            family: None,
        }
    }
}

/// Programs and extra flags that reach one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTools {
    pub cc: String,
    pub ar: String,
    /// Added to every compile and link command.
    pub target_flags: Vec<String>,
}

impl Toolchain {
    pub fn family(&self) -> CompilerFamily {
        self.family.unwrap_or_else(|| CompilerFamily::detect(&self.cc))
    }

    /// Resolve the programs and flags for `triple` (`None` for the host).
    ///
    /// GCC cannot switch targets, so a cross build with the generic `cc`,
    /// `gcc` or `ar` swaps in `<triple>-gcc` and `<triple>-ar`. An explicitly
    /// configured driver is used as given.
    pub fn for_target(&self, triple: Option<&str>) -> Result<TargetTools> {
        let family = self.family();
        if family == CompilerFamily::Msvc {
            return Err(ToolchainError::UnsupportedCompiler {
                program: self.cc.clone(),
            });
        }

        let Some(triple) = triple else {
            return Ok(TargetTools {
                cc: self.cc.clone(),
                ar: self.ar.clone(),
                target_flags: Vec::new(),
            });
        };
        if triple.ends_with("-msvc") {
            return Err(ToolchainError::UnsupportedTarget {
                triple: triple.to_string(),
            });
        }

        Ok(match family {
            CompilerFamily::Clang => TargetTools {
                cc: self.cc.clone(),
                ar: self.ar.clone(),
                target_flags: vec![format!("--target={triple}")],
            },
            _ => TargetTools {
                cc: match self.cc.as_str() {
                    "cc" | "gcc" => format!("{triple}-gcc"),
                    other => other.to_string(),
                },
                ar: match self.ar.as_str() {
                    "ar" => format!("{triple}-ar"),
                    other => other.to_string(),
                },
                target_flags: Vec::new(),
            },
        })
    }
}

/// What a command contributes to the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Compile,
    Archive,
    Link,
}

/// One program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub step: Step,
    pub program: String,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    fn new(step: Step, program: &str) -> Self {
        Self {
            step,
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Whether any argument equals `needle`.
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Ordered commands producing one artifact.
#[derive(Debug, Clone)]
pub struct CommandPlan {
    pub kind: ArtifactKind,
    pub commands: Vec<ToolCommand>,
    /// Final artifact path.
    pub output: PathBuf,
}

impl CommandPlan {
    pub fn compile_commands(&self) -> impl Iterator<Item = &ToolCommand> {
        self.commands.iter().filter(|c| c.step == Step::Compile)
    }
}

/// Render the commands that build `descriptor` from `tree`.
///
/// Objects go to `object_dir`; the artifact goes to `out_dir`.
pub fn render(
    toolchain: &Toolchain,
    descriptor: &ArtifactDescriptor,
    tree: &SourceTree,
    object_dir: &Path,
    out_dir: &Path,
) -> Result<CommandPlan> {
    let tools = toolchain.for_target(descriptor.platform.triple.as_deref())?;
    let include = format!("-I{}", tree.lib_dir().display());
    let mut commands = Vec::new();
    let mut objects = Vec::new();

    for invocation in descriptor.unit_invocations() {
        let object = object_dir.join(invocation.unit.object_name());
        commands.push(
            ToolCommand::new(Step::Compile, &tools.cc)
                .args(tools.target_flags.iter().map(String::as_str))
                .args(invocation.flags)
                .arg(include.as_str())
                .arg("-c")
                .arg(tree.unit_path(invocation.unit))
                .arg("-o")
                .arg(object.as_os_str()),
        );
        objects.push(object);
    }

    let output = out_dir.join(descriptor.file_name());
    let finish = match descriptor.kind {
        ArtifactKind::Static => ToolCommand::new(Step::Archive, &tools.ar)
            .arg("rcs")
            .arg(output.as_os_str())
            .args(objects.iter().map(|o| o.as_os_str())),
        ArtifactKind::Dynamic => ToolCommand::new(Step::Link, &tools.cc)
            .args(objects.iter().map(|o| o.as_os_str()))
            .args(tools.target_flags.iter().map(String::as_str))
            .args(descriptor.link_flags())
            .arg("-o")
            .arg(output.as_os_str()),
    };
    commands.push(finish);

    Ok(CommandPlan {
        kind: descriptor.kind,
        commands,
        output,
    })
}
