//! Asset compiler boundary.
//!
//! Compile jobs hand source bytes to an implementation of
//! [`ScriptCompiler`] and treat everything behind the call as opaque. Only
//! the contract matters to the pipeline: artifacts on success, a
//! [`CompileFailure`] otherwise, with rejection and fault kept apart so the
//! executor can map them onto the right outcome.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// One artifact produced by a compiler, still in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Path relative to the platform's cache root.
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Everything a compiler produced for one job, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledOutput {
    pub artifacts: Vec<CompiledArtifact>,
    /// Whether the compiler resolved product dependencies itself. Copied
    /// onto every artifact's product metadata.
    pub dependencies_handled: bool,
}

impl CompiledOutput {
    /// Output with a single artifact and no dependency handling.
    pub fn single(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            artifacts: vec![CompiledArtifact {
                path: path.into(),
                bytes,
            }],
            dependencies_handled: false,
        }
    }
}

/// Why a compile call produced no artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileFailure {
    /// The compiler examined the source and refused it. Deterministic;
    /// the diagnostic goes back to the asset author verbatim.
    #[error("{diagnostic}")]
    Rejected { diagnostic: String },
    /// The compiler itself fell over: spawn failure, broken pipe, killed
    /// by a signal. Says nothing about the source asset.
    #[error("compiler fault: {description}")]
    Fault { description: String },
}

/// Asset-specific compiler collaborator.
///
/// Implementations must be callable from any worker thread.
pub trait ScriptCompiler: Send + Sync {
    /// Compile one asset's source bytes for a platform.
    ///
    /// `source_name` is the asset's file name, used to derive artifact
    /// names; the full source path stays with the caller.
    fn compile(
        &self,
        source: &[u8],
        source_name: &str,
        platform: &str,
    ) -> Result<CompiledOutput, CompileFailure>;
}

/// Stand-in used when no compiler command is configured.
///
/// Rejects every job with a pointer at the missing configuration, so a
/// compile platform without a compiler fails loudly instead of silently
/// copying.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredCompiler;

impl ScriptCompiler for UnconfiguredCompiler {
    fn compile(
        &self,
        _source: &[u8],
        source_name: &str,
        platform: &str,
    ) -> Result<CompiledOutput, CompileFailure> {
        Err(CompileFailure::Rejected {
            diagnostic: format!(
                "{}: platform '{}' wants compiled output but compiler.command is not configured",
                source_name, platform
            ),
        })
    }
}

/// Compiler that pipes the source through an external command.
///
/// The command is an argv template run as a filter: source bytes on stdin,
/// the compiled artifact on stdout, diagnostics on stderr. `{platform}` in
/// any argument is replaced with the job's platform identifier before
/// spawning. A non-zero exit is a rejection carrying the stderr text; a
/// spawn failure or signal death is a fault.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    argv: Vec<String>,
    output_extension: String,
}

impl CommandCompiler {
    pub fn new(argv: Vec<String>, output_extension: impl Into<String>) -> Self {
        Self {
            argv,
            output_extension: output_extension.into(),
        }
    }

    /// Argv with `{platform}` placeholders expanded.
    fn expand_argv(&self, platform: &str) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.replace("{platform}", platform))
            .collect()
    }

    /// Relative artifact path for a source file name: the stem plus the
    /// configured output extension.
    fn artifact_name(&self, source_name: &str) -> PathBuf {
        let stem = Path::new(source_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(source_name);
        PathBuf::from(format!("{}.{}", stem, self.output_extension))
    }
}

impl ScriptCompiler for CommandCompiler {
    fn compile(
        &self,
        source: &[u8],
        source_name: &str,
        platform: &str,
    ) -> Result<CompiledOutput, CompileFailure> {
        let argv = self.expand_argv(platform);
        if argv.is_empty() {
            return Err(CompileFailure::Rejected {
                diagnostic: "compiler.command is empty".to_string(),
            });
        }

        let mut child = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CompileFailure::Fault {
                description: format!("failed to spawn '{}': {}", argv[0], e),
            })?;

        // Feed the source and close stdin so the child sees EOF. A broken
        // pipe means the child exited early; its exit status decides below.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(source) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CompileFailure::Fault {
                        description: format!("failed to feed compiler stdin: {}", e),
                    });
                }
            }
        }

        let output = child.wait_with_output().map_err(|e| CompileFailure::Fault {
            description: format!("failed to collect compiler output: {}", e),
        })?;

        if output.status.success() {
            return Ok(CompiledOutput::single(
                self.artifact_name(source_name),
                output.stdout,
            ));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(code) => Err(CompileFailure::Rejected {
                diagnostic: if stderr.is_empty() {
                    format!("compiler exited with status {}", code)
                } else {
                    stderr
                },
            }),
            // No exit code means the child was killed by a signal.
            None => Err(CompileFailure::Fault {
                description: format!("compiler terminated abnormally ({})", output.status),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_swaps_extension() {
        let compiler = CommandCompiler::new(vec!["luac".to_string()], "luac");
        assert_eq!(compiler.artifact_name("walk.lua"), PathBuf::from("walk.luac"));
        assert_eq!(compiler.artifact_name("walk"), PathBuf::from("walk.luac"));
    }

    #[test]
    fn test_expand_argv_substitutes_platform() {
        let compiler = CommandCompiler::new(
            vec![
                "luac".to_string(),
                "--target".to_string(),
                "{platform}".to_string(),
            ],
            "luac",
        );
        assert_eq!(
            compiler.expand_argv("console"),
            vec!["luac", "--target", "console"]
        );
    }

    #[test]
    fn test_unconfigured_compiler_rejects() {
        let result = UnconfiguredCompiler.compile(b"print(1)", "walk.lua", "console");
        match result {
            Err(CompileFailure::Rejected { diagnostic }) => {
                assert!(diagnostic.contains("walk.lua"));
                assert!(diagnostic.contains("console"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_compiler_pipes_stdin_to_stdout() {
        let compiler = CommandCompiler::new(vec!["cat".to_string()], "luac");
        let output = compiler
            .compile(b"print('walk')", "walk.lua", "pc")
            .unwrap();
        assert_eq!(output.artifacts.len(), 1);
        assert_eq!(output.artifacts[0].path, PathBuf::from("walk.luac"));
        assert_eq!(output.artifacts[0].bytes, b"print('walk')");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_rejection_with_stderr() {
        let compiler = CommandCompiler::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo 'walk.lua:3: unexpected symbol' >&2; exit 3".to_string(),
            ],
            "luac",
        );
        match compiler.compile(b"broken", "walk.lua", "pc") {
            Err(CompileFailure::Rejected { diagnostic }) => {
                assert_eq!(diagnostic, "walk.lua:3: unexpected symbol");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_without_stderr_reports_status() {
        let compiler = CommandCompiler::new(
            vec!["sh".to_string(), "-c".to_string(), "exit 7".to_string()],
            "luac",
        );
        match compiler.compile(b"broken", "walk.lua", "pc") {
            Err(CompileFailure::Rejected { diagnostic }) => {
                assert!(diagnostic.contains("status 7"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_binary_is_fault() {
        let compiler = CommandCompiler::new(
            vec!["definitely-not-a-real-compiler-binary".to_string()],
            "luac",
        );
        match compiler.compile(b"x", "walk.lua", "pc") {
            Err(CompileFailure::Fault { description }) => {
                assert!(description.contains("failed to spawn"));
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_platform_placeholder_reaches_command() {
        let compiler = CommandCompiler::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "cat > /dev/null; printf '{platform}'".to_string(),
            ],
            "bin",
        );
        let output = compiler.compile(b"src", "walk.lua", "console").unwrap();
        assert_eq!(output.artifacts[0].bytes, b"console");
    }
}
