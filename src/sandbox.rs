//! Runs a generated script in an isolated Docker container.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

pub const DEFAULT_IMAGE: &str = "python:3.11-slim";
const SCRIPT_FILE: &str = "pipeline.py";

/// Container limits and image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    pub image: String,
    pub memory: String,
    pub cpus: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.into(),
            memory: "2g".into(),
            cpus: "2".into(),
        }
    }
}

/// Captured output of one run. `failure` is set when the script exited
/// non-zero, so an empty successful run stays distinguishable from a failed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub output: String,
    pub failure: Option<String>,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Failed to prepare script directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to start container runtime '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Executes script text and reports its combined output.
pub trait ScriptExecutor {
    fn execute(&self, script: &str) -> Result<ExecutionReport, SandboxError>;
}

/// `docker run` with no network and capped memory/CPU.
#[derive(Debug, Clone, Default)]
pub struct DockerExecutor {
    config: SandboxConfig,
}

impl DockerExecutor {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Arguments passed to `docker` for a script mounted from `dir`.
    pub fn docker_args(&self, dir: &Path) -> Vec<String> {
        vec![
            "run".into(),
            "--rm".into(),
            "-v".into(),
            format!("{}:/code", dir.display()),
            "--network".into(),
            "none".into(),
            "--memory".into(),
            self.config.memory.clone(),
            "--cpus".into(),
            self.config.cpus.clone(),
            self.config.image.clone(),
            "python".into(),
            format!("/code/{}", SCRIPT_FILE),
        ]
    }
}

impl ScriptExecutor for DockerExecutor {
    fn execute(&self, script: &str) -> Result<ExecutionReport, SandboxError> {
        let dir = tempfile::tempdir().map_err(SandboxError::Workspace)?;
        std::fs::write(dir.path().join(SCRIPT_FILE), script).map_err(SandboxError::Workspace)?;

        let args = self.docker_args(dir.path());
        tracing::info!(image = %self.config.image, "running script in sandbox");
        tracing::debug!(?args, "docker invocation");

        let out = Command::new("docker")
            .args(&args)
            .output()
            .map_err(|source| SandboxError::Spawn {
                program: "docker".into(),
                source,
            })?;

        let report = ExecutionReport {
            output: combine_output(&out.stdout, &out.stderr),
            failure: (!out.status.success()).then(|| format!("execution error: {}", out.status)),
        };
        if let Some(failure) = &report.failure {
            tracing::warn!(%failure, "sandboxed script failed");
        }
        Ok(report)
    }
}

/// Stdout, then stderr under a `[STDERR]` marker when there is any.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut output = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        output.push_str("\n[STDERR]\n");
        output.push_str(&String::from_utf8_lossy(stderr));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_args_isolate_the_container() {
        let exec = DockerExecutor::new(SandboxConfig {
            image: "python:3.12".into(),
            memory: "512m".into(),
            cpus: "1".into(),
        });
        let args = exec.docker_args(Path::new("/tmp/run1"));
        assert_eq!(
            args.join(" "),
            "run --rm -v /tmp/run1:/code --network none --memory 512m --cpus 1 \
             python:3.12 python /code/pipeline.py"
        );
    }

    #[test]
    fn default_config() {
        let cfg = SandboxConfig::default();
        assert_eq!(cfg.image, "python:3.11-slim");
        assert_eq!(cfg.memory, "2g");
        assert_eq!(cfg.cpus, "2");
    }

    #[test]
    fn stderr_is_appended_under_marker() {
        assert_eq!(combine_output(b"ok\n", b""), "ok\n");
        assert_eq!(combine_output(b"ok\n", b"warn"), "ok\n\n[STDERR]\nwarn");
    }
}
