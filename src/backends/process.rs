// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::TransformError;

/// Run an external tool to completion and require a zero exit status.
///
/// The child is killed if `timeout` elapses first. Stderr (or stdout, when the
/// tool reports on stdout only) is carried into the error on failure.
pub async fn run_tool(
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    timeout: Option<Duration>,
) -> Result<Output, TransformError> {
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let pending = command.output();
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, pending)
            .await
            .map_err(|_| TransformError::Timeout {
                program: program.to_string(),
                timeout: limit,
            })?,
        None => pending.await,
    };

    let output = result.map_err(|source| TransformError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(TransformError::ExitStatus {
            program: program.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(output)
}

/// Replace every `{key}` in `template` with its value.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders() {
        let rendered = render(
            "open {host}\nsync \"{local}\" {remote} {host}",
            &[("host", "sftp://h"), ("local", "/out"), ("remote", "/srv")],
        );
        assert_eq!(rendered, "open sftp://h\nsync \"/out\" /srv sftp://h");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(render("{input} {other}", &[("input", "a")]), "a {other}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        let err = run_tool(
            "sh",
            &["-c".to_string(), "echo broken >&2; exit 3".to_string()],
            None,
            None,
        )
        .await
        .unwrap_err();

        match err {
            TransformError::ExitStatus { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_tool_times_out() {
        let err = run_tool(
            "sh",
            &["-c".to_string(), "sleep 5".to_string()],
            None,
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TransformError::Timeout { .. }));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = run_tool("definitely-not-a-real-tool-xyz", &[], None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TransformError::Spawn { .. }));
    }
}
