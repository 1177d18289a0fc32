/// `deploy` command: upload a local functions project to the cloud.
use std::io::Write;

use crate::cli::OutputCtx;
use crate::cli::args::DeployArgs;
use crate::cli::output::{write_sandbox_output, write_transcript};
use crate::sandbox::rewrite::rewrite_deploy_transcript;
use crate::sandbox::{Engine, EngineCommand, ExecRequest, SandboxError, adjust_include_exclude};

use super::{with_build_bools, with_build_strings};

/// Engine request for `sandbox deploy`.
#[must_use]
pub fn request(args: &DeployArgs) -> ExecRequest {
    let filters =
        adjust_include_exclude(args.build.include.as_deref(), args.build.exclude.as_deref());
    let req = ExecRequest::new(EngineCommand::ProjectDeploy).arg(&args.directory);
    let req = with_build_bools(req, &args.build).bool_flag("incremental", args.incremental);
    with_build_strings(req, &args.build, &filters)
}

/// Run `cloudctl sandbox deploy`.
///
/// The transcript is rewritten and shown even when the deploy fails, since
/// it is usually needed to make sense of the error.
///
/// # Errors
///
/// Returns `SandboxError` if the engine cannot be run or reports a failure.
pub fn run<W: Write>(
    args: &DeployArgs,
    engine: &Engine,
    ctx: &OutputCtx,
    out: &mut W,
) -> Result<(), SandboxError> {
    let _t_deploy = ctx.timer("project_deploy");
    let mut output = engine.run(&request(args))?;
    drop(_t_deploy);

    match output.failure() {
        Some(err) if output.captured.is_empty() => Err(err),
        None => {
            rewrite_deploy_transcript(&mut output);
            write_sandbox_output(&output, ctx, out)?;
            Ok(())
        }
        Some(err) => {
            rewrite_deploy_transcript(&mut output);
            write_transcript(&output.captured, out);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::args::BuildArgs;

    #[test]
    fn test_request_appends_web_exclusion() {
        let args = DeployArgs {
            directory: PathBuf::from("proj"),
            build: BuildArgs {
                auth: Some("tok".to_owned()),
                include: Some("web,api".to_owned()),
                remote_build: true,
                yarn: true,
                ..BuildArgs::default()
            },
            incremental: true,
        };
        assert_eq!(
            request(&args).argv(),
            vec![
                "project",
                "deploy",
                "proj",
                "--yarn",
                "--remote-build",
                "--incremental",
                "--auth",
                "tok",
                "--include",
                "web/,api",
                "--exclude",
                "web",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_with_transcript_returns_engine_error() {
        use crate::commands::test_support::{fake_engine, text_ctx};

        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(
            dir.path(),
            "echo '{\"captured\":[\"Deploying project proj\"],\"error\":\"build failed\"}'\n",
        );
        let args = DeployArgs {
            directory: PathBuf::from("proj"),
            build: BuildArgs::default(),
            incremental: false,
        };
        let mut out = Vec::new();
        let err = run(&args, &engine, &text_ctx(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "build failed");
        assert_eq!(String::from_utf8(out).unwrap(), "Deployed proj\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_success_prints_rewritten_transcript() {
        use crate::commands::test_support::{fake_engine, text_ctx};

        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(
            dir.path(),
            "echo '{\"captured\":[\"Deploying project proj\",\"Deployed actions:\",\"  - hello\"]}'\n",
        );
        let args = DeployArgs {
            directory: PathBuf::from("proj"),
            build: BuildArgs::default(),
            incremental: false,
        };
        let mut out = Vec::new();
        run(&args, &engine, &text_ctx(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Deployed proj\n\
             Deployed functions ('cloudctl sbx fn get <funcName> --url' for URL):\n  - hello\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_without_transcript() {
        use crate::commands::test_support::{fake_engine, text_ctx};

        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(dir.path(), "echo 'no credentials' >&2\nexit 1\n");
        let args = DeployArgs {
            directory: PathBuf::from("proj"),
            build: BuildArgs::default(),
            incremental: false,
        };
        let mut out = Vec::new();
        let err = run(&args, &engine, &text_ctx(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "no credentials");
        assert!(out.is_empty());
        assert_eq!(err.exit_code(), 1);
    }
}
