/// `watch` command: long-running incremental deploy of a functions project.
use std::io::Write;

use crate::cli::OutputCtx;
use crate::cli::args::WatchArgs;
use crate::sandbox::{Engine, EngineCommand, ExecRequest, SandboxError, adjust_include_exclude};

use super::{with_build_bools, with_build_strings};

/// Engine request for `sandbox watch`.
#[must_use]
pub fn request(args: &WatchArgs) -> ExecRequest {
    let filters =
        adjust_include_exclude(args.build.include.as_deref(), args.build.exclude.as_deref());
    let req = ExecRequest::new(EngineCommand::ProjectWatch).arg(&args.directory);
    with_build_strings(with_build_bools(req, &args.build), &args.build, &filters)
}

/// Run `cloudctl sandbox watch` until the engine exits or is interrupted.
///
/// Output is streamed rather than captured.
///
/// # Errors
///
/// Returns `SandboxError` if the engine cannot be started or exits non-zero.
pub fn run<W: Write>(
    args: &WatchArgs,
    engine: &Engine,
    ctx: &OutputCtx,
    out: &mut W,
) -> Result<(), SandboxError> {
    let _t_watch = ctx.timer("project_watch");
    engine.run_streaming(&request(args), out)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::args::BuildArgs;

    #[test]
    fn test_request() {
        let args = WatchArgs {
            directory: PathBuf::from("proj"),
            build: BuildArgs {
                insecure: true,
                verbose_zip: true,
                apihost: Some("https://fn.example.com".to_owned()),
                exclude: Some("web".to_owned()),
                ..BuildArgs::default()
            },
        };
        assert_eq!(
            request(&args).argv(),
            vec![
                "project",
                "watch",
                "proj",
                "--insecure",
                "--verbose-zip",
                "--apihost",
                "https://fn.example.com",
                "--exclude",
                "web/,web",
            ]
        );
    }
}
