/// `get-metadata` command: summarize a functions project as JSON.
use std::io::Write;

use crate::cli::OutputCtx;
use crate::cli::args::GetMetadataArgs;
use crate::cli::output::write_sandbox_output;
use crate::sandbox::{Engine, EngineCommand, ExecRequest, SandboxError, adjust_include_exclude};

/// Engine request for `sandbox get-metadata`. Always asks for JSON.
#[must_use]
pub fn request(args: &GetMetadataArgs) -> ExecRequest {
    let filters = adjust_include_exclude(args.include.as_deref(), args.exclude.as_deref());
    ExecRequest::new(EngineCommand::ProjectGetMetadata)
        .arg(&args.directory)
        .bool_flag("json", true)
        .string_flag("env", args.env.as_deref())
        .string_flag("include", filters.include.as_deref())
        .string_flag("exclude", Some(filters.exclude.as_str()))
}

/// Run `cloudctl sandbox get-metadata`.
///
/// # Errors
///
/// Returns `SandboxError` if the engine cannot be run or reports a failure.
pub fn run<W: Write>(
    args: &GetMetadataArgs,
    engine: &Engine,
    ctx: &OutputCtx,
    out: &mut W,
) -> Result<(), SandboxError> {
    let _t_meta = ctx.timer("project_get_metadata");
    let output = engine.run(&request(args))?;
    drop(_t_meta);

    if let Some(err) = output.failure() {
        return Err(err);
    }
    write_sandbox_output(&output, ctx, out)?;
    Ok(())
}
