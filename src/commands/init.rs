/// `init` command: create a local functions project via the engine.
use std::io::Write;

use crate::cli::args::InitArgs;
use crate::cli::output::write_init;
use crate::cli::{OutputCtx, OutputFormat};
use crate::sandbox::rewrite::{CLI_NAME, fix_init_error};
use crate::sandbox::{Engine, EngineCommand, ExecRequest, SandboxError};
use crate::types::InitOutput;

/// Engine request for `sandbox init`.
#[must_use]
pub fn request(args: &InitArgs) -> ExecRequest {
    ExecRequest::new(EngineCommand::ProjectCreate)
        .arg(&args.path)
        .bool_flag("overwrite", args.overwrite)
        .string_flag("language", Some(args.language.as_str()))
}

/// Run `cloudctl sandbox init`.
///
/// The engine's own success hint names the wrong CLI, so the created
/// project is reported here instead.
///
/// # Errors
///
/// Returns `SandboxError` if the engine fails; "already exists" failures
/// mention `--overwrite` rather than the engine's short flag.
pub fn run<W: Write>(
    args: &InitArgs,
    engine: &Engine,
    ctx: &OutputCtx,
    out: &mut W,
) -> Result<(), SandboxError> {
    let _t_create = ctx.timer("project_create");
    let output = engine.run(&request(args)).map_err(fix_init_error)?;
    drop(_t_create);

    if let Some(err) = output.failure() {
        return Err(fix_init_error(err));
    }

    if let Some(project) = output.created_project() {
        let result = InitOutput {
            project: project.to_owned(),
            next_command: format!("{CLI_NAME} sandbox deploy {project}"),
        };
        write_init(&result, ctx, out)?;
        return Ok(());
    }

    log::warn!("engine did not report the created project");
    match ctx.format {
        OutputFormat::Json => writeln!(
            out,
            r#"{{"ok":true,"message":"Sandbox initialized successfully in the local file system"}}"#
        )?,
        OutputFormat::Text => {
            writeln!(out, "Sandbox initialized successfully in the local file system")?;
        }
    }
    Ok(())
}
