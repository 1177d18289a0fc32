/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod deploy;
pub mod get_metadata;
pub mod init;
pub mod watch;

use crate::cli::OutputCtx;
use crate::cli::args::{BuildArgs, Command, SandboxCommand};
use crate::config::Config;
use crate::sandbox::{Engine, ExecRequest, Filters, SandboxError};

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `SandboxError` on any command failure.
pub fn dispatch(command: &Command, ctx: &OutputCtx, config: &Config) -> Result<(), SandboxError> {
    match command {
        Command::Sandbox(sub) => {
            let _t_locate = ctx.timer("locate_engine");
            let engine = Engine::locate(&config.sandbox)?;
            drop(_t_locate);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match sub {
                SandboxCommand::Init(args) => init::run(args, &engine, ctx, &mut out),
                SandboxCommand::Deploy(args) => deploy::run(args, &engine, ctx, &mut out),
                SandboxCommand::GetMetadata(args) => {
                    get_metadata::run(args, &engine, ctx, &mut out)
                }
                SandboxCommand::Watch(args) => watch::run(args, &engine, ctx, &mut out),
            }
        }
    }
}

/// Boolean build flags shared by `deploy` and `watch`, in engine order.
fn with_build_bools(req: ExecRequest, build: &BuildArgs) -> ExecRequest {
    req.bool_flag("insecure", build.insecure)
        .bool_flag("verbose-build", build.verbose_build)
        .bool_flag("verbose-zip", build.verbose_zip)
        .bool_flag("yarn", build.yarn)
        .bool_flag("remote-build", build.remote_build)
}

/// String build flags shared by `deploy` and `watch`, in engine order.
fn with_build_strings(req: ExecRequest, build: &BuildArgs, filters: &Filters) -> ExecRequest {
    req.string_flag("env", build.env.as_deref())
        .string_flag("build-env", build.build_env.as_deref())
        .string_flag("apihost", build.apihost.as_deref())
        .string_flag("auth", build.auth.as_deref())
        .string_flag("include", filters.include.as_deref())
        .string_flag("exclude", Some(filters.exclude.as_str()))
}
