/// Cosmetic rewrites applied to engine output before it reaches the user.
use std::borrow::Cow;

use super::envelope::SandboxOutput;
use super::errors::SandboxError;

/// Expands to the host CLI's name, so branded phrases can be built with `concat!`.
macro_rules! cli_name {
    () => {
        "cloudctl"
    };
}

/// Name of the host CLI, used when rebranding engine hints.
pub const CLI_NAME: &str = cli_name!();

/// Engine command phrases and what to say instead. Longer phrases first.
const HINTS: &[(&str, &str)] = &[
    ("nim project get-metadata", concat!(cli_name!(), " sandbox get-metadata")),
    ("nim project create", concat!(cli_name!(), " sandbox init")),
    ("nim project deploy", concat!(cli_name!(), " sandbox deploy")),
    ("nim project watch", concat!(cli_name!(), " sandbox watch")),
    ("nim action get", concat!(cli_name!(), " sbx fn get")),
];

/// Replacement for the engine's "Deployed actions" heading.
pub const DEPLOYED_FUNCTIONS_HEADING: &str = concat!(
    "Deployed functions ('",
    cli_name!(),
    " sbx fn get <funcName> --url' for URL):"
);

/// Rebrand engine command hints in a single line.
#[must_use]
pub fn brand_hints(line: &str) -> Cow<'_, str> {
    if !line.contains("nim ") {
        return Cow::Borrowed(line);
    }
    let mut out = line.to_owned();
    for (from, to) in HINTS {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    Cow::Owned(out)
}

/// Rewrite a single `project deploy` transcript line.
#[must_use]
pub fn rewrite_deploy_line(line: &str) -> String {
    if line.contains("Deploying project") {
        line.replacen("Deploying project", "Deployed", 1)
    } else if line.contains("Deployed actions") {
        DEPLOYED_FUNCTIONS_HEADING.to_owned()
    } else {
        line.to_owned()
    }
}

/// Rewrite the captured transcript of a `project deploy` run in place.
pub fn rewrite_deploy_transcript(output: &mut SandboxOutput) {
    for line in &mut output.captured {
        *line = rewrite_deploy_line(line);
    }
}

/// Point "already exists" failures from `project create` at the long flag name.
#[must_use]
pub fn fix_init_error(err: SandboxError) -> SandboxError {
    match err {
        SandboxError::EngineFailed { message } if message.contains("already exists") => {
            SandboxError::engine(message.replacen("-o", "--overwrite", 1))
        }
        other => other,
    }
}
