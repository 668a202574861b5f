use std::io::Read;

use anyhow::Context;
use pmo_config::{PmoConfig, RedactionConfig};
use pmo_redact::{PiiPolicy, RedactionOutcome, redact};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RedactArgs;
use crate::output::output;

/// Handle `pmo redact`.
pub fn handle(args: &RedactArgs, config: &PmoConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = match &args.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let policy = effective_policy(&config.redaction, args)?;
    let outcome = redact(&text, &policy);
    tracing::debug!(
        mode = %policy.mode,
        matches = outcome.summary.total(),
        "redacted input"
    );

    if args.summary {
        return output(&outcome, flags.format);
    }
    print_text(&outcome);
    Ok(())
}

/// The configured policy with command-line overrides applied.
fn effective_policy(base: &RedactionConfig, args: &RedactArgs) -> anyhow::Result<PiiPolicy> {
    let mut section = base.clone();
    if let Some(mode) = args.mode {
        section.mode = mode;
    }
    section
        .allow_email_domains
        .extend(args.allow_domain.iter().cloned());
    section.policy().map_err(anyhow::Error::from)
}

fn print_text(outcome: &RedactionOutcome) {
    if outcome.text.ends_with('\n') {
        print!("{}", outcome.text);
    } else {
        println!("{}", outcome.text);
    }
}
