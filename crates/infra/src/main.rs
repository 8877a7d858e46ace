use std::io::Read;

use anyhow::Context;

use backoffice_infra::config::BackofficeConfig;
use backoffice_infra::matrix::{MatrixInput, generate_submission};

fn main() -> anyhow::Result<()> {
    let config = BackofficeConfig::from_env().context("invalid configuration")?;
    backoffice_observability::init_with(config.log_format);

    let raw = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let input: MatrixInput = serde_json::from_str(&raw).context("malformed matrix input")?;
    let submission =
        generate_submission(&input, &config).context("could not generate variants")?;

    tracing::info!(
        variants = submission.variants.len(),
        attributes = submission.attributes.len(),
        "submission ready"
    );
    println!("{}", serde_json::to_string_pretty(&submission)?);
    Ok(())
}
