use cjenik_core::{AppConfig, CanonicalField, SourceSchema};

/// Loads the chain catalog named by `CJENIK_CHAINS_PATH`, or the built-in one.
///
/// # Errors
///
/// Returns an error if the configured YAML file cannot be read or fails
/// validation.
pub(crate) fn load_configured_chains(config: &AppConfig) -> anyhow::Result<Vec<SourceSchema>> {
    match &config.chains_path {
        Some(path) => {
            let file = cjenik_core::load_chains(path)?;
            tracing::debug!(path = %path.display(), chains = file.chains.len(), "loaded chain catalog");
            Ok(file.chains)
        }
        None => Ok(cjenik_core::builtin_chains(&config.snapshot_tag)),
    }
}

/// Renders a delimiter so tabs and spaces stay visible.
fn fmt_delimiter(delimiter: char) -> String {
    match delimiter {
        '\t' => "\\t".to_string(),
        ' ' => "space".to_string(),
        other => other.to_string(),
    }
}

/// Print one line per chain followed by its column targets.
pub(crate) fn run_chains(chains: &[SourceSchema]) {
    println!(
        "{:<12}{:<26}{:<7}{:<14}",
        "CHAIN", "FILE", "DELIM", "ENCODING"
    );
    for chain in chains {
        println!(
            "{:<12}{:<26}{:<7}{:<14}",
            chain.name,
            chain.file_locator,
            fmt_delimiter(chain.delimiter),
            chain.text_encoding
        );
        for field in CanonicalField::ALL {
            let target = chain
                .field_targets
                .get(field)
                .unwrap_or("(discovered)");
            println!("    {:<15}{target}", field.key());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters_are_printable() {
        assert_eq!(fmt_delimiter('\t'), "\\t");
        assert_eq!(fmt_delimiter(';'), ";");
        assert_eq!(fmt_delimiter(' '), "space");
    }
}
