use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fields::CanonicalField;
use crate::ConfigError;

/// Target column name per canonical field.
///
/// `None` means the column must be discovered from the header row at parse
/// time; only `regular_price` has a discovery rule, every other field simply
/// stays unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTargets {
    pub name: Option<String>,
    pub code: Option<String>,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub regular_price: Option<String>,
    pub promo_price: Option<String>,
    pub unit: Option<String>,
}

impl FieldTargets {
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        let target = match field {
            CanonicalField::Name => &self.name,
            CanonicalField::Code => &self.code,
            CanonicalField::Barcode => &self.barcode,
            CanonicalField::Category => &self.category,
            CanonicalField::RegularPrice => &self.regular_price,
            CanonicalField::PromoPrice => &self.promo_price,
            CanonicalField::Unit => &self.unit,
        };
        target.as_deref()
    }
}

/// Static description of one retailer's published price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSchema {
    pub name: String,
    /// Opaque handle resolved by the snapshot store.
    pub file_locator: String,
    pub delimiter: char,
    /// Encoding label understood by the WHATWG encoding standard.
    pub text_encoding: String,
    #[serde(rename = "columns")]
    pub field_targets: FieldTargets,
}

impl SourceSchema {
    /// The delimiter as a single byte, or `None` if it is not ASCII.
    #[must_use]
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChainsFile {
    pub chains: Vec<SourceSchema>,
}

/// Snapshot files are published as `<chain>_<snapshot-tag>.csv`.
fn snapshot_locator(chain: &str, snapshot_tag: &str) -> String {
    format!("{}_{snapshot_tag}.csv", chain.to_lowercase())
}

fn targets(columns: [Option<&str>; 7]) -> FieldTargets {
    let [name, code, barcode, category, regular_price, promo_price, unit] =
        columns.map(|c| c.map(str::to_owned));
    FieldTargets {
        name,
        code,
        barcode,
        category,
        regular_price,
        promo_price,
        unit,
    }
}

/// The six retail chains whose daily price lists are searched by default.
///
/// Column order in each target array follows [`CanonicalField::ALL`].
#[must_use]
pub fn builtin_chains(snapshot_tag: &str) -> Vec<SourceSchema> {
    let chain = |name: &str, delimiter: char, encoding: &str, columns: [Option<&str>; 7]| {
        SourceSchema {
            name: name.to_owned(),
            file_locator: snapshot_locator(name, snapshot_tag),
            delimiter,
            text_encoding: encoding.to_owned(),
            field_targets: targets(columns),
        }
    };

    vec![
        chain(
            "Plodine",
            ';',
            "windows-1250",
            [
                Some("Naziv proizvoda"),
                Some("Sifra proizvoda"),
                Some("Barkod"),
                Some("Kategorija proizvoda"),
                Some("Maloprodajna cijena"),
                Some("MPC za vrijeme posebnog oblika prodaje"),
                Some("Jedinica mjere"),
            ],
        ),
        chain(
            "Eurospin",
            ';',
            "windows-1250",
            [
                Some("NAZIV_PROIZVODA"),
                Some("ŠIFRA_PROIZVODA"),
                Some("BARKOD"),
                Some("KATEGORIJA_PROIZVODA"),
                Some("MALOPROD.CIJENA(EUR)"),
                Some("MPC_POSEB.OBLIK_PROD"),
                Some("JEDINICA_MJERE"),
            ],
        ),
        // Kaufland renames its price columns between snapshots. The regular price
        // is discovered from the header; no promo price is read for this chain.
        chain(
            "Kaufland",
            '\t',
            "utf-8",
            [
                Some("naziv proizvoda"),
                Some("šifra proizvoda"),
                Some("barkod"),
                Some("kategorija proizvoda"),
                None,
                None,
                Some("jedinica mjere"),
            ],
        ),
        chain(
            "Konzum",
            ',',
            "utf-8",
            [
                Some("NAZIV PROIZVODA"),
                Some("ŠIFRA PROIZVODA"),
                Some("BARKOD"),
                Some("KATEGORIJA PROIZVODA"),
                Some("MALOPRODAJNA CIJENA"),
                Some("MPC ZA VRIJEME POSEBNOG OBLIKA PRODAJE"),
                Some("JEDINICA MJERE"),
            ],
        ),
        chain(
            "Lidl",
            ',',
            "windows-1250",
            [
                Some("NAZIV"),
                Some("ŠIFRA"),
                Some("BARKOD"),
                Some("KATEGORIJA_PROIZVODA"),
                Some("MALOPRODAJNA_CIJENA"),
                Some("MPC_ZA_VRIJEME_POSEBNOG_OBLIKA_PRODAJE"),
                Some("JEDINICA_MJERE"),
            ],
        ),
        chain(
            "Spar",
            ';',
            "windows-1250",
            [
                Some("naziv"),
                Some("šifra"),
                Some("barkod"),
                Some("kategorija proizvoda"),
                Some("MPC (EUR)"),
                Some("MPC za vrijeme posebnog oblika prodaje (EUR)"),
                Some("jedinica mjere"),
            ],
        ),
    ]
}

/// Load and validate the chain catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_chains(path: &Path) -> Result<ChainsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ChainsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let chains_file: ChainsFile = serde_yaml::from_str(&content)?;

    validate_chains(&chains_file.chains)?;

    Ok(chains_file)
}

fn validate_chains(chains: &[SourceSchema]) -> Result<(), ConfigError> {
    if chains.is_empty() {
        return Err(ConfigError::Validation(
            "at least one chain must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for chain in chains {
        if chain.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chain name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(chain.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate chain name: '{}'",
                chain.name
            )));
        }

        if chain.file_locator.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "chain '{}' has an empty file_locator",
                chain.name
            )));
        }

        if chain.text_encoding.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "chain '{}' has an empty text_encoding",
                chain.name
            )));
        }

        match chain.delimiter_byte() {
            Some(b'"' | b'\n' | b'\r') | None => {
                return Err(ConfigError::Validation(format!(
                    "chain '{}' has unusable delimiter {:?}",
                    chain.name, chain.delimiter
                )));
            }
            Some(_) => {}
        }

        if chain
            .field_targets
            .name
            .as_deref()
            .is_none_or(|n| n.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "chain '{}' must name its product-name column",
                chain.name
            )));
        }
    }

    Ok(())
}
