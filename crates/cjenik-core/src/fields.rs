use serde::{Deserialize, Serialize};

/// A normalized attribute name, independent of how any source labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
    Code,
    Barcode,
    Category,
    RegularPrice,
    PromoPrice,
    Unit,
}

impl CanonicalField {
    pub const COUNT: usize = 7;

    /// Every canonical field, in resolution order.
    pub const ALL: [CanonicalField; Self::COUNT] = [
        CanonicalField::Name,
        CanonicalField::Code,
        CanonicalField::Barcode,
        CanonicalField::Category,
        CanonicalField::RegularPrice,
        CanonicalField::PromoPrice,
        CanonicalField::Unit,
    ];

    /// Position of this field in [`Self::ALL`]; used for array-backed lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            CanonicalField::Name => 0,
            CanonicalField::Code => 1,
            CanonicalField::Barcode => 2,
            CanonicalField::Category => 3,
            CanonicalField::RegularPrice => 4,
            CanonicalField::PromoPrice => 5,
            CanonicalField::Unit => 6,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Code => "code",
            CanonicalField::Barcode => "barcode",
            CanonicalField::Category => "category",
            CanonicalField::RegularPrice => "regular_price",
            CanonicalField::PromoPrice => "promo_price",
            CanonicalField::Unit => "unit",
        }
    }

    /// Price fields are the only ones the poison-column guard inspects.
    #[must_use]
    pub const fn is_price(self) -> bool {
        matches!(self, CanonicalField::RegularPrice | CanonicalField::PromoPrice)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
