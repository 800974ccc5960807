//! Enrollment packages and their prices

use serde::{Deserialize, Serialize};

/// A priced offering the user can select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Identifier submitted by the package selector (e.g., "3_days_workshop")
    pub id: String,

    /// Human readable name shown in the payment summary
    pub name: String,

    /// Price in whole currency units
    pub price: u32,
}

/// The fixed set of packages offered on the page
///
/// Prices are only ever read from here, never from user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    packages: Vec<Package>,
    currency: String,
}

impl PackageCatalog {
    pub fn new(packages: Vec<Package>, currency: impl Into<String>) -> Self {
        Self {
            packages,
            currency: currency.into(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn price_of(&self, id: &str) -> Option<u32> {
        self.get(id).map(|p| p.price)
    }

    /// Display name of a package, falling back to the raw id
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|p| p.name.as_str()).unwrap_or(id)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Price label in the page's format, e.g. `BDT 3,000/=`
    pub fn price_label(&self, price: u32) -> String {
        format!("{} {}/=", self.currency, group_thousands(price))
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// What the payment step shows about the selected package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSummary {
    pub package_id: String,
    pub package_name: String,
    pub price: u32,
    pub price_label: String,
}

impl PaymentSummary {
    pub fn for_package(catalog: &PackageCatalog, package_id: &str, price: u32) -> Self {
        Self {
            package_id: package_id.to_string(),
            package_name: catalog.display_name(package_id).to_string(),
            price,
            price_label: catalog.price_label(price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PackageCatalog {
        PackageCatalog::new(
            vec![
                Package {
                    id: "3_days_workshop".to_string(),
                    name: "3 Days Workshop".to_string(),
                    price: 3000,
                },
                Package {
                    id: "3_days_with_support".to_string(),
                    name: "3 Days Workshop + 6 Month Support".to_string(),
                    price: 12500,
                },
            ],
            "BDT",
        )
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.price_of("3_days_workshop"), Some(3000));
        assert_eq!(catalog.price_of("unknown"), None);
        assert_eq!(
            catalog.display_name("3_days_with_support"),
            "3 Days Workshop + 6 Month Support"
        );
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(catalog().display_name("vip"), "vip");
    }

    #[test]
    fn test_price_label_groups_thousands() {
        let catalog = catalog();
        assert_eq!(catalog.price_label(3000), "BDT 3,000/=");
        assert_eq!(catalog.price_label(999), "BDT 999/=");
        assert_eq!(catalog.price_label(1_250_000), "BDT 1,250,000/=");
        assert_eq!(catalog.price_label(0), "BDT 0/=");
    }

    #[test]
    fn test_payment_summary() {
        let summary = PaymentSummary::for_package(&catalog(), "3_days_with_support", 12500);
        assert_eq!(summary.package_name, "3 Days Workshop + 6 Month Support");
        assert_eq!(summary.price_label, "BDT 12,500/=");
    }
}
