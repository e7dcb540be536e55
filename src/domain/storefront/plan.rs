//! Storage plan catalog.
//!
//! Plans are static configuration, not persisted state. The workflow always
//! resolves a plan by id here so a client can never choose its own price.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency every plan is priced in.
pub const PLAN_CURRENCY: &str = "INR";

/// Minor units per major unit of [`PLAN_CURRENCY`] (paise per rupee).
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Identifier of a catalog plan; doubles as the directory plan tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    /// Storage size label shown to customers (e.g. "1TB").
    pub storage: String,
    /// Price in whole units of [`PLAN_CURRENCY`].
    pub price: i64,
    pub features: Vec<String>,
}

impl Plan {
    /// Price in the gateway's minor currency unit (`price × 100`).
    ///
    /// Returns `None` on overflow.
    pub fn amount_minor_units(&self) -> Option<i64> {
        self.price.checked_mul(MINOR_UNITS_PER_MAJOR)
    }
}

/// The hard-coded set of plans on sale.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

static STANDARD_CATALOG: Lazy<PlanCatalog> = Lazy::new(|| {
    const BASE_FEATURES: [&str; 5] = [
        "Lifetime access",
        "Google Cloud Storage",
        "24/7 Support",
        "Secure encryption",
        "3 years free maintenance",
    ];

    let plan = |id: &str, name: &str, price: i64, extras: &[&str]| Plan {
        id: PlanId::new(id),
        name: name.to_string(),
        storage: id.to_string(),
        price,
        features: BASE_FEATURES
            .iter()
            .chain(extras.iter())
            .map(|f| f.to_string())
            .collect(),
    };

    PlanCatalog::new(vec![
        plan("500GB", "Basic Storage", 1000, &[]),
        plan("1TB", "Standard Storage", 2000, &["Priority support"]),
        plan(
            "2TB",
            "Professional Storage",
            3000,
            &["Priority support", "Advanced sharing features"],
        ),
        plan(
            "5TB",
            "Enterprise Storage",
            5000,
            &["Priority support", "Advanced sharing features", "Custom solutions"],
        ),
    ])
});

impl PlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    /// The catalog the storefront sells from.
    pub fn standard() -> &'static PlanCatalog {
        &STANDARD_CATALOG
    }

    /// Looks up a plan by id.
    pub fn find(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id.as_str() == id)
    }

    /// All plans in display order.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }
}
