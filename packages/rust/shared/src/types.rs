//! Core domain types for the Pure Extracts product catalog.

use serde::{Deserialize, Serialize};

use crate::error::{PureExtractsError, Result};

/// Slot key the catalog is persisted under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "organic-products";

/// Image used when a product is saved without one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";

/// Category labels offered by the admin form. The store accepts any text.
pub const CATEGORY_LABELS: [&str; 5] = [
    "Spice Extract",
    "Herbal Extract",
    "Essential Oil",
    "Root Extract",
    "Flavor Extract",
];

// ---------------------------------------------------------------------------
// ProductId
// ---------------------------------------------------------------------------

/// Integer product identifier. Seed records use 1..=6; created records use
/// millisecond timestamps, so ids also sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

// ---------------------------------------------------------------------------
// ProductStatus
// ---------------------------------------------------------------------------

/// Visibility of a product on the public site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Product / ProductDraft
// ---------------------------------------------------------------------------

/// A catalog entry as persisted in the product slot.
///
/// Fields other than `id` and `status` default when missing so that records
/// written by older revisions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub applications: Vec<String>,
    /// Free text such as `"99.5%"`; never parsed.
    #[serde(default)]
    pub purity: String,
    /// URL or `data:` URI.
    #[serde(default)]
    pub image: String,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Every product field except the identifier: the payload of create/update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub description: String,
    pub applications: Vec<String>,
    pub purity: String,
    pub image: String,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Product {
    /// Build a record from a draft and an already-assigned id.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            description: draft.description,
            applications: draft.applications,
            purity: draft.purity,
            image: draft.image,
            status: draft.status,
            price: draft.price,
        }
    }

    /// Copy every field except the id into a draft.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            applications: self.applications.clone(),
            purity: self.purity.clone(),
            image: self.image.clone(),
            status: self.status,
            price: self.price,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Contact submissions
// ---------------------------------------------------------------------------

/// Contact / feedback form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    pub message: String,
}

impl ContactForm {
    /// Name, email and message are required, as on the website form.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(PureExtractsError::validation(format!("{field} is required")));
            }
        }
        if !self.email.contains('@') {
            return Err(PureExtractsError::validation(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}

/// A contact submission kept in the local database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: i64,
    #[serde(flatten)]
    pub form: ContactForm,
    /// Whatever the contact workflow answered, as raw JSON text.
    pub response: Option<String>,
    /// RFC 3339 time the submission was recorded.
    pub submitted_at: String,
}

// ---------------------------------------------------------------------------
// Seed set
// ---------------------------------------------------------------------------

/// The six products shown when nothing has been persisted yet, in display order.
pub fn seed_products() -> Vec<Product> {
    #[allow(clippy::too_many_arguments)]
    fn seed(
        id: i64,
        name: &str,
        category: &str,
        description: &str,
        applications: [&str; 2],
        purity: &str,
        image: &str,
        price: f64,
    ) -> Product {
        Product {
            id: ProductId(id),
            name: name.into(),
            category: category.into(),
            description: description.into(),
            applications: applications.iter().map(|a| (*a).to_string()).collect(),
            purity: purity.into(),
            image: image.into(),
            status: ProductStatus::Active,
            price: Some(price),
        }
    }

    vec![
        seed(
            1,
            "Cardamom Extract",
            "Spice Extract",
            "Premium cardamom extract with intense aromatic profile, perfect for culinary and \
             therapeutic applications. Extracted using advanced CO₂ methods to preserve natural \
             compounds.",
            ["Food & Beverage", "Aromatherapy"],
            "99.5%",
            "https://ucarecdn.com/668270ce-afdd-48d9-afe8-807322a43dbe/-/preview/1000x1000/",
            299.0,
        ),
        seed(
            2,
            "Turmeric Extract",
            "Herbal Extract",
            "High-curcumin turmeric extract with potent anti-inflammatory properties. \
             Standardized for consistent bioactive compound concentration in pharmaceutical \
             formulations.",
            ["Pharmaceuticals", "Cosmetics"],
            "95.0%",
            "https://ucarecdn.com/65313065-a63e-4633-a77c-a214b931d7a8/-/preview/1000x1000/",
            199.0,
        ),
        seed(
            3,
            "Cinnamon Extract",
            "Spice Extract",
            "Ceylon cinnamon extract with sweet, delicate flavor profile. Rich in cinnamaldehyde \
             and perfect for nutraceutical and food industry applications.",
            ["Food & Beverage", "Nutraceuticals"],
            "98.2%",
            "https://ucarecdn.com/23107f02-dd36-4bd3-acf3-e8aaff09b4f2/-/preview/1000x1000/",
            249.0,
        ),
        seed(
            4,
            "Ginger Extract",
            "Root Extract",
            "Concentrated ginger extract with high gingerol content for digestive health and \
             anti-inflammatory benefits.",
            ["Pharmaceuticals", "Food & Beverage"],
            "96.8%",
            "https://ucarecdn.com/4f3a85e8-4f5a-4893-8a0c-10be52127f25/-/preview/1000x1000/",
            179.0,
        ),
        seed(
            5,
            "Black Pepper Extract",
            "Spice Extract",
            "Premium black pepper extract rich in piperine, enhancing bioavailability of other \
             compounds.",
            ["Nutraceuticals", "Food & Beverage"],
            "97.5%",
            "https://ucarecdn.com/23876679-0e65-4880-b9e5-02b4208b9bef/-/preview/1000x1000/",
            229.0,
        ),
        seed(
            6,
            "Clove Extract",
            "Spice Extract",
            "High-quality clove extract with antimicrobial properties, perfect for oral care and \
             food preservation.",
            ["Cosmetics", "Food & Beverage"],
            "98.9%",
            "https://ucarecdn.com/ccd2bb33-7713-4c36-9bf3-5763fb6081c2/-/preview/1000x1000/",
            269.0,
        ),
    ]
}
