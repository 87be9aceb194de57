//! Raw admin-form input and its conversion into a [`ProductDraft`].

use pureextracts_shared::{
    CATEGORY_LABELS, PLACEHOLDER_IMAGE, Product, ProductDraft, ProductStatus, PureExtractsError,
    Result,
};

/// Product fields exactly as typed into the admin form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub description: String,
    /// Comma-separated labels, e.g. `"Food & Beverage, Aromatherapy"`.
    pub applications: String,
    pub purity: String,
    /// Blank means "use the placeholder image".
    pub image: String,
    /// Blank means "no price".
    pub price: String,
    pub status: ProductStatus,
}

impl ProductForm {
    /// Pre-fill the form for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            applications: product.applications.join(", "),
            purity: product.purity.clone(),
            image: product.image.clone(),
            price: product.price.map(format_price).unwrap_or_default(),
            status: product.status,
        }
    }

    pub fn into_draft(self) -> Result<ProductDraft> {
        let price = parse_price(&self.price)?;

        Ok(ProductDraft {
            name: self.name,
            category: self.category,
            description: self.description,
            applications: split_applications(&self.applications),
            purity: self.purity,
            image: image_or_placeholder(self.image),
            status: self.status,
            price,
        })
    }
}

/// Field-level edits to an existing product. `None` keeps the stored value
/// exactly as it is; given fields are parsed the way the admin form parses them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Comma-separated labels.
    pub applications: Option<String>,
    pub purity: Option<String>,
    /// Blank means "use the placeholder image".
    pub image: Option<String>,
    /// Blank means "no price".
    pub price: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductEdit {
    /// Overlay the given fields onto `draft`.
    ///
    /// A bad price fails before anything is changed.
    pub fn apply_to(self, draft: &mut ProductDraft) -> Result<()> {
        let price = self.price.as_deref().map(parse_price).transpose()?;

        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(applications) = self.applications {
            draft.applications = split_applications(&applications);
        }
        if let Some(purity) = self.purity {
            draft.purity = purity;
        }
        if let Some(image) = self.image {
            draft.image = image_or_placeholder(image);
        }
        if let Some(price) = price {
            draft.price = price;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        Ok(())
    }
}

/// Whether `category` is one of the labels the admin form offers.
pub fn is_known_category(category: &str) -> bool {
    CATEGORY_LABELS.contains(&category.trim())
}

fn image_or_placeholder(image: String) -> String {
    if image.trim().is_empty() {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        image
    }
}

/// Split a comma-separated label list, trimming each label and dropping blanks.
pub fn split_applications(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_price(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| PureExtractsError::validation(format!("price '{trimmed}' is not a number")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(PureExtractsError::validation(format!(
            "price must be a non-negative number (got {trimmed})"
        )));
    }
    Ok(Some(value))
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pureextracts_shared::seed_products;

    fn filled() -> ProductForm {
        ProductForm {
            name: "Vanilla Extract".into(),
            category: "Flavor Extract".into(),
            description: "Bourbon vanilla.".into(),
            applications: " Food & Beverage ,Cosmetics,, ".into(),
            purity: "97%".into(),
            image: String::new(),
            price: "349".into(),
            status: ProductStatus::Active,
        }
    }

    #[test]
    fn draft_from_form() {
        let draft = filled().into_draft().expect("valid form");
        assert_eq!(draft.applications, ["Food & Beverage", "Cosmetics"]);
        assert_eq!(draft.image, PLACEHOLDER_IMAGE);
        assert_eq!(draft.price, Some(349.0));
        assert_eq!(draft.status, ProductStatus::Active);
    }

    #[test]
    fn blank_price_is_none() {
        let mut form = filled();
        form.price = "  ".into();
        assert_eq!(form.into_draft().unwrap().price, None);
    }

    #[test]
    fn bad_price_is_rejected() {
        let mut form = filled();
        form.price = "twelve".into();
        assert!(form.into_draft().unwrap_err().to_string().contains("not a number"));

        let mut form = filled();
        form.price = "-5".into();
        assert!(form.into_draft().is_err());
    }

    #[test]
    fn edit_form_roundtrips_product() {
        let product = seed_products().remove(0);
        let form = ProductForm::from_product(&product);
        assert_eq!(form.applications, "Food & Beverage, Aromatherapy");
        assert_eq!(form.price, "299");
        assert!(is_known_category(&form.category));

        let draft = form.into_draft().unwrap();
        assert_eq!(draft, product.to_draft());
    }

    #[test]
    fn edit_form_keeps_inactive_status() {
        let mut product = seed_products().remove(1);
        product.status = ProductStatus::Inactive;
        let draft = ProductForm::from_product(&product).into_draft().unwrap();
        assert_eq!(draft.status, ProductStatus::Inactive);
    }

    #[test]
    fn unknown_category_is_flagged_not_rejected() {
        let mut form = filled();
        form.category = "Resin".into();
        assert!(!is_known_category(&form.category));
        assert!(form.into_draft().is_ok());
    }

    #[test]
    fn edit_leaves_untouched_fields_byte_identical() {
        let mut draft = ProductDraft {
            name: "Clove Bud Oil".into(),
            applications: vec!["Flavors, natural".into(), String::new()],
            image: String::new(),
            price: Some(120.0),
            ..ProductDraft::default()
        };
        let before = draft.clone();

        let edit = ProductEdit {
            price: Some("10".into()),
            ..ProductEdit::default()
        };
        edit.apply_to(&mut draft).unwrap();

        assert_eq!(draft.price, Some(10.0));
        assert_eq!(draft.applications, before.applications);
        assert_eq!(draft.image, before.image);
        assert_eq!(draft.name, before.name);
    }

    #[test]
    fn edit_parses_given_fields() {
        let mut draft = seed_products().remove(0).to_draft();
        let edit = ProductEdit {
            applications: Some("Cosmetics, ,Wellness".into()),
            image: Some(" ".into()),
            price: Some(String::new()),
            status: Some(ProductStatus::Inactive),
            ..ProductEdit::default()
        };
        edit.apply_to(&mut draft).unwrap();

        assert_eq!(draft.applications, ["Cosmetics", "Wellness"]);
        assert_eq!(draft.image, PLACEHOLDER_IMAGE);
        assert_eq!(draft.price, None);
        assert_eq!(draft.status, ProductStatus::Inactive);
    }

    #[test]
    fn bad_price_edit_changes_nothing() {
        let mut draft = seed_products().remove(0).to_draft();
        let before = draft.clone();
        let edit = ProductEdit {
            name: Some("Renamed".into()),
            price: Some("free".into()),
            ..ProductEdit::default()
        };
        assert!(edit.apply_to(&mut draft).is_err());
        assert_eq!(draft, before);
    }
}
