//! `pureextracts products ...`: catalog administration.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use pureextracts_catalog::{
    LoadSource, ProductEdit, ProductForm, ProductStore, StoreOptions, WriteOutcome,
    is_known_category,
};
use pureextracts_shared::{
    AppConfig, CATEGORY_LABELS, Product, ProductId, ProductStatus, expand_home,
};
use pureextracts_storage::{MemorySlots, SlotStore, Storage};
use tracing::{debug, info, warn};

/// Product subcommands.
#[derive(Subcommand)]
pub(crate) enum ProductAction {
    /// List products in catalog order.
    List {
        /// Only products visible on the public site.
        #[arg(long)]
        active: bool,

        /// Emit the list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one product.
    Show {
        id: ProductId,

        #[arg(long)]
        json: bool,
    },

    /// Add a product.
    Add(NewProduct),

    /// Change fields of an existing product. Omitted fields keep their value.
    Update {
        id: ProductId,

        #[command(flatten)]
        changes: ProductChanges,
    },

    /// Delete a product.
    Delete { id: ProductId },

    /// Replace the whole catalog with the built-in seed products.
    Reset,
}

impl ProductAction {
    fn is_read_only(&self) -> bool {
        matches!(self, Self::List { .. } | Self::Show { .. })
    }

    fn prints_table(&self) -> bool {
        matches!(self, Self::List { json: false, .. })
    }
}

/// Fields for `products add`.
#[derive(Args)]
pub(crate) struct NewProduct {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Comma-separated labels.
    #[arg(long, default_value = "")]
    pub applications: String,

    #[arg(long, default_value = "")]
    pub purity: String,

    /// Image URL; the placeholder image is used when omitted.
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// Create the product hidden from the public site.
    #[arg(long)]
    pub inactive: bool,
}

/// Optional field overrides for `products update`.
#[derive(Args, Default)]
pub(crate) struct ProductChanges {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub applications: Option<String>,

    #[arg(long)]
    pub purity: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    /// New price; pass an empty string to clear it.
    #[arg(long)]
    pub price: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum StatusArg {
    Active,
    Inactive,
}

impl From<StatusArg> for ProductStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => ProductStatus::Active,
            StatusArg::Inactive => ProductStatus::Inactive,
        }
    }
}

impl NewProduct {
    fn into_form(self) -> ProductForm {
        ProductForm {
            name: self.name,
            category: self.category,
            description: self.description,
            applications: self.applications,
            purity: self.purity,
            image: self.image.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            status: if self.inactive {
                ProductStatus::Inactive
            } else {
                ProductStatus::Active
            },
        }
    }
}

impl From<ProductChanges> for ProductEdit {
    fn from(changes: ProductChanges) -> Self {
        Self {
            name: changes.name,
            category: changes.category,
            description: changes.description,
            applications: changes.applications,
            purity: changes.purity,
            image: changes.image,
            price: changes.price,
            status: changes.status.map(Into::into),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage selection
// ---------------------------------------------------------------------------

/// Where the catalog slot lives for this invocation.
#[derive(Debug, PartialEq)]
pub(crate) enum StorageTarget {
    Memory,
    Database(PathBuf),
}

impl StorageTarget {
    pub(crate) fn resolve(config: &AppConfig, db: Option<PathBuf>, memory: bool) -> Result<Self> {
        if memory {
            return Ok(Self::Memory);
        }
        match db {
            Some(path) => Ok(Self::Database(path)),
            None => Ok(Self::Database(expand_home(&config.storage.database_path)?)),
        }
    }
}

/// Open the store for `action` and run it.
///
/// Listing never creates a database: with no database file yet the seed
/// products are shown from memory.
pub(crate) async fn run(
    config: &AppConfig,
    target: StorageTarget,
    action: ProductAction,
) -> Result<()> {
    let options = StoreOptions::from(config);

    match target {
        StorageTarget::Memory => {
            let mut store = ProductStore::open(MemorySlots::new(), options).await?;
            execute(&mut store, action).await
        }
        StorageTarget::Database(path) if action.is_read_only() && !path.exists() => {
            info!(path = %path.display(), "no catalog database yet, showing seed products");
            let mut store = ProductStore::open(MemorySlots::new(), options).await?;
            execute(&mut store, action).await
        }
        StorageTarget::Database(path) => {
            let storage = if action.is_read_only() {
                Storage::open_readonly(&path).await?
            } else {
                Storage::open(&path).await?
            };
            debug!(
                path = %path.display(),
                readonly = storage.is_readonly(),
                "catalog database opened"
            );
            let saved_at = storage.slot_updated_at(&options.slot_key).await?;
            let show_saved_at = action.prints_table();

            let mut store = ProductStore::open(storage, options).await?;
            if store.load_source() == LoadSource::Recovered {
                warn!(path = %path.display(), "stored catalog was unreadable; seed products loaded");
            }
            execute(&mut store, action).await?;

            if show_saved_at {
                match saved_at {
                    Some(at) => println!("\nLast saved: {at}"),
                    None => println!("\nNot saved yet; showing seed products."),
                }
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

async fn execute<S: SlotStore>(store: &mut ProductStore<S>, action: ProductAction) -> Result<()> {
    match action {
        ProductAction::List { active, json } => {
            let products: Vec<&Product> = if active {
                store.active_products()
            } else {
                store.products().iter().collect()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                print_table(&products);
            }
        }
        ProductAction::Show { id, json } => {
            let product = find(store, id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(product)?);
            } else {
                print_product(product);
            }
        }
        ProductAction::Add(new) => {
            let form = new.into_form();
            warn_unknown_category(&form.category);
            let description = form.description.clone();
            let id = store.create(form.into_draft()?).await?;
            println!("Created product {id}");
            report_lint(&description);
            report_write(store);
        }
        ProductAction::Update { id, changes } => {
            let mut draft = find(store, id)?.to_draft();
            if let Some(category) = &changes.category {
                warn_unknown_category(category);
            }
            ProductEdit::from(changes).apply_to(&mut draft)?;
            let description = draft.description.clone();
            store.update(id, draft).await?;
            println!("Updated product {id}");
            report_lint(&description);
            report_write(store);
        }
        ProductAction::Delete { id } => {
            if store.delete(id).await? {
                println!("Deleted product {id}");
            } else {
                println!("No product with id {id}");
            }
            report_write(store);
        }
        ProductAction::Reset => {
            store.reset_to_seed().await?;
            println!("Catalog reset to {} seed products", store.len());
        }
    }
    Ok(())
}

fn find<S: SlotStore>(store: &ProductStore<S>, id: ProductId) -> Result<&Product> {
    store
        .get(id)
        .ok_or_else(|| eyre!("no product with id {id}"))
}

fn warn_unknown_category(category: &str) {
    if !is_known_category(category) {
        warn!(
            category,
            known = ?CATEGORY_LABELS,
            "category is not one of the standard labels"
        );
    }
}

fn report_lint(description: &str) {
    let suggestions = pureextracts_linter::check(description);
    if !suggestions.is_empty() {
        println!(
            "{} grammar/style suggestion(s) for the description; run `pureextracts lint` to see them",
            suggestions.len()
        );
    }
}

fn report_write<S: SlotStore>(store: &ProductStore<S>) {
    if store.last_write() == Some(WriteOutcome::SkippedEmpty) {
        println!("Catalog is now empty; the stored catalog was left unchanged.");
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_table(products: &[&Product]) {
    if products.is_empty() {
        println!("No products.");
        return;
    }
    println!(
        "{:<15} {:<28} {:<18} {:<9} {:>10}",
        "ID", "NAME", "CATEGORY", "STATUS", "PRICE"
    );
    for p in products {
        println!(
            "{:<15} {:<28} {:<18} {:<9} {:>10}",
            p.id,
            truncate(&p.name, 28),
            truncate(&p.category, 18),
            p.status,
            price_label(p.price),
        );
    }
}

fn print_product(p: &Product) {
    println!("ID:           {}", p.id);
    println!("Name:         {}", p.name);
    println!("Category:     {}", p.category);
    println!("Status:       {}", p.status);
    println!("Price:        {}", price_label(p.price));
    println!("Purity:       {}", p.purity);
    println!("Applications: {}", p.applications.join(", "));
    println!("Image:        {}", truncate(&p.image, 72));
    println!();
    println!("{}", p.description);
}

fn price_label(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("₹{p:.2}"))
}

/// Cut `s` to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
