//! The product store: an ordered product list mirrored into one slot.
//!
//! Every mutation writes the whole list back to the slot before the
//! in-memory list changes, so a failed write leaves both sides as they were.

use std::collections::HashSet;

use pureextracts_shared::{
    AppConfig, DEFAULT_SLOT_KEY, Product, ProductDraft, ProductId, PureExtractsError, Result,
    seed_products,
};
use pureextracts_storage::SlotStore;
use tracing::{debug, info, instrument, warn};

use crate::ids::{Clock, IdAllocator, system_clock};

/// What to do when a mutation leaves the catalog empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWritePolicy {
    /// Leave the slot untouched. The last non-empty list comes back on reload.
    #[default]
    Skip,
    /// Write `[]` like any other state.
    Persist,
}

/// What to do when the slot holds data that is not a product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptDataPolicy {
    /// Log a warning and start from the seed set.
    #[default]
    FallBackToSeed,
    /// Fail to open.
    Fail,
}

/// Where the current in-memory list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the slot.
    Stored,
    /// Slot was empty; seed set used.
    Seed,
    /// Slot was unreadable; seed set used.
    Recovered,
}

/// Outcome of writing the list to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    SkippedEmpty,
}

/// Store construction options.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub slot_key: String,
    pub empty_writes: EmptyWritePolicy,
    pub corrupt_data: CorruptDataPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.into(),
            empty_writes: EmptyWritePolicy::default(),
            corrupt_data: CorruptDataPolicy::default(),
        }
    }
}

impl From<&AppConfig> for StoreOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            slot_key: config.storage.slot_key.clone(),
            empty_writes: if config.catalog.persist_empty {
                EmptyWritePolicy::Persist
            } else {
                EmptyWritePolicy::Skip
            },
            corrupt_data: if config.catalog.recover_corrupt {
                CorruptDataPolicy::FallBackToSeed
            } else {
                CorruptDataPolicy::Fail
            },
        }
    }
}

/// Single source of truth for the product list within a session.
///
/// Construct one with [`ProductStore::open`] and pass it by reference to
/// whatever needs it. Mutations take `&mut self`, so there is one writer per
/// store; separate stores over the same slot are last-write-wins.
pub struct ProductStore<S> {
    slots: S,
    options: StoreOptions,
    products: Vec<Product>,
    ids: IdAllocator,
    source: LoadSource,
    last_write: Option<WriteOutcome>,
}

impl<S: SlotStore> ProductStore<S> {
    /// Load the list from the slot, or the seed set when the slot is empty.
    #[instrument(skip_all, fields(slot = %options.slot_key))]
    pub async fn open(slots: S, options: StoreOptions) -> Result<Self> {
        let mut store = Self {
            slots,
            options,
            products: Vec::new(),
            ids: IdAllocator::new(system_clock),
            source: LoadSource::Seed,
            last_write: None,
        };
        store.reload().await?;
        Ok(store)
    }

    /// Replace the wall clock used for new ids.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.ids.set_clock(clock);
        self
    }

    /// Re-read the slot, discarding the in-memory list.
    pub async fn reload(&mut self) -> Result<LoadSource> {
        let (products, source) = match self.slots.get(&self.options.slot_key).await? {
            None => (seed_products(), LoadSource::Seed),
            Some(raw) => match parse_products(&raw) {
                Ok(products) => (products, LoadSource::Stored),
                Err(e) => match self.options.corrupt_data {
                    CorruptDataPolicy::FallBackToSeed => {
                        warn!(error = %e, "stored catalog unreadable, using seed products");
                        (seed_products(), LoadSource::Recovered)
                    }
                    CorruptDataPolicy::Fail => return Err(e),
                },
            },
        };

        warn_on_duplicate_ids(&products);
        for product in &products {
            self.ids.observe(product.id);
        }

        info!(count = products.len(), ?source, "catalog loaded");
        self.products = products;
        self.source = source;
        Ok(source)
    }

    /// Where the current list was loaded from.
    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    /// Every product, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products with status `Active`, in insertion order.
    pub fn active_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_active()).collect()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Outcome of the most recent slot write, `None` before the first mutation.
    pub fn last_write(&self) -> Option<WriteOutcome> {
        self.last_write
    }

    /// Append a new product and return its id.
    #[instrument(skip_all, fields(name = %draft.name))]
    pub async fn create(&mut self, draft: ProductDraft) -> Result<ProductId> {
        validate_draft(&draft)?;
        let id = self
            .ids
            .next()
            .ok_or_else(|| PureExtractsError::Storage("id space exhausted".into()))?;

        let mut next = self.products.clone();
        next.push(Product::from_draft(id, draft));
        self.commit(next).await?;

        info!(%id, "product created");
        Ok(id)
    }

    /// Replace every field of product `id` except the id itself.
    ///
    /// Returns `false` (and changes nothing) when no product has that id.
    #[instrument(skip_all, fields(%id))]
    pub async fn update(&mut self, id: ProductId, draft: ProductDraft) -> Result<bool> {
        validate_draft(&draft)?;

        let mut matched = false;
        let next: Vec<Product> = self
            .products
            .iter()
            .map(|p| {
                if p.id == id {
                    matched = true;
                    Product::from_draft(id, draft.clone())
                } else {
                    p.clone()
                }
            })
            .collect();
        self.commit(next).await?;

        if matched {
            info!("product updated");
        } else {
            debug!("update ignored, no such product");
        }
        Ok(matched)
    }

    /// Remove product `id`. Returns `false` when no product has that id.
    #[instrument(skip_all, fields(%id))]
    pub async fn delete(&mut self, id: ProductId) -> Result<bool> {
        let before = self.products.len();
        let next: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        let matched = next.len() != before;
        self.commit(next).await?;

        if matched {
            info!(remaining = self.products.len(), "product deleted");
        } else {
            debug!("delete ignored, no such product");
        }
        Ok(matched)
    }

    /// Overwrite the slot and the in-memory list with the seed set.
    pub async fn reset_to_seed(&mut self) -> Result<()> {
        self.commit(seed_products()).await?;
        self.source = LoadSource::Seed;
        info!("catalog reset to seed products");
        Ok(())
    }

    /// Write `next` to the slot (subject to the empty-write policy), then
    /// make it the in-memory list.
    async fn commit(&mut self, next: Vec<Product>) -> Result<WriteOutcome> {
        let outcome = self.write_slot(&next).await?;
        self.products = next;
        self.last_write = Some(outcome);
        Ok(outcome)
    }

    async fn write_slot(&self, products: &[Product]) -> Result<WriteOutcome> {
        if products.is_empty() && self.options.empty_writes == EmptyWritePolicy::Skip {
            warn!(
                slot = %self.options.slot_key,
                "catalog is empty, keeping previous stored value"
            );
            return Ok(WriteOutcome::SkippedEmpty);
        }

        let json = serde_json::to_string(products)
            .map_err(|e| PureExtractsError::parse(format!("failed to encode catalog: {e}")))?;
        self.slots.set(&self.options.slot_key, &json).await?;
        debug!(count = products.len(), bytes = json.len(), "catalog written");
        Ok(WriteOutcome::Written)
    }
}

/// Decode the serialized product list held in a slot.
pub fn parse_products(raw: &str) -> Result<Vec<Product>> {
    serde_json::from_str(raw)
        .map_err(|e| PureExtractsError::parse(format!("stored catalog is not a product list: {e}")))
}

/// Reject drafts the store must never persist.
pub fn validate_draft(draft: &ProductDraft) -> Result<()> {
    if let Some(price) = draft.price {
        if !price.is_finite() {
            return Err(PureExtractsError::validation("price must be a finite number"));
        }
        if price < 0.0 {
            return Err(PureExtractsError::validation(format!(
                "price must not be negative (got {price})"
            )));
        }
    }
    Ok(())
}

fn warn_on_duplicate_ids(products: &[Product]) {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            warn!(id = %product.id, "stored catalog contains a duplicate product id");
        }
    }
}
