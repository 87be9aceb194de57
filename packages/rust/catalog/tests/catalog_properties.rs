use std::collections::HashSet;

use pureextracts_catalog::{
    EmptyWritePolicy, LoadSource, ProductStore, StoreOptions, WriteOutcome,
};
use pureextracts_shared::{ProductDraft, ProductId, ProductStatus, seed_products};
use pureextracts_storage::{MemorySlots, Storage};
use uuid::Uuid;

fn frozen_clock() -> i64 {
    1_718_000_000_000
}

fn draft(name: &str, status: ProductStatus) -> ProductDraft {
    ProductDraft {
        name: name.into(),
        category: "Herbal Extract".into(),
        description: format!("{name} description"),
        applications: vec!["Nutraceuticals".into(), "Cosmetics".into()],
        purity: "96.0%".into(),
        image: "data:image/png;base64,AAAA".into(),
        status,
        price: Some(150.5),
    }
}

async fn memory_store() -> (ProductStore<MemorySlots>, MemorySlots) {
    let slots = MemorySlots::new();
    let store = ProductStore::open(slots.clone(), StoreOptions::default())
        .await
        .expect("open store");
    (store, slots)
}

#[tokio::test]
async fn ids_unique_across_rapid_creates() {
    let (store, _) = memory_store().await;
    let mut store = store.with_clock(frozen_clock);

    for i in 0..50 {
        store
            .create(draft(&format!("Extract {i}"), ProductStatus::Active))
            .await
            .unwrap();
    }

    let ids: HashSet<ProductId> = store.products().iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), store.len());
    assert_eq!(store.len(), 56);
}

#[tokio::test]
async fn ids_unique_after_reload() {
    let slots = MemorySlots::new();
    let mut first = ProductStore::open(slots.clone(), StoreOptions::default())
        .await
        .unwrap()
        .with_clock(frozen_clock);
    let a = first.create(draft("A", ProductStatus::Active)).await.unwrap();

    let mut second = ProductStore::open(slots, StoreOptions::default())
        .await
        .unwrap()
        .with_clock(frozen_clock);
    let b = second.create(draft("B", ProductStatus::Active)).await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn active_is_subset_of_all() {
    let (mut store, _) = memory_store().await;
    store.create(draft("Hidden", ProductStatus::Inactive)).await.unwrap();
    store.create(draft("Shown", ProductStatus::Active)).await.unwrap();
    let mut turmeric = store.get(ProductId(2)).unwrap().to_draft();
    turmeric.status = ProductStatus::Inactive;
    store.update(ProductId(2), turmeric).await.unwrap();

    let active = store.active_products();
    assert_eq!(active.len(), 6);
    for product in &active {
        assert_eq!(product.status, ProductStatus::Active);
        assert!(store.products().iter().any(|p| p == *product));
    }

    let names: Vec<&str> = active.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Cardamom Extract",
            "Cinnamon Extract",
            "Ginger Extract",
            "Black Pepper Extract",
            "Clove Extract",
            "Shown",
        ]
    );
}

#[tokio::test]
async fn update_preserves_identity_and_neighbours() {
    let (mut store, _) = memory_store().await;
    let before = store.products().to_vec();

    let replacement = draft("Cinnamon Supreme", ProductStatus::Active);
    assert!(store.update(ProductId(3), replacement.clone()).await.unwrap());

    let after = store.products();
    assert_eq!(after.len(), before.len());
    assert_eq!(after[2].id, ProductId(3));
    assert_eq!(after[2].to_draft(), replacement);
    for (i, (old, new)) in before.iter().zip(after).enumerate() {
        if i != 2 {
            assert_eq!(old, new);
        }
    }
}

#[tokio::test]
async fn delete_removes_exactly_one() {
    let (mut store, _) = memory_store().await;

    assert!(store.delete(ProductId(4)).await.unwrap());
    assert_eq!(store.len(), 5);
    assert!(store.get(ProductId(4)).is_none());
    let ids: Vec<i64> = store.products().iter().map(|p| p.id.0).collect();
    assert_eq!(ids, [1, 2, 3, 5, 6]);

    let snapshot = store.products().to_vec();
    assert!(!store.delete(ProductId(4)).await.unwrap());
    assert_eq!(store.products(), snapshot.as_slice());
}

#[tokio::test]
async fn persistence_roundtrip_through_libsql() {
    let path = std::env::temp_dir().join(format!("pe_catalog_{}.db", Uuid::now_v7()));

    let created = {
        let storage = Storage::open(&path).await.unwrap();
        let mut store = ProductStore::open(storage, StoreOptions::default()).await.unwrap();
        let id = store.create(draft("Saffron Extract", ProductStatus::Active)).await.unwrap();
        store.get(id).cloned().unwrap()
    };

    let storage = Storage::open(&path).await.unwrap();
    let store = ProductStore::open(storage, StoreOptions::default()).await.unwrap();
    assert_eq!(store.load_source(), LoadSource::Stored);
    assert_eq!(store.get(created.id), Some(&created));
    assert_eq!(store.len(), 7);
}

#[tokio::test]
async fn readonly_storage_rejects_mutations_without_changing_state() {
    let path = std::env::temp_dir().join(format!("pe_catalog_ro_{}.db", Uuid::now_v7()));
    drop(Storage::open(&path).await.unwrap());

    let storage = Storage::open_readonly(&path).await.unwrap();
    let mut store = ProductStore::open(storage, StoreOptions::default()).await.unwrap();
    assert!(store.delete(ProductId(1)).await.is_err());
    assert_eq!(store.len(), 6);
}

#[tokio::test]
async fn delete_to_empty_reverts_on_reload_by_default() {
    let (mut store, slots) = memory_store().await;
    for id in 1..=5 {
        store.delete(ProductId(id)).await.unwrap();
    }
    let last_stored: Vec<_> = store.products().to_vec();
    assert_eq!(last_stored.len(), 1);

    store.delete(ProductId(6)).await.unwrap();
    assert!(store.is_empty());
    assert_eq!(store.last_write(), Some(WriteOutcome::SkippedEmpty));

    let reopened = ProductStore::open(slots, StoreOptions::default()).await.unwrap();
    assert_eq!(reopened.products(), last_stored.as_slice());
}

#[tokio::test]
async fn delete_to_empty_is_durable_with_persist_policy() {
    let slots = MemorySlots::new();
    let options = StoreOptions {
        empty_writes: EmptyWritePolicy::Persist,
        ..StoreOptions::default()
    };
    let mut store = ProductStore::open(slots.clone(), options.clone()).await.unwrap();
    for id in 1..=6 {
        store.delete(ProductId(id)).await.unwrap();
    }
    assert_eq!(store.last_write(), Some(WriteOutcome::Written));

    let reopened = ProductStore::open(slots, options).await.unwrap();
    assert_eq!(reopened.load_source(), LoadSource::Stored);
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn seed_fallback_matches_documented_order() {
    let (store, _) = memory_store().await;
    assert_eq!(store.load_source(), LoadSource::Seed);
    assert_eq!(store.products(), seed_products().as_slice());
}

#[tokio::test]
async fn reload_discards_unsaved_view() {
    let (mut store, slots) = memory_store().await;
    store.create(draft("Persisted", ProductStatus::Active)).await.unwrap();

    let mut other = ProductStore::open(slots, StoreOptions::default()).await.unwrap();
    other.delete(ProductId(1)).await.unwrap();

    assert_eq!(store.len(), 7);
    assert_eq!(store.reload().await.unwrap(), LoadSource::Stored);
    assert_eq!(store.len(), 6);
    assert!(store.get(ProductId(1)).is_none());
}
