use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::domain::{DesignId, DesignRecord, NewDesign};

/// Keyed storage for finished designs.
///
/// Records are write-once: there is no update or delete, and `put` never replaces an
/// existing identifier.
pub trait DesignRepository: Send + Sync {
    fn put(&self, design: NewDesign) -> Result<DesignId, RepositoryError>;
    fn get(&self, id: &DesignId) -> Result<DesignRecord, RepositoryError>;
    fn len(&self) -> Result<usize, RepositoryError>;

    fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("design already exists")]
    Conflict,
    #[error("design not found")]
    NotFound,
    #[error("design store unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime store. Nothing is evicted and nothing survives a restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDesignRepository {
    records: Arc<RwLock<HashMap<DesignId, DesignRecord>>>,
}

impl InMemoryDesignRepository {
    fn poisoned<T>(_: T) -> RepositoryError {
        RepositoryError::Unavailable("design store lock poisoned".to_string())
    }
}

impl DesignRepository for InMemoryDesignRepository {
    fn put(&self, design: NewDesign) -> Result<DesignId, RepositoryError> {
        let id = DesignId::generate();
        let mut guard = self.records.write().map_err(Self::poisoned)?;
        match guard.entry(id.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(DesignRecord::from_new(id.clone(), design));
                Ok(id)
            }
        }
    }

    fn get(&self, id: &DesignId) -> Result<DesignRecord, RepositoryError> {
        let guard = self.records.read().map_err(Self::poisoned)?;
        guard.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        let guard = self.records.read().map_err(Self::poisoned)?;
        Ok(guard.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::domain::{InventoryItem, RenderedImage};
    use std::collections::HashSet;

    fn design() -> NewDesign {
        NewDesign {
            style: "Industrial".to_string(),
            image: RenderedImage::png(vec![1, 2, 3]),
            inventory: vec![InventoryItem {
                item_name: "Bar Stool".to_string(),
                category: "Seating".to_string(),
                visual_description: "Black steel with walnut seat".to_string(),
                estimated_price_php: 4500,
            }],
        }
    }

    #[test]
    fn put_then_get_returns_stored_record() {
        let repository = InMemoryDesignRepository::default();
        let id = repository.put(design()).expect("put succeeds");

        let record = repository.get(&id).expect("record present");
        assert_eq!(record.id, id);
        assert_eq!(record.style, "Industrial");
        assert_eq!(record.inventory.len(), 1);
        assert_eq!(repository.len().expect("len"), 1);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let repository = InMemoryDesignRepository::default();
        assert!(repository.is_empty().expect("is_empty"));

        match repository.get(&DesignId("missing".to_string())) {
            Err(RepositoryError::NotFound) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn concurrent_puts_yield_distinct_ids() {
        let repository = InMemoryDesignRepository::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = repository.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| repository.put(design()).expect("put succeeds"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: HashSet<DesignId> = handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("worker finished"))
            .collect();

        assert_eq!(ids.len(), 200);
        assert_eq!(repository.len().expect("len"), 200);
    }
}
