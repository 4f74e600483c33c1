use chrono::Local;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::storage::{HubStorage, PersistenceError, Snapshot};
use crate::model::category::{Category, Filter, UnknownCategory};
use crate::model::resource::{DraftField, Resource, ResourceFields, ResourceId};

/// Error type for resource store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}", missing_message(.fields))]
    Validation { fields: Vec<DraftField> },
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error("unknown field: {0} (expected title, link, description or category)")]
    UnknownField(String),
    #[error("no resource ids left to assign")]
    IdsExhausted,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

fn missing_message(fields: &[DraftField]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
    match names.as_slice() {
        [one] => format!("{} must not be empty", one),
        _ => format!("{} must not be empty", names.join(" and ")),
    }
}

/// The single owner of a hub's resources.
///
/// Holds the collection, the draft buffer used by add/edit, the edit cursor
/// and the active filter. Every successful change to the collection is
/// written back to the hub's stored record before the call returns.
#[derive(Debug)]
pub struct ResourceStore {
    storage: HubStorage,
    resources: Vec<Resource>,
    next_id: u64,
    filter: Filter,
    draft: ResourceFields,
    edit_cursor: Option<ResourceId>,
    default_category: Category,
}

impl ResourceStore {
    /// Load the collection from `storage`.
    ///
    /// A missing record starts empty. An unreadable one also starts empty;
    /// the error is returned alongside the store so the caller can report it
    /// (its content has already been copied to the recovery log).
    pub fn open(
        storage: HubStorage,
        default_category: Category,
    ) -> (ResourceStore, Option<PersistenceError>) {
        let (snapshot, warning) = match storage.load() {
            Ok(Some(snapshot)) => (snapshot, None),
            Ok(None) => (Snapshot::empty(), None),
            Err(e) => {
                tracing::warn!(error = %e, "starting with an empty collection");
                (Snapshot::empty(), Some(e))
            }
        };

        let store = ResourceStore {
            storage,
            resources: snapshot.resources,
            next_id: snapshot.next_id,
            filter: Filter::All,
            draft: ResourceFields::blank(default_category),
            edit_cursor: None,
            default_category,
        };
        (store, warning)
    }

    /// Re-read the stored record, e.g. after another process wrote it.
    /// On failure the in-memory collection is kept.
    pub fn reload(&mut self) -> Result<(), PersistenceError> {
        let snapshot = self.storage.load()?.unwrap_or_else(Snapshot::empty);
        self.resources = snapshot.resources;
        self.next_id = snapshot.next_id;
        Ok(())
    }

    /// Write the whole collection to the stored record.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        self.storage.save(&self.resources, self.next_id)
    }

    pub fn storage(&self) -> &HubStorage {
        &self.storage
    }

    /// The full collection, newest first
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: ResourceId) -> Option<usize> {
        self.resources.iter().position(|r| r.id == id)
    }

    /// Index of the first resource whose four fields equal `fields`
    pub fn find_matching(&self, fields: &ResourceFields) -> Option<usize> {
        self.resources.iter().position(|r| r.fields == *fields)
    }

    // -----------------------------------------------------------------------
    // Filter
    // -----------------------------------------------------------------------

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Resources matching the active filter, in collection order
    pub fn view(&self) -> impl Iterator<Item = &Resource> + '_ {
        let filter = self.filter;
        self.resources
            .iter()
            .filter(move |r| filter.matches(r.category()))
    }

    pub fn derived_view(&self) -> Vec<&Resource> {
        self.view().collect()
    }

    /// Count of resources per filter value, `All` first
    pub fn category_counts(&self) -> Vec<(Filter, usize)> {
        Filter::choices()
            .into_iter()
            .map(|f| {
                let n = self.resources.iter().filter(|r| f.matches(r.category())).count();
                (f, n)
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Draft and edit cursor
    // -----------------------------------------------------------------------

    pub fn draft(&self) -> &ResourceFields {
        &self.draft
    }

    /// The resource the next submit overwrites; `None` means submit adds
    pub fn edit_cursor(&self) -> Option<ResourceId> {
        self.edit_cursor
    }

    pub fn default_category(&self) -> Category {
        self.default_category
    }

    /// Start adding: fresh draft, no edit cursor.
    pub fn begin_add(&mut self) {
        self.reset_draft();
    }

    /// Start editing `id`: the draft becomes a copy of its fields.
    pub fn begin_edit(&mut self, id: ResourceId) -> Result<(), StoreError> {
        let resource = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.draft = resource.fields.clone();
        self.edit_cursor = Some(id);
        Ok(())
    }

    /// Start editing the resource at `index` in the full collection.
    pub fn begin_edit_at(&mut self, index: usize) -> Result<(), StoreError> {
        let id = self
            .resources
            .get(index)
            .map(|r| r.id)
            .ok_or_else(|| StoreError::NotFound(format!("index {}", index)))?;
        self.begin_edit(id)
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: &str) -> Result<(), StoreError> {
        match field {
            DraftField::Title => self.draft.title = value.to_string(),
            DraftField::Link => self.draft.link = value.to_string(),
            DraftField::Description => self.draft.description = value.to_string(),
            DraftField::Category => self.draft.category = value.parse()?,
        }
        Ok(())
    }

    /// Like [`update_draft_field`](Self::update_draft_field), with the field
    /// given by name.
    pub fn update_draft_field_named(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        let field: DraftField = name.parse().map_err(StoreError::UnknownField)?;
        self.update_draft_field(field, value)
    }

    /// Replace the whole draft buffer.
    pub fn set_draft(&mut self, fields: ResourceFields) {
        self.draft = fields;
    }

    /// Commit the draft.
    ///
    /// Without an edit cursor the draft is stored as a new resource at the
    /// front of the collection; with one, the cursor's resource takes the
    /// draft's fields in place. On success the draft and cursor are reset and
    /// the collection is persisted. An invalid draft or a cursor whose
    /// resource is gone leaves everything untouched.
    ///
    /// A persistence failure is returned after the change has been applied in
    /// memory.
    pub fn submit(&mut self) -> Result<ResourceId, StoreError> {
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            return Err(StoreError::Validation { fields: missing });
        }

        let id = match self.edit_cursor {
            Some(id) => {
                let idx = self
                    .position(id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                self.resources[idx].fields = self.draft.clone();
                id
            }
            None => {
                let id = ResourceId(self.next_id);
                self.next_id = self
                    .next_id
                    .checked_add(1)
                    .ok_or(StoreError::IdsExhausted)?;
                let mut resource = Resource::new(id, self.draft.clone());
                resource.added = Some(today_str());
                self.resources.insert(0, resource);
                id
            }
        };

        self.reset_draft();
        self.persist()?;
        Ok(id)
    }

    /// Abandon the draft without touching the collection.
    pub fn cancel_edit(&mut self) {
        self.reset_draft();
    }

    /// Remove resource `id`, persist, and return it.
    pub fn delete(&mut self, id: ResourceId) -> Result<Resource, StoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.delete_at(idx)
    }

    /// Remove the resource at `index` in the full collection.
    pub fn delete_at(&mut self, index: usize) -> Result<Resource, StoreError> {
        if index >= self.resources.len() {
            return Err(StoreError::NotFound(format!("index {}", index)));
        }
        let removed = self.resources.remove(index);
        if self.edit_cursor == Some(removed.id) {
            self.reset_draft();
        }

        log_recovery(
            self.storage.hub_dir(),
            RecoveryEntry::new(
                RecoveryCategory::Delete,
                format!("resource {} deleted", removed.id),
            )
            .field("Resource", removed.id.to_string())
            .field("Title", removed.title())
            .body(serde_json::to_string_pretty(&removed).unwrap_or_default()),
        );

        self.persist()?;
        Ok(removed)
    }

    fn reset_draft(&mut self) {
        self.draft = ResourceFields::blank(self.default_category);
        self.edit_cursor = None;
    }
}

fn today_str() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
