use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::data::{CatalogEntry, Category, DefinedAction, EntryHandle, TypeClass};
use super::sort::{compare, SortMode, SortNode};
use super::xml::{self, Record};
use crate::anim::archive::{ArchiveDecoder, PROBE_FACING};
use crate::error::CatalogError;

/// A node of the catalog tree, as addressed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogNode {
    /// Synthetic category root ("Mobs" / "Equipment")
    Root(Category),
    Entry(EntryHandle),
    /// An action listed under an entry
    Action(EntryHandle, usize),
}

impl CatalogNode {
    /// Entry this node belongs to, if any
    pub fn entry(self) -> Option<EntryHandle> {
        match self {
            CatalogNode::Root(_) => None,
            CatalogNode::Entry(handle) | CatalogNode::Action(handle, _) => Some(handle),
        }
    }
}

/// The Catalog maps body ids to names, type classes and defined actions.
///
/// Entries live in an arena keyed by [`EntryHandle`]; each category keeps
/// its own ordered list of handles. An id appears at most once across both
/// categories.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<EntryHandle, CatalogEntry>,
    order: [Vec<EntryHandle>; 2],
    next_handle: u64,
    sort_mode: SortMode,
}

/// Query the archive for the actions of `class` that have data
pub fn defined_actions(decoder: &dyn ArchiveDecoder, id: u32, class: TypeClass) -> Vec<DefinedAction> {
    class
        .action_names()
        .iter()
        .enumerate()
        .filter(|(index, _)| decoder.is_action_defined(id, *index, PROBE_FACING))
        .map(|(index, name)| DefinedAction { index, name: *name })
        .collect()
}

fn build_entry(
    decoder: &dyn ArchiveDecoder,
    id: u32,
    type_tag: i64,
    default_category: Category,
    name: String,
) -> Result<CatalogEntry, CatalogError> {
    let (type_class, category) =
        TypeClass::from_tag(type_tag).ok_or(CatalogError::InvalidType(type_tag))?;

    Ok(CatalogEntry {
        id,
        category: category.unwrap_or(default_category),
        type_class,
        name,
        actions: defined_actions(decoder, id, type_class),
        file_name: decoder.file_name_for(id),
    })
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the catalog from an XML file.
    ///
    /// Any malformed record aborts the load; no partial catalog is returned.
    pub fn load(path: &Path, decoder: &dyn ArchiveDecoder) -> Result<Self, CatalogError> {
        let xml = fs::read_to_string(path)?;
        let catalog = Self::from_xml(&xml, decoder)?;
        info!(
            "📁 Loaded {} animation entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Build the catalog from XML text
    pub fn from_xml(xml: &str, decoder: &dyn ArchiveDecoder) -> Result<Self, CatalogError> {
        Self::from_records(xml::parse(xml)?, decoder)
    }

    /// Build the catalog from parsed records, probing the archive for actions
    pub fn from_records(records: Vec<Record>, decoder: &dyn ArchiveDecoder) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for record in records {
            let entry = build_entry(decoder, record.body, record.type_tag, record.kind, record.name)?;
            if let Some(existing) = catalog.find(entry.id).and_then(|h| catalog.get(h)) {
                warn!(
                    "⚠️  Body {} listed twice (kept \"{}\", dropped \"{}\")",
                    entry.id, existing.name, entry.name
                );
                continue;
            }
            catalog.insert(entry);
        }
        catalog.sort();
        Ok(catalog)
    }

    fn insert(&mut self, entry: CatalogEntry) -> EntryHandle {
        let handle = EntryHandle(self.next_handle);
        self.next_handle += 1;
        self.order[entry.category.index()].push(handle);
        self.entries.insert(handle, entry);
        handle
    }

    /// Number of entries across both categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&CatalogEntry> {
        self.entries.get(&handle)
    }

    /// Handle of the entry for body `id`, in either category
    pub fn find(&self, id: u32) -> Option<EntryHandle> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.id == id)
            .map(|(handle, _)| *handle)
    }

    /// Is the body already listed (in either category)?
    pub fn contains(&self, id: u32) -> bool {
        self.find(id).is_some()
    }

    /// Entries of one category in display order
    pub fn entries(&self, category: Category) -> impl Iterator<Item = (EntryHandle, &CatalogEntry)> + '_ {
        self.order[category.index()]
            .iter()
            .filter_map(move |handle| self.entries.get(handle).map(|entry| (*handle, entry)))
    }

    /// First entry of a category in display order
    pub fn first(&self, category: Category) -> Option<EntryHandle> {
        self.order[category.index()].first().copied()
    }

    /// Body ids of one category in display order
    pub fn list_ids(&self, category: Category) -> Vec<u32> {
        self.entries(category).map(|(_, entry)| entry.id).collect()
    }

    /// Add a body under the category its type tag implies.
    ///
    /// Type 4 files a Human-table entry under Equipment; 0..=3 go under
    /// Creature. Fails without touching the catalog if the id is already
    /// listed anywhere.
    pub fn add_entry(
        &mut self,
        id: u32,
        type_tag: i64,
        name: &str,
        decoder: &dyn ArchiveDecoder,
    ) -> Result<EntryHandle, CatalogError> {
        if let Some(existing) = self.find(id).and_then(|h| self.get(h)) {
            return Err(CatalogError::Duplicate { id, category: existing.category });
        }

        let entry = build_entry(decoder, id, type_tag, Category::Creature, name.to_string())?;
        info!(
            "➕ Added {} {} \"{}\" ({} actions)",
            entry.category.export_label(),
            id,
            entry.name,
            entry.actions.len()
        );
        let handle = self.insert(entry);
        self.sort();
        Ok(handle)
    }

    /// Remove the entry a node belongs to.
    ///
    /// Action nodes remove their owning entry; roots cannot be removed.
    pub fn remove(&mut self, node: CatalogNode) -> Option<CatalogEntry> {
        let handle = node.entry()?;
        let entry = self.entries.remove(&handle)?;
        self.order[entry.category.index()].retain(|h| *h != handle);
        self.sort();
        info!("➖ Removed {} {}", entry.category.export_label(), entry.id);
        Some(entry)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Switch the sort mode and re-sort
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.sort();
    }

    pub fn toggle_sort(&mut self) -> SortMode {
        self.set_sort_mode(self.sort_mode.toggled());
        self.sort_mode
    }

    /// Stable re-sort of every category and of every entry's actions
    pub fn sort(&mut self) {
        let mode = self.sort_mode;
        for entry in self.entries.values_mut() {
            entry
                .actions
                .sort_by(|a, b| compare(mode, &SortNode::Action(a.index), &SortNode::Action(b.index)));
        }

        let entries = &self.entries;
        for order in self.order.iter_mut() {
            order.sort_by(|a, b| match (entries.get(a), entries.get(b)) {
                (Some(x), Some(y)) => compare(mode, &SortNode::Entry(x), &SortNode::Entry(y)),
                _ => a.cmp(b),
            });
        }
    }

    /// Records as persisted: creatures then equipment, each by id ascending
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.len());
        for category in Category::ALL {
            let mut entries: Vec<&CatalogEntry> = self.entries(category).map(|(_, e)| e).collect();
            entries.sort_by(|x, y| compare(SortMode::ById, &SortNode::Entry(*x), &SortNode::Entry(*y)));
            records.extend(entries.into_iter().map(|entry| Record {
                kind: entry.category,
                name: entry.name.clone(),
                body: entry.id,
                type_tag: entry.type_tag(),
            }));
        }
        records
    }

    /// Serialize to XML. Defined actions are not written; they are probed
    /// again on the next load.
    pub fn to_xml(&self) -> Result<String, CatalogError> {
        xml::write(&self.records())
    }

    /// Write the catalog to `path`
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let xml = self.to_xml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, xml)?;
        info!("💾 Catalog saved to {} ({} entries)", path.display(), self.len());
        Ok(())
    }

    /// Bodies the archive has data for that the catalog does not list yet
    pub fn undefined_bodies(&self, decoder: &dyn ArchiveDecoder) -> Vec<u32> {
        decoder
            .bodies()
            .into_iter()
            .filter(|body| !self.contains(*body))
            .collect()
    }
}
