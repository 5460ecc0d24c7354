use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    domain::{Contract, Group, Member, Placement, ScheduledItem},
    errors::KaraError,
    utils::paths::ensure_dir,
};

use super::{DocumentStore, Result, StoreSnapshot};

const TMP_SUFFIX: &str = "tmp";

/// Collections of a JSON export, kept as raw documents.
///
/// Documents are decoded when a query reads them, so a malformed document
/// only affects the parent or lookup it belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollections {
    #[serde(default)]
    pub contracts: Vec<Value>,
    #[serde(default)]
    pub contract_payments: Vec<Value>,
    #[serde(default)]
    pub placements: Vec<Value>,
    #[serde(default)]
    pub commissions: Vec<Value>,
    #[serde(default)]
    pub members: Vec<Value>,
    #[serde(default)]
    pub groups: Vec<Value>,
}

/// Document store backed by a JSON export of the collections.
///
/// The file is read once on open; queries are served from memory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    collections: RawCollections,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(KaraError::NotFound(format!(
                "data file `{}` does not exist",
                path.display()
            )));
        }
        let collections = load_collections_from_path(&path)?;
        info!(
            path = %path.display(),
            contracts = collections.contracts.len(),
            placements = collections.placements.len(),
            "loaded document snapshot"
        );
        Ok(Self { collections })
    }

    /// Decodes every parent document, skipping the ones that do not parse.
    fn parents<T: DeserializeOwned>(documents: &[Value], collection: &str) -> Vec<T> {
        documents
            .iter()
            .filter_map(|document| match decode(document, collection) {
                Ok(parent) => Some(parent),
                Err(err) => {
                    warn!(collection, error = %err, "skipping unreadable document");
                    None
                }
            })
            .collect()
    }

    /// Decodes the items of one parent; any unreadable item fails the parent.
    fn items_of(
        documents: &[Value],
        collection: &str,
        parent_id: &str,
    ) -> Result<Vec<ScheduledItem>> {
        documents
            .iter()
            .filter(|document| string_field(document, "parent_id") == Some(parent_id))
            .map(|document| decode(document, collection))
            .collect()
    }

    fn lookup<T: DeserializeOwned>(
        documents: &[Value],
        collection: &str,
        id: &str,
    ) -> Result<Option<T>> {
        documents
            .iter()
            .find(|document| string_field(document, "id") == Some(id))
            .map(|document| decode(document, collection))
            .transpose()
    }
}

fn string_field<'v>(document: &'v Value, field: &str) -> Option<&'v str> {
    document.get(field).and_then(Value::as_str)
}

fn decode<T: DeserializeOwned>(document: &Value, collection: &str) -> Result<T> {
    T::deserialize(document).map_err(|err| {
        let id = string_field(document, "id").unwrap_or("<no id>");
        KaraError::Storage(format!("unreadable `{collection}` document `{id}`: {err}"))
    })
}

/// Writes a snapshot atomically by staging to a temporary file.
pub fn save_snapshot_to_path(snapshot: &StoreSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let json = serde_json::to_string_pretty(snapshot)?;
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads the collections of a snapshot file without decoding documents.
pub fn load_collections_from_path(path: &Path) -> Result<RawCollections> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| {
        KaraError::Storage(format!("`{}` is not a valid snapshot: {}", path.display(), err))
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

impl DocumentStore for JsonStore {
    fn list_contracts(&self) -> Result<Vec<Contract>> {
        Ok(Self::parents(&self.collections.contracts, "contracts"))
    }

    fn list_contract_payments(&self, contract_id: &str) -> Result<Vec<ScheduledItem>> {
        Self::items_of(
            &self.collections.contract_payments,
            "contract_payments",
            contract_id,
        )
    }

    fn list_placements(&self) -> Result<Vec<Placement>> {
        Ok(Self::parents(&self.collections.placements, "placements"))
    }

    fn list_commissions(&self, placement_id: &str) -> Result<Vec<ScheduledItem>> {
        Self::items_of(&self.collections.commissions, "commissions", placement_id)
    }

    fn member(&self, id: &str) -> Result<Option<Member>> {
        Self::lookup(&self.collections.members, "members", id)
    }

    fn group(&self, id: &str) -> Result<Option<Group>> {
        Self::lookup(&self.collections.groups, "groups", id)
    }
}
