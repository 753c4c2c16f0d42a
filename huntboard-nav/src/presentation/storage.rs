use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::errors::LayoutStoreError;
use super::layout::PanelLayout;

/// Keyed persistence of panel layouts.
///
/// Every browser instance reads and writes only its own storage key, so
/// instances sharing one store never interfere; last write wins per key.
pub trait LayoutStore {
    fn load(&self, key: &str) -> Result<Option<PanelLayout>, LayoutStoreError>;

    fn save(
        &mut self,
        key: &str,
        layout: PanelLayout,
    ) -> Result<(), LayoutStoreError>;
}

/// Session-only store.
#[derive(Debug, Default, Clone)]
pub struct MemoryLayoutStore {
    layouts: HashMap<String, PanelLayout>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<PanelLayout> {
        self.layouts.get(key).copied()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, key: &str) -> Result<Option<PanelLayout>, LayoutStoreError> {
        Ok(self.get(key))
    }

    fn save(
        &mut self,
        key: &str,
        layout: PanelLayout,
    ) -> Result<(), LayoutStoreError> {
        self.layouts.insert(key.to_string(), layout);
        Ok(())
    }
}

/// Store backed by one JSON object keyed by storage key.
#[derive(Debug, Clone)]
pub struct JsonLayoutStore {
    path: PathBuf,
}

impl JsonLayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location.
    pub fn at_default_path() -> Self {
        Self::new(default_layouts_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(
        &self,
    ) -> Result<BTreeMap<String, PanelLayout>, LayoutStoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            },
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&data)?)
    }
}

impl LayoutStore for JsonLayoutStore {
    fn load(&self, key: &str) -> Result<Option<PanelLayout>, LayoutStoreError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn save(
        &mut self,
        key: &str,
        layout: PanelLayout,
    ) -> Result<(), LayoutStoreError> {
        let mut layouts = match self.read_all() {
            Ok(layouts) => layouts,
            Err(LayoutStoreError::Json(err)) => {
                log::warn!(
                    "replacing unreadable layout file {}: {err}",
                    self.path.display()
                );
                BTreeMap::new()
            },
            Err(err) => return Err(err),
        };
        layouts.insert(key.to_string(), layout);

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let payload = serde_json::to_string_pretty(&layouts)?;
        write_atomic(&self.path, payload.as_bytes())?;

        Ok(())
    }
}

/// Share one store between several browser instances.
impl<S: LayoutStore + ?Sized> LayoutStore for Rc<RefCell<S>> {
    fn load(&self, key: &str) -> Result<Option<PanelLayout>, LayoutStoreError> {
        self.try_borrow()
            .map_err(|_| LayoutStoreError::Unavailable)?
            .load(key)
    }

    fn save(
        &mut self,
        key: &str,
        layout: PanelLayout,
    ) -> Result<(), LayoutStoreError> {
        self.try_borrow_mut()
            .map_err(|_| LayoutStoreError::Unavailable)?
            .save(key, layout)
    }
}

pub fn default_layouts_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("huntboard")
            .join("layouts.json");
    }

    std::env::temp_dir().join("huntboard").join("layouts.json")
}

fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), std::io::Error> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
