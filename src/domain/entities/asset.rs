use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable key of a tradable asset.
///
/// Cloning only bumps the `Arc` counter, so the book can key its queue map by
/// the same allocation every order of that asset carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(Arc<str>);

impl AssetId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        AssetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when both ids share one interned allocation.
    pub fn ptr_eq(&self, other: &AssetId) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        AssetId::new(id)
    }
}

/// An asset as seen by an order. Only `id` takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: AssetId,
    pub name: Option<String>,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>) -> Self {
        Asset { id: id.into(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
