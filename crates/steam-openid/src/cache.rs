use std::sync::{Arc, PoisonError, RwLock};

use crate::Resource;

/// Single-slot cache for the most recently discovered [`Resource`].
///
/// Concurrent `set` calls are not ordered with respect to each other; whichever write lands last
/// is kept.
#[derive(Debug, Default)]
pub struct ResourceCache
{
	slot: RwLock<Option<Arc<Resource>>>,
}

impl ResourceCache
{
	/// Creates an empty cache.
	pub const fn new() -> Self
	{
		Self { slot: RwLock::new(None) }
	}

	/// Returns the cached resource, if any.
	pub fn get(&self) -> Option<Arc<Resource>>
	{
		self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
	}

	/// Replaces the cached resource.
	pub fn set(&self, resource: Arc<Resource>)
	{
		*self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(resource);
	}

	/// Clears the cache so the next lookup performs discovery again.
	pub fn invalidate(&self)
	{
		self.slot.write().unwrap_or_else(PoisonError::into_inner).take();
	}
}
