//! Location stops and their edits.

use crate::{HuntId, LocationId};
use serde::{Deserialize, Serialize};

/// One ordered physical stop within a hunt.
///
/// `order_index` is unique per hunt and defines traversal order. Gaps are
/// allowed; deleting a stop never renumbers the rest.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct LocationStop {
    #[builder(default)]
    id: LocationId,
    hunt_id: HuntId,
    name: String,
    #[builder(default)]
    address: Option<String>,
    order_index: i32,
    #[builder(default)]
    is_final_stop: bool,
}

impl LocationStop {
    /// Returns a builder for constructing a LocationStop.
    pub fn builder() -> LocationStopBuilder {
        LocationStopBuilder::default()
    }

    /// Applies the non-empty fields of an update.
    pub fn apply(&mut self, update: &LocationUpdate) {
        if let Some(name) = update.name() {
            self.name = name.clone();
        }
        if let Some(address) = update.address() {
            self.address = address.clone();
        }
        if let Some(is_final_stop) = update.is_final_stop() {
            self.is_final_stop = *is_final_stop;
        }
    }
}

/// A stop to append to a hunt; the store assigns id and order.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct NewLocationStop {
    name: String,
    #[builder(default)]
    address: Option<String>,
    #[builder(default)]
    is_final_stop: bool,
}

impl NewLocationStop {
    /// Creates a stop with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            is_final_stop: false,
        }
    }

    /// Returns a builder for constructing a NewLocationStop.
    pub fn builder() -> NewLocationStopBuilder {
        NewLocationStopBuilder::default()
    }
}

/// Partial edit of a stop. `None` leaves the field unchanged;
/// `address: Some(None)` clears the address.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default, setter(into, strip_option))]
pub struct LocationUpdate {
    name: Option<String>,
    address: Option<Option<String>>,
    is_final_stop: Option<bool>,
}

impl LocationUpdate {
    /// Returns a builder for constructing a LocationUpdate.
    pub fn builder() -> LocationUpdateBuilder {
        LocationUpdateBuilder::default()
    }

    /// Update that only renames the stop.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Order index for the next stop appended to a hunt: one past the highest
/// existing index, or 1 for an empty hunt.
///
/// # Examples
///
/// ```
/// use huntcraft_core::next_order_index;
///
/// assert_eq!(next_order_index([]), 1);
/// assert_eq!(next_order_index([1, 4, 2]), 5);
/// ```
pub fn next_order_index(existing: impl IntoIterator<Item = i32>) -> i32 {
    existing.into_iter().max().unwrap_or(0) + 1
}
