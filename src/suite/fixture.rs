//! Fixture naming and the handle a lifecycle threads through its steps.

// crates.io
use uuid::Uuid;
// self
use crate::_prelude::*;

/// Generates fixture names and recognizes them during the cleanup sweep.
///
/// Every name is `"<prefix> <uuid v4>"`, so anything starting with the prefix is treated as a
/// fixture regardless of which run created it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureNamer {
	prefix: String,
}
impl FixtureNamer {
	/// Creates a namer for `prefix`.
	pub fn new(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into() }
	}

	/// Returns the tag every fixture name starts with.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Returns a fresh, unique fixture name.
	pub fn random_name(&self) -> String {
		format!("{} {}", self.prefix, Uuid::new_v4())
	}

	/// Returns `true` when `name` carries this namer's tag: the prefix followed by a space.
	pub fn is_fixture(&self, name: &str) -> bool {
		name.strip_prefix(self.prefix.as_str()).is_some_and(|rest| rest.starts_with(' '))
	}
}

/// A resource instance created for verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
	/// Identifier assigned by the API.
	pub id: String,
	/// Name the fixture currently carries.
	pub name: String,
	/// Device MAC, for vehicles.
	pub device_mac: Option<String>,
}
impl Fixture {
	/// Creates a fixture handle without a device.
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self { id: id.into(), name: name.into(), device_mac: None }
	}

	/// Returns the same fixture under a new name.
	pub fn renamed(self, name: impl Into<String>) -> Self {
		Self { name: name.into(), ..self }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn random_names_are_tagged_and_unique() {
		let namer = FixtureNamer::new("script test");
		let first = namer.random_name();
		let second = namer.random_name();

		assert_ne!(first, second);
		assert!(namer.is_fixture(&first));
		assert!(first.starts_with("script test "));
		assert!(Uuid::parse_str(&first["script test ".len()..]).is_ok());
		assert!(!namer.is_fixture("production route 7"));
	}

	#[test]
	fn tag_requires_the_separating_space() {
		let namer = FixtureNamer::new("script test");

		assert!(namer.is_fixture("script test left-over"));
		assert!(!namer.is_fixture("script testing dashboard"));
		assert!(!namer.is_fixture("script test"));
	}
}
