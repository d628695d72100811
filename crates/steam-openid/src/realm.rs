use crate::ConfigError;

/// The relying party's identity (`realm`) and return address (`callback_url`).
///
/// Steam shows the realm on its login page and refuses callbacks outside of it, so the callback
/// URL must start with the realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmConfig
{
	realm: Box<str>,
	callback_url: Box<str>,
}

impl RealmConfig
{
	/// Creates a new [`RealmConfig`].
	///
	/// # Errors
	///
	/// Fails if either value is empty or `callback_url` does not start with `realm`.
	pub fn new(
		realm: impl Into<Box<str>>,
		callback_url: impl Into<Box<str>>,
	) -> Result<Self, ConfigError>
	{
		let realm = realm.into();
		let callback_url = callback_url.into();

		Self::validate(&realm, &callback_url)?;

		Ok(Self { realm, callback_url })
	}

	pub(crate) fn validate(realm: &str, callback_url: &str) -> Result<(), ConfigError>
	{
		if realm.is_empty() {
			return Err(ConfigError::EmptyRealm);
		}

		if callback_url.is_empty() {
			return Err(ConfigError::MissingCallback);
		}

		if !callback_url.starts_with(realm) {
			return Err(ConfigError::CallbackOutsideRealm);
		}

		Ok(())
	}

	pub fn realm(&self) -> &str
	{
		&self.realm
	}

	pub fn callback_url(&self) -> &str
	{
		&self.callback_url
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn accepts_callback_inside_realm()
	{
		let config = RealmConfig::new("http://localhost:8001/", "http://localhost:8001/openid/login");

		assert!(matches!(config, Ok(ref config) if config.realm() == "http://localhost:8001/"));
	}

	#[test]
	fn rejects_callback_outside_realm()
	{
		assert_eq!(
			RealmConfig::new("https://example.org/", "https://evil.example/openid/login"),
			Err(ConfigError::CallbackOutsideRealm),
		);
	}

	#[test]
	fn rejects_empty_values()
	{
		assert_eq!(RealmConfig::new("", "https://example.org/"), Err(ConfigError::EmptyRealm));
		assert_eq!(RealmConfig::new("https://example.org/", ""), Err(ConfigError::MissingCallback));
	}
}
