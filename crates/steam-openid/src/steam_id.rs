use std::{fmt, str::FromStr};

/// A 64-bit [SteamID] belonging to an individual user account.
///
/// Steam only ever signs in individual accounts, so this is the only kind of SteamID a
/// successful login can produce.
///
/// [SteamID]: https://developer.valvesoftware.com/wiki/SteamID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SteamId(u64);

/// Different types of Steam accounts
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType
{
	Invalid = 0,
	Individual = 1,
	Multiseat = 2,
	GameServer = 3,
	AnonGameServer = 4,
	Pending = 5,
	ContentServer = 6,
	Clan = 7,
	Chat = 8,
	P2P = 9,
	AnonUser = 10,
}

/// Error returned when a 64-bit value is not an individual's SteamID.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("{_0} is not an individual's SteamID64")]
pub struct NotAnIndividual(#[error(ignore)] u64);

/// Checks whether `value` is an individual's 64-bit SteamID.
///
/// Only the account type nibble (bits 52..=55) is inspected.
pub const fn is_individual_steam64(value: u64) -> bool
{
	matches!(AccountType::from_bits(value), Some(AccountType::Individual))
}

impl SteamId
{
	/// Creates a [`SteamId`] from its raw 64-bit representation.
	pub const fn from_u64(value: u64) -> Result<Self, NotAnIndividual>
	{
		if !is_individual_steam64(value) {
			return Err(NotAnIndividual(value));
		}

		Ok(Self(value))
	}

	/// Returns the 64-bit representation of this [`SteamId`].
	pub const fn as_u64(&self) -> u64
	{
		self.0
	}
}

impl AccountType
{
	/// Extracts the account type bits from a raw 64-bit SteamID.
	///
	/// If the bits are invalid, this function will return [`None`].
	pub const fn from_bits(bits: u64) -> Option<Self>
	{
		match (bits << 8) >> 60 {
			0 => Some(Self::Invalid),
			1 => Some(Self::Individual),
			2 => Some(Self::Multiseat),
			3 => Some(Self::GameServer),
			4 => Some(Self::AnonGameServer),
			5 => Some(Self::Pending),
			6 => Some(Self::ContentServer),
			7 => Some(Self::Clan),
			8 => Some(Self::Chat),
			9 => Some(Self::P2P),
			10 => Some(Self::AnonUser),
			_ => None,
		}
	}
}

impl fmt::Display for SteamId
{
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		fmt::Display::fmt(&self.0, fmt)
	}
}

impl TryFrom<u64> for SteamId
{
	type Error = NotAnIndividual;

	fn try_from(value: u64) -> Result<Self, Self::Error>
	{
		Self::from_u64(value)
	}
}

impl From<SteamId> for u64
{
	fn from(steam_id: SteamId) -> Self
	{
		steam_id.0
	}
}

/// Error returned when parsing a [`SteamId`] from a string.
#[derive(Debug, Display, Error, From)]
pub enum ParseSteamIdError
{
	/// The string was not a decimal 64-bit integer.
	#[display("invalid SteamID64: {_0}")]
	NotAnInteger(std::num::ParseIntError),

	/// The integer was not an individual's SteamID.
	#[display("{_0}")]
	NotAnIndividual(NotAnIndividual),
}

impl FromStr for SteamId
{
	type Err = ParseSteamIdError;

	fn from_str(value: &str) -> Result<Self, Self::Err>
	{
		Ok(Self::from_u64(value.parse::<u64>()?)?)
	}
}
