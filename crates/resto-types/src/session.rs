//! Session-related types for the client.

use std::fmt;
use std::str::FromStr;

/// Keys under which session state is persisted.
///
/// The string forms match the key names the mobile client has always used,
/// so a store written by one client can be read by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
	/// Bearer token attached to every request.
	AccessToken,
	/// Token exchanged for a new pair when the access token expires.
	RefreshToken,
	/// Serialized user profile cached at login.
	UserInfo,
}

impl SessionKey {
	/// Returns the string representation of the session key.
	pub fn as_str(&self) -> &'static str {
		match self {
			SessionKey::AccessToken => "userToken",
			SessionKey::RefreshToken => "refreshToken",
			SessionKey::UserInfo => "userInfo",
		}
	}

	/// Returns an iterator over all SessionKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::AccessToken, Self::RefreshToken, Self::UserInfo].into_iter()
	}
}

impl fmt::Display for SessionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SessionKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"userToken" => Ok(Self::AccessToken),
			"refreshToken" => Ok(Self::RefreshToken),
			"userInfo" => Ok(Self::UserInfo),
			_ => Err(()),
		}
	}
}
