//! Provider discovery from Steam's XRDS document.
//!
//! Steam serves a tiny [XRDS] document at [`DISCOVERY_URL`] that looks like this:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <xrds:XRDS xmlns:xrds="xri://$xrds" xmlns="xri://$xrd*($v*2.0)">
//!   <XRD>
//!     <Service priority="0">
//!       <Type>http://specs.openid.net/auth/2.0/server</Type>
//!       <URI>https://steamcommunity.com/openid/login</URI>
//!     </Service>
//!   </XRD>
//! </xrds:XRDS>
//! ```
//!
//! Only the first `Type` / `URI` pair is of interest; priorities and additional services are
//! ignored.
//!
//! [XRDS]: https://docs.oasis-open.org/xri/2.0/specs/xri-resolution-V2.0.html
//! [`DISCOVERY_URL`]: crate::DISCOVERY_URL

use quick_xml::{Reader, events::Event};
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;

use crate::{Cancelled, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field
{
	Type,
	Uri,
}

impl Field
{
	fn from_name(name: &[u8]) -> Option<Self>
	{
		match name {
			b"Type" => Some(Self::Type),
			b"URI" => Some(Self::Uri),
			_ => None,
		}
	}

	fn from_name_ignore_case(name: &[u8]) -> Option<Self>
	{
		if name.eq_ignore_ascii_case(b"Type") {
			Some(Self::Type)
		} else if name.eq_ignore_ascii_case(b"URI") {
			Some(Self::Uri)
		} else {
			None
		}
	}
}

/// Reads a [`Resource`] from an XRDS document.
///
/// The first element named `Type` or `URI` is located, followed by the element right after it;
/// together they have to form a `Type` / `URI` pair (in either order) with non-empty text.
///
/// Returns `Ok(None)` for malformed XML, premature end of input, or a missing / empty pair. The
/// only error is [`Cancelled`], in which case nothing was produced.
#[tracing::instrument(level = "trace", skip_all, ret(level = "debug"), err(level = "debug"))]
pub async fn read_resource<R>(
	stream: R,
	cancellation_token: &CancellationToken,
) -> Result<Option<Resource>, Cancelled>
where
	R: AsyncBufRead + Unpin,
{
	let mut reader = Reader::from_reader(stream);
	reader.config_mut().trim_text(true);

	let mut buf = Vec::new();
	let mut first: Option<(Field, String)> = None;
	let mut current: Option<Field> = None;

	loop {
		buf.clear();

		let event = tokio::select! {
			biased;

			() = cancellation_token.cancelled() => return Err(Cancelled),
			event = reader.read_event_into_async(&mut buf) => event,
		};

		let event = match event {
			Ok(event) => event,
			Err(error) => {
				tracing::debug!(%error, position = reader.buffer_position(), "malformed XRDS document");
				return Ok(None);
			},
		};

		match event {
			Event::Start(element) => {
				let name = element.local_name();

				current = match first {
					None => Field::from_name(name.as_ref()),
					Some((first_field, _)) => match Field::from_name_ignore_case(name.as_ref()) {
						Some(field) if field != first_field => Some(field),
						_ => return Ok(None),
					},
				};
			},

			Event::Empty(element) => {
				let name = element.local_name();
				let is_field = match first {
					None => Field::from_name(name.as_ref()).is_some(),
					Some(_) => true,
				};

				if is_field {
					return Ok(None);
				}
			},

			Event::Text(text) => {
				let Some(field) = current.take() else {
					continue;
				};

				let Ok(value) = text.unescape() else {
					return Ok(None);
				};

				if value.is_empty() {
					return Ok(None);
				}

				match first.take() {
					None => first = Some((field, value.into_owned())),
					Some((first_field, first_value)) => {
						let (protocol_version, endpoint_url) = match first_field {
							Field::Type => (first_value, value.into_owned()),
							Field::Uri => (value.into_owned(), first_value),
						};

						return Ok(Some(Resource::new(protocol_version, endpoint_url)));
					},
				}
			},

			Event::End(_) => {
				if current.is_some() {
					return Ok(None);
				}
			},

			Event::Eof => return Ok(None),

			_ => {},
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	const STEAM_XRDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xrds:XRDS xmlns:xrds="xri://$xrds" xmlns="xri://$xrd*($v*2.0)">
	<XRD>
		<Service priority="0">
			<Type>http://specs.openid.net/auth/2.0/server</Type>
			<URI>https://steamcommunity.com/openid/login</URI>
		</Service>
	</XRD>
</xrds:XRDS>
"#;

	async fn read(document: &str) -> Option<Resource>
	{
		read_resource(document.as_bytes(), &CancellationToken::new())
			.await
			.unwrap_or_else(|err| panic!("token was never cancelled: {err}"))
	}

	#[tokio::test]
	async fn reads_steam_document()
	{
		let resource = read(STEAM_XRDS).await;

		assert_eq!(resource, Some(Resource::FALLBACK));
	}

	#[tokio::test]
	async fn accepts_uri_before_type()
	{
		let document = "<XRDS><XRD><Service><URI>https://op.example/login</URI><Type>urn:test</Type></Service></XRD></XRDS>";
		let resource = read(document).await;

		assert_eq!(resource, Some(Resource::new("urn:test", "https://op.example/login")));
	}

	#[tokio::test]
	async fn takes_first_pair_regardless_of_priority()
	{
		let document = r#"<XRDS><XRD>
			<Service priority="10"><Type>urn:first</Type><URI>https://first.example/</URI></Service>
			<Service priority="0"><Type>urn:second</Type><URI>https://second.example/</URI></Service>
		</XRD></XRDS>"#;
		let resource = read(document).await;

		assert_eq!(resource, Some(Resource::new("urn:first", "https://first.example/")));
	}

	#[tokio::test]
	async fn truncated_document_yields_nothing()
	{
		let truncated = &STEAM_XRDS[..STEAM_XRDS.find("<URI>").unwrap_or_default()];

		assert_eq!(read(truncated).await, None);
	}

	#[tokio::test]
	async fn malformed_document_yields_nothing()
	{
		assert_eq!(read("<XRDS><XRD><Type>urn:test</Tpye></XRD></XRDS>").await, None);
		assert_eq!(read("this is not xml").await, None);
		assert_eq!(read("").await, None);
	}

	#[tokio::test]
	async fn incomplete_pair_yields_nothing()
	{
		assert_eq!(read("<Service><Type>urn:test</Type><Type>urn:test</Type></Service>").await, None);
		assert_eq!(read("<Service><Type>urn:test</Type><Priority>0</Priority></Service>").await, None);
		assert_eq!(read("<Service><Type></Type><URI>https://op.example/</URI></Service>").await, None);
		assert_eq!(read("<Service><Type>urn:test</Type><URI/></Service>").await, None);
	}

	#[tokio::test]
	async fn cancellation_is_reported()
	{
		let cancellation_token = CancellationToken::new();
		cancellation_token.cancel();

		let result = read_resource(STEAM_XRDS.as_bytes(), &cancellation_token).await;

		assert_eq!(result, Err(Cancelled));
	}
}
