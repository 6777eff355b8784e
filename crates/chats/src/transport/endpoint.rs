use url::Url;

use crate::entities::RoomId;
use crate::types::{ChatError, ChatResult};

/// Base address of the chat service; room channels live beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEndpoint {
    base: Url,
}

impl ChatEndpoint {
    pub fn parse(base: &str) -> ChatResult<Self> {
        let base = Url::parse(base)?;
        match base.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ChatError::invalid_endpoint(format!(
                    "unsupported scheme '{other}', expected ws or wss"
                )))
            }
        }
        if base.cannot_be_a_base() || base.host_str().is_none() {
            return Err(ChatError::invalid_endpoint("endpoint has no host"));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Address of `room`'s channel with the access token as a query parameter.
    ///
    /// The result carries a credential; log [`ChatEndpoint::redacted`] instead.
    pub fn room_target(&self, room: RoomId, token: &str) -> Url {
        let mut target = self.base.clone();
        target.set_query(None);
        target.set_fragment(None);
        if let Ok(mut segments) = target.path_segments_mut() {
            segments.pop_if_empty().push(&room.to_string());
        }
        target.query_pairs_mut().append_pair("token", token);
        target
    }

    /// Target without its query, safe to log
    pub fn redacted(target: &Url) -> String {
        let mut shown = target.clone();
        shown.set_query(None);
        shown.to_string()
    }
}
