//! Parsing of inbound media retry notifications.
//!
//! ```text
//! <notification t="…" id="…">
//!   <rmr jid="…" from_me="…" participant="…"?/>
//!   <encrypt>
//!     <enc_p>ciphertext</enc_p>
//!     <enc_iv>iv</enc_iv>
//!   </encrypt>
//! </notification>
//! ```
//!
//! A peer that cannot serve the request sends `<error code="…"/>` in place of
//! `<encrypt>`.

use tracing::debug;

use crate::error::ProtocolError;
use crate::node::Node;
use crate::types::{MediaRetryContent, MediaRetryError, MediaRetryEvent};

/// Validate a notification node and extract its fields.
///
/// Does not decrypt: the media key is never available here. Either every
/// required field resolves or nothing is returned.
pub fn parse_media_retry_notification(node: &Node) -> Result<MediaRetryEvent, ProtocolError> {
    let mut ag = node.attr_getter();
    let timestamp = ag.unix_time("t");
    let message_id = ag.string("id");
    ag.finish()?;

    let rmr = node
        .get_optional_child_by_tag(&["rmr"])
        .ok_or_else(|| ProtocolError::element_missing("rmr", "retry notification"))?;
    let mut rmr_ag = rmr.attr_getter();
    let chat_id = rmr_ag.jid("jid");
    let from_me = rmr_ag.bool("from_me");
    let sender_id = rmr_ag.optional_jid("participant");
    rmr_ag.finish().map_err(ProtocolError::RmrAttributes)?;

    let content = if let Some(error) = node.get_optional_child_by_tag(&["error"]) {
        let mut err_ag = error.attr_getter();
        let code = err_ag.int64("code");
        err_ag.finish()?;
        MediaRetryContent::Declined(MediaRetryError { code })
    } else {
        let context = || format!("retry notification {message_id}");
        let ciphertext = node
            .get_child_by_tag(&["encrypt", "enc_p"])
            .bytes_content()
            .ok_or_else(|| ProtocolError::element_missing("enc_p", context()))?
            .to_vec();
        let iv = node
            .get_child_by_tag(&["encrypt", "enc_iv"])
            .bytes_content()
            .ok_or_else(|| ProtocolError::element_missing("enc_iv", context()))?
            .to_vec();
        MediaRetryContent::Encrypted { ciphertext, iv }
    };

    debug!(message_id = %message_id, chat = %chat_id, "parsed media retry notification");

    Ok(MediaRetryEvent {
        timestamp,
        message_id,
        chat_id,
        from_me,
        sender_id,
        content,
    })
}
