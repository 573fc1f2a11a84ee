//! Media retry entry points used by the rest of the client.
//!
//! The receipt is sent as:
//!
//! ```text
//! <receipt id="…" to="own non-AD jid" type="server-error">
//!   <encrypt>
//!     <enc_p>ciphertext</enc_p>
//!     <enc_iv>iv</enc_iv>
//!   </encrypt>
//!   <rmr jid="chat" from_me="…" participant="sender"?/>
//! </receipt>
//! ```

use mediaretry_crypto::{encrypt_media_retry_receipt, MediaRetryNotification, Sealed};
use mediaretry_protocol::{
    parse_media_retry_notification, Jid, MediaRetryContent, MediaRetryEvent, MessageInfo, Node,
};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::dispatch::{Event, EventDispatcher};
use crate::error::{ClientError, ConfigError};
use crate::transport::NodeSender;

pub struct Client<S, D> {
    own_id: Option<Jid>,
    sender: S,
    dispatcher: D,
}

impl<S: NodeSender, D: EventDispatcher> Client<S, D> {
    pub fn new(own_id: Option<Jid>, sender: S, dispatcher: D) -> Self {
        Self {
            own_id,
            sender,
            dispatcher,
        }
    }

    pub fn from_config(config: &ClientConfig, sender: S, dispatcher: D) -> Result<Self, ConfigError> {
        Ok(Self::new(config.own_id()?, sender, dispatcher))
    }

    pub fn own_id(&self) -> Option<&Jid> {
        self.own_id.as_ref()
    }

    /// Ask the phone to re-upload the media in `message`.
    ///
    /// The answer arrives later as an [`Event::MediaRetry`] and must be
    /// decrypted with [`decrypt_media_retry_notification`] and the same
    /// `media_key`. Nothing is written if encryption fails.
    pub fn send_media_retry_receipt(
        &self,
        message: &MessageInfo,
        media_key: &[u8],
    ) -> Result<(), ClientError> {
        let own_id = self.own_id.as_ref().ok_or(ClientError::NotLoggedIn)?;
        let sealed = encrypt_media_retry_receipt(&message.id, media_key)?;
        let node = build_media_retry_receipt(own_id, message, &sealed);
        self.sender.send_node(node)?;
        debug!(message_id = %message.id, chat = %message.chat, "sent media retry receipt");
        Ok(())
    }

    /// Parse an inbound notification and dispatch it. Malformed
    /// notifications are logged and dropped.
    pub fn handle_media_retry_notification(&self, node: &Node) {
        match parse_media_retry_notification(node) {
            Ok(evt) => self.dispatcher.dispatch_event(Event::MediaRetry(evt)),
            Err(e) => {
                let id = node.attrs.get("id").map(ToString::to_string);
                warn!(tag = %node.tag, id = ?id, "failed to parse media retry notification: {e}");
            }
        }
    }
}

/// Assemble the `receipt` node carrying a sealed retry request.
pub fn build_media_retry_receipt(own_id: &Jid, message: &MessageInfo, sealed: &Sealed) -> Node {
    let mut rmr = Node::new("rmr")
        .attr("jid", &message.chat)
        .attr("from_me", message.is_from_me);
    if message.is_group {
        rmr = rmr.attr("participant", &message.sender);
    }

    Node::new("receipt")
        .attr("id", message.id.as_str())
        .attr("to", own_id.to_non_ad())
        .attr("type", "server-error")
        .children(vec![
            Node::new("encrypt").children(vec![
                Node::new("enc_p").bytes(sealed.ciphertext.clone()),
                Node::new("enc_iv").bytes(sealed.iv.to_vec()),
            ]),
            rmr,
        ])
}

/// Decrypt the payload of a media retry event using the media key passed to
/// [`Client::send_media_retry_receipt`].
pub fn decrypt_media_retry_notification(
    evt: &MediaRetryEvent,
    media_key: &[u8],
) -> Result<MediaRetryNotification, ClientError> {
    match &evt.content {
        MediaRetryContent::Declined(err) => Err(ClientError::Declined { code: err.code }),
        MediaRetryContent::Encrypted { ciphertext, iv } => {
            mediaretry_crypto::decrypt_media_retry_notification(
                &evt.message_id,
                media_key,
                ciphertext,
                iv,
            )
            .map_err(ClientError::DecryptNotification)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mediaretry_crypto::{
        decrypt_media_retry_receipt, encrypt_media_retry_notification, CryptoError,
        MediaRetryResult, GCM_TAG_SIZE, IV_LEN,
    };
    use mediaretry_protocol::{AttrValue, NodeContent};

    use super::*;
    use crate::error::TransportError;

    const MEDIA_KEY: [u8; 32] = [0x5A; 32];

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<Node>>,
        fail: bool,
    }

    impl NodeSender for RecordingSender {
        fn send_node(&self, node: Node) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Closed);
            }
            self.sent.lock().unwrap().push(node);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        events: Mutex<Vec<Event>>,
    }

    impl EventDispatcher for RecordingDispatcher {
        fn dispatch_event(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn own_id() -> Jid {
        "4915112345.0:3@s.whatsapp.net".parse().unwrap()
    }

    fn client() -> Client<RecordingSender, RecordingDispatcher> {
        Client::new(Some(own_id()), RecordingSender::default(), RecordingDispatcher::default())
    }

    fn group_message() -> MessageInfo {
        MessageInfo {
            id: "3EB0ABC123".into(),
            chat: "120363000000@g.us".parse().unwrap(),
            sender: "4917600000@s.whatsapp.net".parse().unwrap(),
            is_from_me: false,
            is_group: true,
        }
    }

    fn direct_message() -> MessageInfo {
        MessageInfo {
            id: "3EB0DEF456".into(),
            chat: "4917600000@s.whatsapp.net".parse().unwrap(),
            sender: "4917600000@s.whatsapp.net".parse().unwrap(),
            is_from_me: false,
            is_group: false,
        }
    }

    fn sent_nodes(client: &Client<RecordingSender, RecordingDispatcher>) -> Vec<Node> {
        client.sender.sent.lock().unwrap().clone()
    }

    #[test]
    fn receipt_shape() {
        let client = client();
        let message = group_message();
        client.send_media_retry_receipt(&message, &MEDIA_KEY).unwrap();

        let sent = sent_nodes(&client);
        assert_eq!(sent.len(), 1);
        let receipt = &sent[0];
        assert_eq!(receipt.tag, "receipt");
        assert_eq!(receipt.attrs.get("id"), Some(&AttrValue::from("3EB0ABC123")));
        assert_eq!(receipt.attrs.get("type"), Some(&AttrValue::from("server-error")));
        assert_eq!(
            receipt.attrs.get("to"),
            Some(&AttrValue::Jid("4915112345@s.whatsapp.net".parse().unwrap()))
        );

        let tags: Vec<_> = receipt.child_nodes().iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, ["encrypt", "rmr"]);

        let iv = receipt.get_child_by_tag(&["encrypt", "enc_iv"]).bytes_content().unwrap();
        assert_eq!(iv.len(), IV_LEN);
        let ciphertext = receipt.get_child_by_tag(&["encrypt", "enc_p"]).bytes_content().unwrap();
        assert!(ciphertext.len() > GCM_TAG_SIZE);
    }

    #[test]
    fn peer_can_open_the_receipt() {
        let client = client();
        let message = direct_message();
        client.send_media_retry_receipt(&message, &MEDIA_KEY).unwrap();

        let receipt = &sent_nodes(&client)[0];
        let ciphertext = receipt.get_child_by_tag(&["encrypt", "enc_p"]).bytes_content().unwrap();
        let iv = receipt.get_child_by_tag(&["encrypt", "enc_iv"]).bytes_content().unwrap();
        let opened = decrypt_media_retry_receipt(&message.id, &MEDIA_KEY, ciphertext, iv).unwrap();
        assert_eq!(opened.stanza_id, message.id);
    }

    #[test]
    fn group_receipt_has_participant() {
        let client = client();
        client.send_media_retry_receipt(&group_message(), &MEDIA_KEY).unwrap();
        let receipt = &sent_nodes(&client)[0];
        let mut ag = receipt.get_child_by_tag(&["rmr"]).attr_getter();
        assert!(ag.jid("jid").is_group());
        assert!(!ag.bool("from_me"));
        assert_eq!(ag.jid("participant").user, "4917600000");
        assert!(ag.ok());
    }

    #[test]
    fn direct_receipt_has_no_participant() {
        let client = client();
        client.send_media_retry_receipt(&direct_message(), &MEDIA_KEY).unwrap();
        let receipt = &sent_nodes(&client)[0];
        let rmr = receipt.get_child_by_tag(&["rmr"]);
        assert!(rmr.attrs.contains_key("jid"));
        assert!(!rmr.attrs.contains_key("participant"));
    }

    #[test]
    fn not_logged_in_sends_nothing() {
        let client = Client::new(None, RecordingSender::default(), RecordingDispatcher::default());
        let err = client.send_media_retry_receipt(&direct_message(), &MEDIA_KEY).unwrap_err();
        assert!(matches!(err, ClientError::NotLoggedIn));
        assert!(sent_nodes(&client).is_empty());
    }

    #[test]
    fn transport_failure_is_returned() {
        let sender = RecordingSender {
            fail: true,
            ..Default::default()
        };
        let client = Client::new(Some(own_id()), sender, RecordingDispatcher::default());
        let err = client.send_media_retry_receipt(&direct_message(), &MEDIA_KEY).unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Closed)));
    }

    fn notification_node(message_id: &str, encrypt: Node) -> Node {
        Node::new("notification")
            .attr("t", 1_700_000_000i64)
            .attr("id", message_id)
            .attr("type", "mediaretry")
            .children(vec![
                Node::new("rmr")
                    .attr("jid", "120363000000@g.us")
                    .attr("from_me", false)
                    .attr("participant", "4917600000@s.whatsapp.net"),
                encrypt,
            ])
    }

    fn encrypted_notification(message_id: &str, media_key: &[u8]) -> Node {
        let notif = MediaRetryNotification {
            stanza_id: message_id.to_string(),
            direct_path: Some("/v/t62.7118-24/reuploaded".into()),
            result: MediaRetryResult::Success,
        };
        let sealed = encrypt_media_retry_notification(message_id, media_key, &notif).unwrap();
        notification_node(
            message_id,
            Node::new("encrypt").children(vec![
                Node::new("enc_p").bytes(sealed.ciphertext),
                Node::new("enc_iv").bytes(sealed.iv.to_vec()),
            ]),
        )
    }

    fn dispatched(client: &Client<RecordingSender, RecordingDispatcher>) -> Vec<MediaRetryEvent> {
        client
            .dispatcher
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|Event::MediaRetry(evt)| evt.clone())
            .collect()
    }

    #[test]
    fn notification_dispatched_and_decrypted() {
        let client = client();
        client.handle_media_retry_notification(&encrypted_notification("3EB0ABC123", &MEDIA_KEY));

        let events = dispatched(&client);
        assert_eq!(events.len(), 1);
        let notif = decrypt_media_retry_notification(&events[0], &MEDIA_KEY).unwrap();
        assert_eq!(notif.result, MediaRetryResult::Success);
        assert_eq!(notif.stanza_id, "3EB0ABC123");
        assert_eq!(notif.direct_path.as_deref(), Some("/v/t62.7118-24/reuploaded"));
    }

    #[test]
    fn decrypt_with_wrong_media_key_fails() {
        let client = client();
        client.handle_media_retry_notification(&encrypted_notification("ID1", &MEDIA_KEY));
        let events = dispatched(&client);
        let err = decrypt_media_retry_notification(&events[0], &[0u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::DecryptNotification(CryptoError::Authentication)
        ));
        assert!(err
            .to_string()
            .starts_with("failed to decrypt media retry notification"));
    }

    #[test]
    fn malformed_notification_is_dropped() {
        let client = client();
        let node = notification_node("ID2", Node::new("encrypt"));
        client.handle_media_retry_notification(&node);

        let no_rmr = Node::new("notification").attr("t", 1i64).attr("id", "ID3");
        client.handle_media_retry_notification(&no_rmr);

        assert!(dispatched(&client).is_empty());
    }

    #[test]
    fn declined_notification_cannot_be_decrypted() {
        let client = client();
        let node = notification_node("ID4", Node::new("error").attr("code", 2i64));
        client.handle_media_retry_notification(&node);

        let events = dispatched(&client);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            decrypt_media_retry_notification(&events[0], &MEDIA_KEY),
            Err(ClientError::Declined { code: 2 })
        ));
    }

    #[test]
    fn from_config_requires_valid_jid() {
        let config = ClientConfig {
            own_jid: Some("4915112345@s.whatsapp.net".into()),
            ..Default::default()
        };
        let client =
            Client::from_config(&config, RecordingSender::default(), RecordingDispatcher::default())
                .unwrap();
        assert_eq!(client.own_id().map(|j| j.user.as_str()), Some("4915112345"));

        let bad = ClientConfig {
            own_jid: Some("@".into()),
            ..Default::default()
        };
        assert!(
            Client::from_config(&bad, RecordingSender::default(), RecordingDispatcher::default())
                .is_err()
        );
    }

    #[test]
    fn receipt_content_is_node_list() {
        let sealed = Sealed {
            ciphertext: vec![1; 20],
            iv: [2; IV_LEN],
        };
        let node = build_media_retry_receipt(&own_id(), &direct_message(), &sealed);
        assert!(matches!(node.content, NodeContent::Nodes(_)));
        assert_eq!(
            node.get_child_by_tag(&["encrypt", "enc_p"]).bytes_content(),
            Some(&[1u8; 20][..])
        );
    }
}
