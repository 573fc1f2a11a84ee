use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::BytesMut;
use mediaretry_client::{
    decrypt_media_retry_notification, BroadcastDispatcher, ChannelSender, Client, ClientConfig,
};
use mediaretry_crypto::{
    decrypt_media_retry_receipt, derive_retry_key, encrypt_media_retry_notification,
    MediaRetryNotification, MediaRetryResult,
};
use mediaretry_protocol::codec::{decode_node, encode_node, try_decode_frame};
use mediaretry_protocol::{parse_media_retry_notification, Jid, MessageInfo, Node};
use tracing::debug;

fn decode_b64(label: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .with_context(|| format!("{label} is not valid base64"))
}

fn parse_jid(label: &str, value: &str) -> Result<Jid> {
    value
        .parse()
        .with_context(|| format!("invalid {label} JID"))
}

fn decode_frame(frame: &str) -> Result<Node> {
    let data = decode_b64("frame", frame)?;
    let mut buf = BytesMut::from(&data[..]);
    let payload = try_decode_frame(&mut buf)?.context("incomplete frame")?;
    Ok(decode_node(&payload)?)
}

pub fn derive_key(media_key: &str) -> Result<String> {
    let media_key = decode_b64("media key", media_key)?;
    let key = derive_retry_key(&media_key)?;
    Ok(STANDARD.encode(key.as_bytes()))
}

/// Run the receipt through the real client send path and return the framed bytes.
pub fn seal_receipt(
    config: &ClientConfig,
    media_key: &str,
    message_id: String,
    chat: &str,
    sender: Option<&str>,
    from_me: bool,
) -> Result<String> {
    let media_key = decode_b64("media key", media_key)?;
    let chat = parse_jid("chat", chat)?;
    let sender = match sender {
        Some(sender) => parse_jid("sender", sender)?,
        None if chat.is_group() => bail!("--sender is required for group chats"),
        None => chat.clone(),
    };
    let message = MessageInfo {
        id: message_id,
        is_group: chat.is_group(),
        chat,
        sender,
        is_from_me: from_me,
    };

    let (node_sender, mut rx) = ChannelSender::channel(config.outbound_queue_capacity.max(1));
    let dispatcher = BroadcastDispatcher::new(config.event_queue_capacity.max(1));
    let client = Client::from_config(config, node_sender, dispatcher)?;
    client.send_media_retry_receipt(&message, &media_key)?;

    let frame = rx.try_recv().context("receipt was not queued")?;
    Ok(STANDARD.encode(frame))
}

pub fn open_receipt(media_key: &str, frame: &str) -> Result<String> {
    let media_key = decode_b64("media key", media_key)?;
    let node = decode_frame(frame)?;
    if node.tag != "receipt" {
        bail!("expected <receipt>, got <{}>", node.tag);
    }

    let mut ag = node.attr_getter();
    let message_id = ag.string("id");
    let receipt_type = ag.string("type");
    ag.finish()?;
    if receipt_type != "server-error" {
        bail!("unexpected receipt type {receipt_type:?}");
    }

    let ciphertext = node
        .get_child_by_tag(&["encrypt", "enc_p"])
        .bytes_content()
        .context("receipt has no <enc_p>")?;
    let iv = node
        .get_child_by_tag(&["encrypt", "enc_iv"])
        .bytes_content()
        .context("receipt has no <enc_iv>")?;
    let receipt = decrypt_media_retry_receipt(&message_id, &media_key, ciphertext, iv)?;
    Ok(format!("retry requested for {}", receipt.stanza_id))
}

pub fn seal_notification(
    media_key: &str,
    message_id: &str,
    chat: &str,
    participant: Option<&str>,
    from_me: bool,
    direct_path: Option<String>,
    timestamp: i64,
) -> Result<String> {
    let media_key = decode_b64("media key", media_key)?;
    let chat = parse_jid("chat", chat)?;
    let result = if direct_path.is_some() {
        MediaRetryResult::Success
    } else {
        MediaRetryResult::NotFound
    };
    let notification = MediaRetryNotification {
        stanza_id: message_id.to_string(),
        direct_path,
        result,
    };
    let sealed = encrypt_media_retry_notification(message_id, &media_key, &notification)?;

    let mut rmr = Node::new("rmr").attr("jid", chat).attr("from_me", from_me);
    if let Some(participant) = participant {
        rmr = rmr.attr("participant", parse_jid("participant", participant)?);
    }
    let node = Node::new("notification")
        .attr("t", timestamp)
        .attr("id", message_id)
        .attr("type", "mediaretry")
        .children(vec![
            rmr,
            Node::new("encrypt").children(vec![
                Node::new("enc_p").bytes(sealed.ciphertext),
                Node::new("enc_iv").bytes(sealed.iv.to_vec()),
            ]),
        ]);
    Ok(STANDARD.encode(encode_node(&node)?))
}

pub fn open_notification(media_key: &str, frame: &str) -> Result<String> {
    let media_key = decode_b64("media key", media_key)?;
    let node = decode_frame(frame)?;
    let evt = parse_media_retry_notification(&node)?;
    debug!(message_id = %evt.message_id, "opening media retry notification");
    let notification = decrypt_media_retry_notification(&evt, &media_key)?;
    Ok(format!(
        "{}: {:?} {}",
        notification.stanza_id,
        notification.result,
        notification.direct_path.as_deref().unwrap_or("-"),
    ))
}
