//! Append-only conversation log.
//!
//! Entries are kept in submission order. Views attach through
//! [`ConversationLog::subscribe`] and receive one [`LogEvent`] per append.

use crate::message::ChatMessage;
use tokio::sync::mpsc;

/// Notification sent to subscribers after an append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A message was added at `index`.
    Appended { index: usize, message: ChatMessage },
}

/// Receiving end of a log subscription.
pub type LogReceiver = mpsc::UnboundedReceiver<LogEvent>;

/// Ordered, append-only record of the conversation.
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
    subscribers: Vec<mpsc::UnboundedSender<LogEvent>>,
}

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and notify subscribers. Returns the entry's index.
    pub fn append(&mut self, message: ChatMessage) -> usize {
        let index = self.messages.len();
        // Closed receivers are dropped here rather than on unsubscribe.
        self.subscribers.retain(|tx| {
            tx.send(LogEvent::Appended {
                index,
                message: message.clone(),
            })
            .is_ok()
        });
        self.messages.push(message);
        index
    }

    /// Attach a new observer.
    pub fn subscribe(&mut self) -> LogReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// All messages in display order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> ChatMessage {
        ChatMessage::new("IT Support", text, "9:00 AM", false)
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        for i in 0..5 {
            assert_eq!(log.append(msg(&format!("m{i}"))), i);
        }

        assert_eq!(log.len(), 5);
        let texts: Vec<&str> = log.messages().iter().map(ChatMessage::text).collect();
        assert_eq!(texts, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_append_does_not_touch_prior_entries() {
        let mut log = ConversationLog::new();
        log.append(msg("first"));
        let before = log.messages()[0].clone();

        log.append(msg("second"));
        log.append(ChatMessage::new("jdoe", "third", "9:01 AM", true));

        assert_eq!(log.messages()[0], before);
        assert_eq!(log.last().map(ChatMessage::text), Some("third"));
    }

    #[test]
    fn test_subscribers_see_each_append() {
        let mut log = ConversationLog::new();
        let mut rx = log.subscribe();

        log.append(msg("a"));
        log.append(msg("b"));

        assert_eq!(
            rx.try_recv().unwrap(),
            LogEvent::Appended {
                index: 0,
                message: msg("a")
            }
        );
        match rx.try_recv().unwrap() {
            LogEvent::Appended { index, message } => {
                assert_eq!(index, 1);
                assert_eq!(message.text(), "b");
            }
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut log = ConversationLog::new();
        let rx = log.subscribe();
        let mut live = log.subscribe();
        drop(rx);

        log.append(msg("a"));
        assert_eq!(log.subscribers.len(), 1);
        assert!(live.try_recv().is_ok());
    }

    #[test]
    fn test_empty_log() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }
}
