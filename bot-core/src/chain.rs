//! # Handler chain
//!
//! Runs a sequence of handlers. All `before` hooks run in order (any false
//! stops the chain); then `handle` runs until a handler returns Stop or
//! Reply; then all `after` hooks run in reverse with the final response.

use crate::error::Result;
use crate::types::{Handler, HandlerResponse, Message};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chain of handlers: before (all) → handle (until Stop/Reply) → after (reverse).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs the full before/handle/after cycle for one message.
    #[instrument(skip(self, message))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_id = %message.id,
            "Handler chain started"
        );

        for h in &self.handlers {
            if !h.before(message).await? {
                let name = std::any::type_name_of_val(h.as_ref());
                info!(user_id = message.user.id, handler = %name, "Chain stopped by before hook");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            let response = h.handle(message).await?;
            debug!(handler = %name, response = ?response, "Handler processed");
            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(user_id = message.user.id, handler = %name, "Chain stopped by handler");
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue => {}
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        info!(
            user_id = message.user.id,
            message_id = %message.id,
            "Handler chain finished"
        );
        Ok(final_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chat, MessageDirection, User};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_message(content: &str) -> Message {
        Message {
            id: "m1".to_string(),
            user: User {
                id: 123,
                username: Some("someone".to_string()),
                first_name: Some("Some".to_string()),
                is_bot: false,
            },
            chat: Chat {
                id: 456,
                title: None,
            },
            content: content.to_string(),
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
            reply_to_message_id: None,
            reply_to_message_content: None,
        }
    }

    struct CountingHandler {
        handled: Arc<AtomicUsize>,
        response: HandlerResponse,
    }

    #[async_trait]
    impl Handler for CountingHandler {
        async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
            self.handled.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// **Test: Continue passes to the next handler; Reply stops the chain.**
    #[tokio::test]
    async fn reply_stops_chain() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));

        let chain = HandlerChain::new()
            .add_handler(Arc::new(CountingHandler {
                handled: first.clone(),
                response: HandlerResponse::Continue,
            }))
            .add_handler(Arc::new(CountingHandler {
                handled: second.clone(),
                response: HandlerResponse::Reply("done".to_string()),
            }))
            .add_handler(Arc::new(CountingHandler {
                handled: third.clone(),
                response: HandlerResponse::Continue,
            }));

        let result = chain.handle(&test_message("hi")).await.unwrap();
        assert_eq!(result, HandlerResponse::Reply("done".to_string()));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0);
    }

    /// **Test: a false before hook stops the chain before any handle runs.**
    #[tokio::test]
    async fn before_false_stops_chain() {
        struct BlockingHandler;

        #[async_trait]
        impl Handler for BlockingHandler {
            async fn before(&self, _message: &Message) -> Result<bool> {
                Ok(false)
            }
        }

        let handled = Arc::new(AtomicUsize::new(0));
        let chain = HandlerChain::new()
            .add_handler(Arc::new(BlockingHandler))
            .add_handler(Arc::new(CountingHandler {
                handled: handled.clone(),
                response: HandlerResponse::Continue,
            }));

        let result = chain.handle(&test_message("hi")).await.unwrap();
        assert_eq!(result, HandlerResponse::Stop);
        assert_eq!(handled.load(Ordering::SeqCst), 0);
    }

    /// **Test: after hooks observe the final Reply response.**
    #[tokio::test]
    async fn after_sees_final_response() {
        struct AfterCapture {
            saw_reply: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl Handler for AfterCapture {
            async fn after(&self, _message: &Message, response: &HandlerResponse) -> Result<()> {
                if matches!(response, HandlerResponse::Reply(text) if text == "the reply") {
                    self.saw_reply.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
        }

        let saw_reply = Arc::new(AtomicUsize::new(0));
        let handled = Arc::new(AtomicUsize::new(0));
        let chain = HandlerChain::new()
            .add_handler(Arc::new(AfterCapture {
                saw_reply: saw_reply.clone(),
            }))
            .add_handler(Arc::new(CountingHandler {
                handled: handled.clone(),
                response: HandlerResponse::Reply("the reply".to_string()),
            }));

        chain.handle(&test_message("hi")).await.unwrap();
        assert_eq!(saw_reply.load(Ordering::SeqCst), 1);
    }
}
