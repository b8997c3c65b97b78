//! Scripted fake ports shared by the pipeline tests.

use crate::error::ServiceError;
use crate::genai::{ImageModel, ImageRequest, ImageResponse, TextModel, TextRequest, TextResponse};
use crate::messaging::{Messenger, PhotoMessage};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) fn transport_error(service: &'static str) -> ServiceError {
    ServiceError::Request {
        service,
        message: "connection reset by peer".to_string(),
        status_code: None,
    }
}

/// Text model returning a fixed result and recording every request.
pub(crate) struct FakeTextModel {
    response: Result<TextResponse, ServiceError>,
    pub requests: Arc<Mutex<Vec<TextRequest>>>,
}

impl FakeTextModel {
    pub fn replying(text: &str) -> Self {
        Self::with_response(Ok(TextResponse::from_text(text)))
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::with_response(Err(error))
    }

    pub fn with_response(response: Result<TextResponse, ServiceError>) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextModel for FakeTextModel {
    fn name(&self) -> &'static str {
        "fake-text"
    }

    async fn generate_content(&self, request: &TextRequest) -> Result<TextResponse, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone()
    }
}

/// Image model returning a fixed result and recording every request.
pub(crate) struct FakeImageModel {
    response: Result<ImageResponse, ServiceError>,
    delay: Option<Duration>,
    pub requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl FakeImageModel {
    pub fn returning(bytes: &[u8]) -> Self {
        Self::with_response(Ok(ImageResponse::from_bytes(bytes.to_vec())))
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::with_response(Err(error))
    }

    pub fn with_response(response: Result<ImageResponse, ServiceError>) -> Self {
        Self {
            response,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageModel for FakeImageModel {
    fn name(&self) -> &'static str {
        "fake-image"
    }

    async fn generate_images(
        &self,
        request: &ImageRequest,
    ) -> Result<ImageResponse, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

/// Messenger that records every attempted send.
///
/// Chats listed in `failing_chats` get a transport error; everything else
/// succeeds. An optional hook runs after each send (used to cancel mid-loop).
pub(crate) struct FakeMessenger {
    connect_error: Option<ServiceError>,
    failing_chats: HashSet<i64>,
    fail_all: bool,
    after_send: Option<Box<dyn Fn(usize) + Send + Sync>>,
    pub sent: Arc<Mutex<Vec<PhotoMessage>>>,
    pub connects: Arc<Mutex<usize>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self {
            connect_error: None,
            failing_chats: HashSet::new(),
            fail_all: false,
            after_send: None,
            sent: Arc::new(Mutex::new(Vec::new())),
            connects: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing_connect(mut self, error: ServiceError) -> Self {
        self.connect_error = Some(error);
        self
    }

    pub fn failing_for(mut self, chats: &[i64]) -> Self {
        self.failing_chats.extend(chats.iter().copied());
        self
    }

    pub fn failing_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn after_send(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.after_send = Some(Box::new(hook));
        self
    }

    pub fn sent_chat_ids(&self) -> Vec<i64> {
        self.sent.lock().unwrap().iter().map(|m| m.chat_id).collect()
    }

    pub fn sent_messages(&self) -> Vec<PhotoMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    fn name(&self) -> &'static str {
        "fake-messenger"
    }

    async fn connect(&self) -> Result<(), ServiceError> {
        *self.connects.lock().unwrap() += 1;
        match &self.connect_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn send_photo(&self, message: PhotoMessage) -> Result<(), ServiceError> {
        let chat_id = message.chat_id;
        let count = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message);
            sent.len()
        };
        if let Some(hook) = &self.after_send {
            hook(count);
        }
        if self.fail_all || self.failing_chats.contains(&chat_id) {
            Err(transport_error("fake-messenger"))
        } else {
            Ok(())
        }
    }
}
