// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Envelope Contracts
//!
//! The boundary between application payloads and transport bytes. A type that
//! implements [`Producible`] can be published; a type that implements
//! [`Consumable`] can be driven by the consume loop. [`JsonMessage`] is the
//! stock producible: a serde-serializable body published as
//! `application/json` with a generated message id.

use crate::{errors::AmqpError, options::Arguments};
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// Default content type for JSON messages
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Properties attached to an outgoing or incoming message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageProperties {
    pub content_type: Option<String>,
    pub message_id: Option<String>,
    pub message_type: Option<String>,
    pub correlation_id: Option<String>,
    pub reply_to: Option<String>,
    pub headers: Arguments,
}

/// A message ready to hand to the transport: payload bytes plus properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub payload: Vec<u8>,
    pub properties: MessageProperties,
}

/// The contract a message must satisfy to be published by this layer.
///
/// A failed build aborts the publish call with a configuration error before
/// any transport call is staged.
pub trait Producible: Send + Sync {
    fn build(&self) -> Result<Envelope, AmqpError>;
}

/// A producible that serializes its body as JSON.
///
/// Each build stamps the `application/json` content type and a fresh v4 uuid
/// message id unless the caller set one through the properties.
pub struct JsonMessage<T: Serialize> {
    body: T,
    properties: MessageProperties,
}

impl<T: Serialize + Send + Sync> JsonMessage<T> {
    pub fn new(body: T) -> JsonMessage<T> {
        JsonMessage {
            body,
            properties: MessageProperties::default(),
        }
    }

    pub fn with_properties(body: T, properties: MessageProperties) -> JsonMessage<T> {
        JsonMessage { body, properties }
    }

    /// Sets the message type carried in the properties.
    pub fn message_type(mut self, message_type: impl Into<String>) -> Self {
        self.properties.message_type = Some(message_type.into());
        self
    }
}

impl<T: Serialize + Send + Sync> Producible for JsonMessage<T> {
    fn build(&self) -> Result<Envelope, AmqpError> {
        let payload = serde_json::to_vec(&self.body)
            .map_err(|err| AmqpError::UnbuildableMessage(err.to_string()))?;

        let mut properties = self.properties.clone();
        properties.content_type = Some(JSON_CONTENT_TYPE.to_owned());
        if properties.message_id.is_none() {
            properties.message_id = Some(Uuid::new_v4().to_string());
        }

        Ok(Envelope {
            payload,
            properties,
        })
    }
}

/// An incoming message handed to a [`Consumable`] by the consume loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delivery {
    pub delivery_tag: u64,
    pub exchange: String,
    pub routing_key: String,
    pub redelivered: bool,
    pub properties: MessageProperties,
    pub payload: Vec<u8>,
}

/// The contract a handler must satisfy to consume deliveries.
///
/// The dispatch loop invokes `handle` synchronously for each delivery; an
/// error propagates out of the consume call after the delivery is nacked.
#[async_trait]
pub trait Consumable: Send + Sync {
    async fn handle(&self, delivery: &Delivery) -> Result<(), AmqpError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Order {
        id: u64,
        status: String,
    }

    #[test]
    fn json_message_builds_a_json_envelope() {
        let message = JsonMessage::new(Order {
            id: 42,
            status: "created".to_owned(),
        })
        .message_type("order.created");

        let envelope = message.build().unwrap();

        assert_eq!(
            envelope.properties.content_type.as_deref(),
            Some(JSON_CONTENT_TYPE)
        );
        assert_eq!(
            envelope.properties.message_type.as_deref(),
            Some("order.created")
        );
        assert!(envelope.properties.message_id.is_some());

        let decoded: serde_json::Value = serde_json::from_slice(&envelope.payload).unwrap();
        assert_eq!(decoded["id"], 42);
        assert_eq!(decoded["status"], "created");
    }

    #[test]
    fn json_message_generates_a_fresh_message_id_per_build() {
        let message = JsonMessage::new(Order {
            id: 1,
            status: "created".to_owned(),
        });

        let first = message.build().unwrap().properties.message_id;
        let second = message.build().unwrap().properties.message_id;

        assert_ne!(first, second);
    }

    #[test]
    fn caller_supplied_message_id_is_preserved() {
        let properties = MessageProperties {
            message_id: Some("fixed-id".to_owned()),
            ..Default::default()
        };
        let message = JsonMessage::with_properties(
            Order {
                id: 1,
                status: "created".to_owned(),
            },
            properties,
        );

        let envelope = message.build().unwrap();

        assert_eq!(envelope.properties.message_id.as_deref(), Some("fixed-id"));
    }
}
