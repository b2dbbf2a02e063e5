// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Transport Seam
//!
//! The two collaborator traits the orchestration layer drives. The transport
//! owns everything below the facade: wire framing, authentication, socket
//! I/O and heartbeats. `src/channel.rs` provides the lapin-backed
//! implementation; tests substitute mocks.

use crate::{
    errors::AmqpError,
    exchange::Exchange,
    message::{Delivery, Envelope},
    options::{Arguments, WaitOptions},
    qos::Qos,
    queue::Queue,
};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

/// Resolved per-message publish parameters.
///
/// `ticket` is an opaque passthrough; transports that predate its removal
/// from the protocol may honor it, everything else drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishArgs {
    pub mandatory: bool,
    pub immediate: bool,
    pub ticket: Option<i64>,
}

/// Resolved parameters for registering a consumer on a channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumerRegistration {
    pub tag: String,
    pub no_local: bool,
    pub no_ack: bool,
    pub exclusive: bool,
    pub nowait: bool,
    pub arguments: Arguments,
    pub ticket: Option<i64>,
}

/// A transport connection: opens channels and reports connectivity.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open_channel(&self) -> Result<Arc<dyn TransportChannel>, AmqpError>;

    /// Opens a channel bound to a specific channel id. Transports that assign
    /// ids themselves fail this call instead of returning a different id.
    async fn open_channel_with_id(&self, id: u16) -> Result<Arc<dyn TransportChannel>, AmqpError>;

    fn is_connected(&self) -> bool;

    async fn close(&self) -> Result<(), AmqpError>;
}

/// A transport channel: the declare/bind/publish/consume RPC surface.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransportChannel: Send + Sync {
    fn id(&self) -> u16;

    fn is_open(&self) -> bool;

    /// Whether a consumer registration is still live on this channel. The
    /// consume loop runs for as long as this reports true.
    fn is_consuming(&self) -> bool;

    async fn close(&self) -> Result<(), AmqpError>;

    async fn exchange_declare(&self, exchange: &Exchange) -> Result<(), AmqpError>;

    async fn queue_declare(&self, queue: &Queue) -> Result<(), AmqpError>;

    async fn queue_bind(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
        nowait: bool,
        arguments: &Arguments,
    ) -> Result<(), AmqpError>;

    async fn qos(&self, qos: &Qos) -> Result<(), AmqpError>;

    /// Publishes one message immediately.
    async fn basic_publish(
        &self,
        envelope: &Envelope,
        exchange: &str,
        routing_key: &str,
        args: &PublishArgs,
    ) -> Result<(), AmqpError>;

    /// Stages a message in the channel's batch buffer without sending it.
    async fn stage_publish(
        &self,
        envelope: &Envelope,
        exchange: &str,
        routing_key: &str,
        args: &PublishArgs,
    ) -> Result<(), AmqpError>;

    /// Sends every staged message. Flushing an empty buffer is a no-op.
    async fn flush_staged(&self) -> Result<(), AmqpError>;

    /// Drops every staged message without sending it. Discarding an empty
    /// buffer is a no-op.
    async fn discard_staged(&self) -> Result<(), AmqpError>;

    async fn basic_consume(
        &self,
        queue: &str,
        registration: &ConsumerRegistration,
    ) -> Result<(), AmqpError>;

    /// Waits for the next delivery. Returns `None` when a single wait timed
    /// out, when a non-blocking wait found nothing, or when the consume
    /// stream ended; the latter also flips [`is_consuming`](Self::is_consuming).
    async fn wait(&self, options: &WaitOptions) -> Result<Option<Delivery>, AmqpError>;

    async fn basic_ack(&self, delivery_tag: u64) -> Result<(), AmqpError>;

    async fn basic_nack(&self, delivery_tag: u64, requeue: bool) -> Result<(), AmqpError>;
}
