// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Producer
//!
//! Publishes single or batched messages through the orchestrated channel.
//! Batched publishes stage messages at the transport and flush every
//! `batch_count` staged messages (500 unless overridden), which bounds the
//! per-flush memory and RPC overhead deterministically: N messages with
//! batch size B reach the transport in exactly ⌈N/B⌉ flushes.

use crate::{
    connection::Connection,
    errors::AmqpError,
    exchange::Exchange,
    message::Producible,
    options::{PublishFlags, PublishOptions},
    transport::PublishArgs,
};
use tracing::{debug, warn};

/// Staged messages per transport flush when the caller does not override it.
pub const DEFAULT_BATCH_COUNT: usize = 500;

/// Publishes messages through a [`Connection`] orchestrator.
pub struct Producer {
    connection: Connection,
}

impl Producer {
    pub fn new(connection: Connection) -> Producer {
        Producer { connection }
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Best-effort teardown of the underlying channel and connection.
    pub async fn dispose(&mut self) {
        self.connection.dispose().await;
    }

    /// Publishes one message through the batch path.
    pub async fn publish(
        &mut self,
        message: &dyn Producible,
        routing_key: &str,
        exchange: Option<Exchange>,
        options: Option<&PublishOptions>,
    ) -> Result<bool, AmqpError> {
        self.publish_batch(&[message], routing_key, exchange, options)
            .await
    }

    /// Publishes a batch of messages, flushing every `batch_count` staged
    /// messages.
    ///
    /// An empty batch returns `Ok(false)` without touching the transport.
    /// Sub-batches flushed before a failure are considered delivered; the
    /// failing call aborts, and anything staged since the last successful
    /// flush is discarded so a later publish cannot deliver it.
    pub async fn publish_batch(
        &mut self,
        messages: &[&dyn Producible],
        routing_key: &str,
        exchange: Option<Exchange>,
        options: Option<&PublishOptions>,
    ) -> Result<bool, AmqpError> {
        if messages.is_empty() {
            return Ok(false);
        }

        let exchange = self
            .connection
            .prepare_exchange(exchange, options.and_then(|o| o.exchange.as_ref()))
            .await?;
        let channel = self.connection.get_channel().await?;

        let flags = options.and_then(|o| o.publish.as_ref());
        let args = publish_args(flags);
        let batch_count = flags
            .and_then(|f| f.batch_count)
            .unwrap_or(DEFAULT_BATCH_COUNT)
            .max(1);

        debug!(
            count = messages.len(),
            exchange = exchange.name(),
            key = routing_key,
            "publishing message batch"
        );

        // staged marks messages sitting in the buffer past the last
        // successful flush; those must never survive an aborted batch
        let mut staged = false;
        let result = async {
            let mut remaining = batch_count;
            for message in messages {
                let envelope = message.build()?;
                channel
                    .stage_publish(&envelope, exchange.name(), routing_key, &args)
                    .await?;
                staged = true;

                remaining -= 1;
                if remaining == 0 {
                    remaining = batch_count;
                    channel.flush_staged().await?;
                    staged = false;
                }
            }

            // the buffer is empty exactly when the counter sits on a flush
            // boundary
            if remaining != batch_count {
                channel.flush_staged().await?;
            }

            Ok(())
        }
        .await;

        if let Err(err) = result {
            if staged {
                if let Err(discard_err) = channel.discard_staged().await {
                    warn!(
                        error = discard_err.to_string(),
                        "failure to discard the staged messages"
                    );
                }
            }

            return Err(err);
        }

        Ok(true)
    }

    /// Publishes one message with a single immediate RPC, bypassing batching.
    ///
    /// Use this when per-message delivery confirmation matters.
    pub async fn publish_basic(
        &mut self,
        message: &dyn Producible,
        routing_key: &str,
        exchange: Option<Exchange>,
        options: Option<&PublishOptions>,
    ) -> Result<bool, AmqpError> {
        let exchange = self
            .connection
            .prepare_exchange(exchange, options.and_then(|o| o.exchange.as_ref()))
            .await?;
        let channel = self.connection.get_channel().await?;

        let args = publish_args(options.and_then(|o| o.publish.as_ref()));
        let envelope = message.build()?;

        debug!(exchange = exchange.name(), key = routing_key, "publishing message");

        channel
            .basic_publish(&envelope, exchange.name(), routing_key, &args)
            .await?;

        Ok(true)
    }
}

fn publish_args(flags: Option<&PublishFlags>) -> PublishArgs {
    PublishArgs {
        mandatory: flags.and_then(|f| f.mandatory).unwrap_or(false),
        immediate: flags.and_then(|f| f.immediate).unwrap_or(false),
        ticket: flags.and_then(|f| f.ticket),
    }
}
