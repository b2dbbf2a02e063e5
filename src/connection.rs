// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Connection Orchestrator
//!
//! Owns one transport connection and at most one active channel, and carries
//! the topology-reconciliation operations shared by producers and consumers:
//! make-or-reconfigure for exchanges and queues, declare, bind and qos.
//!
//! Teardown is explicit and best-effort: [`Connection::dispose`] closes the
//! channel and the connection, logging and discarding any error either close
//! raises. Every other operation propagates transport errors to the caller.

use crate::{
    errors::AmqpError,
    exchange::Exchange,
    options::{BindOptions, ExchangeOptions, QueueOptions},
    qos::Qos,
    queue::Queue,
    transport::{Transport, TransportChannel},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates a transport connection and its single active channel.
pub struct Connection {
    transport: Arc<dyn Transport>,
    channel: Option<Arc<dyn TransportChannel>>,
}

impl Connection {
    pub fn new(transport: Arc<dyn Transport>) -> Connection {
        Connection {
            transport,
            channel: None,
        }
    }

    /// Creates an orchestrator with an externally supplied channel.
    pub fn with_channel(
        transport: Arc<dyn Transport>,
        channel: Arc<dyn TransportChannel>,
    ) -> Connection {
        Connection {
            transport,
            channel: Some(channel),
        }
    }

    /// Returns the active channel, lazily opening one when none is set.
    pub async fn get_channel(&mut self) -> Result<Arc<dyn TransportChannel>, AmqpError> {
        if let Some(channel) = &self.channel {
            return Ok(channel.clone());
        }

        debug!("opening amqp channel...");
        let channel = self.transport.open_channel().await?;
        debug!(id = channel.id(), "channel opened");

        self.channel = Some(channel.clone());
        Ok(channel)
    }

    /// Opens a channel with a specific id and makes it the active channel.
    pub async fn get_channel_with_id(
        &mut self,
        id: u16,
    ) -> Result<Arc<dyn TransportChannel>, AmqpError> {
        debug!(id, "opening amqp channel with id...");
        let channel = self.transport.open_channel_with_id(id).await?;

        self.channel = Some(channel.clone());
        Ok(channel)
    }

    /// Replaces the active channel.
    ///
    /// The swap is unsynchronized; callers must ensure no publish or consume
    /// is in flight on the channel being replaced.
    pub fn set_channel(&mut self, channel: Arc<dyn TransportChannel>) {
        self.channel = Some(channel);
    }

    /// Best-effort teardown: closes the channel if open, then the connection
    /// if connected. Close failures are logged and discarded so cleanup never
    /// raises past this boundary.
    pub async fn dispose(&mut self) {
        if let Some(channel) = self.channel.take() {
            if channel.is_open() {
                if let Err(err) = channel.close().await {
                    warn!(error = err.to_string(), "ignoring channel close failure");
                }
            }
        }

        if self.transport.is_connected() {
            if let Err(err) = self.transport.close().await {
                warn!(error = err.to_string(), "ignoring connection close failure");
            }
        }
    }

    /// Reconfigures the given exchange with the options, or builds one from
    /// the options alone when no exchange is given.
    pub fn make_or_reconfigure_exchange(
        &self,
        exchange: Option<Exchange>,
        options: Option<&ExchangeOptions>,
    ) -> Result<Exchange, AmqpError> {
        match exchange {
            Some(mut exchange) => {
                if let Some(options) = options {
                    exchange.reconfigure(options);
                }
                Ok(exchange)
            }
            None => Exchange::make(options.unwrap_or(&ExchangeOptions::default())),
        }
    }

    /// Reconfigures the given queue with the options, or builds one from the
    /// options alone when no queue is given.
    pub fn make_or_reconfigure_queue(
        &self,
        queue: Option<Queue>,
        options: Option<&QueueOptions>,
    ) -> Result<Queue, AmqpError> {
        match queue {
            Some(mut queue) => {
                if let Some(options) = options {
                    queue.reconfigure(options);
                }
                Ok(queue)
            }
            None => Queue::make(options.unwrap_or(&QueueOptions::default())),
        }
    }

    /// Resolves the exchange for a publish or consume call and declares it
    /// when its configuration asks for a declare.
    pub(crate) async fn prepare_exchange(
        &mut self,
        exchange: Option<Exchange>,
        options: Option<&ExchangeOptions>,
    ) -> Result<Exchange, AmqpError> {
        let exchange = self.make_or_reconfigure_exchange(exchange, options)?;

        if exchange.should_declare() {
            self.exchange_declare(&exchange).await?;
        }

        Ok(exchange)
    }

    /// Issues the exchange-declare RPC with the exchange's configured fields.
    pub async fn exchange_declare(&mut self, exchange: &Exchange) -> Result<(), AmqpError> {
        debug!(name = exchange.name(), "declaring exchange");
        self.get_channel().await?.exchange_declare(exchange).await
    }

    /// Issues the queue-declare RPC with the queue's configured fields.
    pub async fn queue_declare(&mut self, queue: &Queue) -> Result<(), AmqpError> {
        debug!(name = queue.name(), "declaring queue");
        self.get_channel().await?.queue_declare(queue).await
    }

    /// Binds the queue to the exchange under the binding key. Bind options
    /// override `nowait` and `arguments` for this call only.
    pub async fn queue_bind(
        &mut self,
        queue: &Queue,
        exchange: &Exchange,
        binding_key: &str,
        options: Option<&BindOptions>,
    ) -> Result<(), AmqpError> {
        debug!(
            queue = queue.name(),
            exchange = exchange.name(),
            key = binding_key,
            "binding queue to exchange"
        );

        let nowait = options.and_then(|o| o.nowait).unwrap_or(false);
        let arguments = options
            .and_then(|o| o.arguments.clone())
            .unwrap_or_default();

        self.get_channel()
            .await?
            .queue_bind(queue.name(), exchange.name(), binding_key, nowait, &arguments)
            .await
    }

    /// Issues the qos RPC with the policy's three fields.
    pub async fn apply_qos(&mut self, qos: &Qos) -> Result<(), AmqpError> {
        debug!(
            prefetch_count = qos.prefetch_count(),
            prefetch_size = qos.prefetch_size(),
            global = qos.is_global(),
            "applying qos"
        );

        self.get_channel().await?.qos(qos).await
    }
}
