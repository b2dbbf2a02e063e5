// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Consumer
//!
//! Registers a consume callback on the orchestrated channel, applies Qos, and
//! drives the blocking dispatch loop. The loop occupies the calling task until
//! the channel stops consuming; cancellation is cooperative and external (a
//! cancel RPC from another task, or connection closure). Transport errors
//! raised mid-loop propagate to the caller uncaught.

use crate::{
    connection::Connection,
    errors::AmqpError,
    exchange::Exchange,
    message::Consumable,
    options::{Arguments, ConsumeOptions, ConsumerOptions},
    qos::Qos,
    queue::Queue,
    transport::ConsumerRegistration,
};
use tracing::{debug, warn};

/// Builds the default consumer tag from the host name and the process id.
///
/// Every consumer constructed in the same process shares this tag; callers
/// needing distinct tags per consumer must set `tag` explicitly.
pub fn default_consumer_tag() -> String {
    format!(
        "amqp_consumer_{}_{}",
        gethostname::gethostname().to_string_lossy(),
        std::process::id()
    )
}

/// Consumes deliveries from a queue through a [`Connection`] orchestrator.
pub struct Consumer {
    connection: Connection,
    tag: String,
    no_local: bool,
    no_ack: bool,
    exclusive: bool,
    nowait: bool,
    arguments: Arguments,
    ticket: Option<i64>,
}

impl Consumer {
    /// Creates a consumer with the host+pid default tag, then applies the
    /// given options.
    pub fn new(connection: Connection, options: Option<&ConsumerOptions>) -> Consumer {
        Consumer::with_default_tag(connection, options, default_consumer_tag)
    }

    /// Creates a consumer whose default tag comes from the given source.
    ///
    /// The source runs once, at construction; an explicit `tag` option still
    /// wins over it.
    pub fn with_default_tag(
        connection: Connection,
        options: Option<&ConsumerOptions>,
        tag_source: impl FnOnce() -> String,
    ) -> Consumer {
        let mut consumer = Consumer {
            connection,
            tag: tag_source(),
            no_local: false,
            no_ack: false,
            exclusive: false,
            nowait: false,
            arguments: Arguments::default(),
            ticket: None,
        };

        if let Some(options) = options {
            consumer.reconfigure(options);
        }

        consumer
    }

    /// Applies every option that is present, leaving absent fields unchanged.
    pub fn reconfigure(&mut self, options: &ConsumerOptions) -> &mut Self {
        if let Some(tag) = &options.tag {
            self.tag = tag.clone();
        }

        if let Some(no_local) = options.no_local {
            self.no_local = no_local;
        }

        if let Some(no_ack) = options.no_ack {
            self.no_ack = no_ack;
        }

        if let Some(exclusive) = options.exclusive {
            self.exclusive = exclusive;
        }

        if let Some(nowait) = options.nowait {
            self.nowait = nowait;
        }

        if let Some(arguments) = &options.arguments {
            self.arguments = arguments.clone();
        }

        if let Some(ticket) = options.ticket {
            self.ticket = Some(ticket);
        }

        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_no_local(&self) -> bool {
        self.no_local
    }

    pub fn is_no_ack(&self) -> bool {
        self.no_ack
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn is_nowait(&self) -> bool {
        self.nowait
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn ticket(&self) -> Option<i64> {
        self.ticket
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }

    /// Best-effort teardown of the underlying channel and connection.
    pub async fn dispose(&mut self) {
        self.connection.dispose().await;
    }

    /// Reconciles topology, applies Qos, registers the consumer, and blocks
    /// dispatching deliveries to the handler until the channel stops
    /// consuming.
    ///
    /// Qos precedence: a `qos` argument reconfigured by `options.qos` wins
    /// over a policy built from `options.qos` alone, which wins over nothing.
    /// On handler success the delivery is acked (unless `no_ack`); on handler
    /// failure it is nacked without requeue and the error propagates.
    pub async fn consume(
        &mut self,
        handler: &dyn Consumable,
        binding_key: &str,
        exchange: Option<Exchange>,
        queue: Option<Queue>,
        qos: Option<Qos>,
        options: Option<&ConsumeOptions>,
    ) -> Result<(), AmqpError> {
        if let Some(consumer_options) = options.and_then(|o| o.consumer.as_ref()) {
            self.reconfigure(consumer_options);
        }

        let exchange = self
            .connection
            .make_or_reconfigure_exchange(exchange, options.and_then(|o| o.exchange.as_ref()))?;
        let queue = self
            .connection
            .make_or_reconfigure_queue(queue, options.and_then(|o| o.queue.as_ref()))?;

        if exchange.should_declare() {
            self.connection.exchange_declare(&exchange).await?;
        }

        if queue.should_declare() {
            self.connection.queue_declare(&queue).await?;
        }

        self.connection
            .queue_bind(&queue, &exchange, binding_key, options.and_then(|o| o.bind.as_ref()))
            .await?;

        let qos = match (qos, options.and_then(|o| o.qos.as_ref())) {
            (None, Some(qos_options)) => Some(Qos::make(qos_options)),
            (Some(mut qos), Some(qos_options)) => {
                qos.reconfigure(qos_options);
                Some(qos)
            }
            (qos, None) => qos,
        };

        if let Some(qos) = qos {
            self.connection.apply_qos(&qos).await?;
        }

        let channel = self.connection.get_channel().await?;

        let registration = ConsumerRegistration {
            tag: self.tag.clone(),
            no_local: self.no_local,
            no_ack: self.no_ack,
            exclusive: self.exclusive,
            nowait: self.nowait,
            arguments: self.arguments.clone(),
            ticket: self.ticket,
        };

        debug!(queue = queue.name(), tag = self.tag, "registering consumer");
        channel.basic_consume(queue.name(), &registration).await?;

        let wait = options
            .and_then(|o| o.consume.as_ref())
            .cloned()
            .unwrap_or_default();

        while channel.is_consuming() {
            let Some(delivery) = channel.wait(&wait).await? else {
                // a single wait timed out; the loop decides whether to go on
                continue;
            };

            debug!(
                delivery_tag = delivery.delivery_tag,
                exchange = delivery.exchange,
                "delivery received"
            );

            match handler.handle(&delivery).await {
                Ok(()) => {
                    if !self.no_ack {
                        channel.basic_ack(delivery.delivery_tag).await?;
                    }
                }
                Err(err) => {
                    if !self.no_ack {
                        if let Err(nack_err) = channel.basic_nack(delivery.delivery_tag, false).await
                        {
                            warn!(error = nack_err.to_string(), "failure to nack the delivery");
                        }
                    }

                    return Err(err);
                }
            }
        }

        debug!(tag = self.tag, "consumer stopped");
        Ok(())
    }
}
