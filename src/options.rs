// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Declarative Option Maps
//!
//! Every entity in this crate is configured through an option struct whose
//! fields are all optional: a field left as `None` leaves the target
//! unchanged, a set field overwrites it. The structs deserialize from the
//! original map key names (`type`, `auto_delete`, `no_wait`, ...), and
//! unknown keys are ignored so configuration sources can carry keys this
//! layer does not know about.

use crate::exchange::ExchangeKind;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form AMQP argument table attached to declares, binds and consumers.
pub type Arguments = BTreeMap<String, Value>;

/// Options for building or reconfiguring an [`Exchange`](crate::exchange::Exchange).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExchangeOptions {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ExchangeKind>,
    pub declare: Option<bool>,
    pub passive: Option<bool>,
    pub durable: Option<bool>,
    pub auto_delete: Option<bool>,
    pub internal: Option<bool>,
    pub nowait: Option<bool>,
    pub arguments: Option<Arguments>,
    pub ticket: Option<i64>,
}

impl ExchangeOptions {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: ExchangeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn declare(mut self, declare: bool) -> Self {
        self.declare = Some(declare);
        self
    }

    pub fn durable(mut self, durable: bool) -> Self {
        self.durable = Some(durable);
        self
    }
}

/// Options for building or reconfiguring a [`Queue`](crate::queue::Queue).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueueOptions {
    pub name: Option<String>,
    pub declare: Option<bool>,
    pub passive: Option<bool>,
    pub durable: Option<bool>,
    pub exclusive: Option<bool>,
    pub auto_delete: Option<bool>,
    pub no_wait: Option<bool>,
    pub arguments: Option<Arguments>,
    pub ticket: Option<i64>,
}

impl QueueOptions {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn declare(mut self, declare: bool) -> Self {
        self.declare = Some(declare);
        self
    }

    pub fn durable(mut self, durable: bool) -> Self {
        self.durable = Some(durable);
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = Some(exclusive);
        self
    }
}

/// Options for building or reconfiguring a [`Qos`](crate::qos::Qos) policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QosOptions {
    pub prefetch_size: Option<u32>,
    pub prefetch_count: Option<u16>,
    pub global: Option<bool>,
}

impl QosOptions {
    pub fn prefetch_count(mut self, count: u16) -> Self {
        self.prefetch_count = Some(count);
        self
    }

    pub fn prefetch_size(mut self, size: u32) -> Self {
        self.prefetch_size = Some(size);
        self
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = Some(global);
        self
    }
}

/// Options for reconfiguring a [`Consumer`](crate::consumer::Consumer).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsumerOptions {
    pub tag: Option<String>,
    pub no_local: Option<bool>,
    pub no_ack: Option<bool>,
    pub exclusive: Option<bool>,
    pub nowait: Option<bool>,
    pub arguments: Option<Arguments>,
    pub ticket: Option<i64>,
}

impl ConsumerOptions {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn no_ack(mut self, no_ack: bool) -> Self {
        self.no_ack = Some(no_ack);
        self
    }
}

/// Bind-specific overrides applied when binding a queue to an exchange.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    pub nowait: Option<bool>,
    pub arguments: Option<Arguments>,
}

/// Per-call publish flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PublishFlags {
    pub mandatory: Option<bool>,
    pub immediate: Option<bool>,
    pub ticket: Option<i64>,
    /// Messages staged between transport flushes. Defaults to 500.
    pub batch_count: Option<usize>,
}

/// Parameters handed to the transport's blocking wait primitive.
///
/// `allowed_methods` is honored only by transports with frame-filtered
/// waits; a timeout bounds a single wait call, never the outer consume loop.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    pub allowed_methods: Option<Vec<String>>,
    pub non_blocking: Option<bool>,
    #[serde(alias = "timeout")]
    pub timeout_millis: Option<u64>,
}

/// Aggregate options accepted by [`Consumer::consume`](crate::consumer::Consumer::consume).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsumeOptions {
    pub consumer: Option<ConsumerOptions>,
    pub exchange: Option<ExchangeOptions>,
    pub queue: Option<QueueOptions>,
    pub bind: Option<BindOptions>,
    pub qos: Option<QosOptions>,
    pub consume: Option<WaitOptions>,
}

/// Aggregate options accepted by the `publish*` operations.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PublishOptions {
    pub exchange: Option<ExchangeOptions>,
    pub publish: Option<PublishFlags>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_options_deserialize_from_original_key_names() {
        let options: ExchangeOptions = serde_json::from_str(
            r#"{"name":"orders","type":"topic","durable":false,"auto_delete":true,"ticket":20}"#,
        )
        .unwrap();

        assert_eq!(options.name.as_deref(), Some("orders"));
        assert_eq!(options.kind, Some(ExchangeKind::Topic));
        assert_eq!(options.durable, Some(false));
        assert_eq!(options.auto_delete, Some(true));
        assert_eq!(options.ticket, Some(20));
        assert_eq!(options.declare, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let options: QueueOptions =
            serde_json::from_str(r#"{"name":"orders","no_wait":true,"future_flag":1}"#).unwrap();

        assert_eq!(options.name.as_deref(), Some("orders"));
        assert_eq!(options.no_wait, Some(true));
    }

    #[test]
    fn wait_options_accept_the_original_timeout_key() {
        let options: WaitOptions =
            serde_json::from_str(r#"{"timeout":250,"non_blocking":true}"#).unwrap();

        assert_eq!(options.timeout_millis, Some(250));
        assert_eq!(options.non_blocking, Some(true));
    }

    #[test]
    fn consume_options_nest_every_section() {
        let options: ConsumeOptions = serde_json::from_str(
            r#"{
                "consumer": {"tag": "worker-1", "no_ack": true},
                "exchange": {"name": "orders", "type": "direct"},
                "queue": {"name": "orders.process"},
                "bind": {"nowait": true},
                "qos": {"prefetch_count": 10},
                "consume": {"timeout_millis": 250}
            }"#,
        )
        .unwrap();

        assert_eq!(options.consumer.unwrap().tag.as_deref(), Some("worker-1"));
        assert_eq!(options.exchange.unwrap().name.as_deref(), Some("orders"));
        assert_eq!(options.bind.unwrap().nowait, Some(true));
        assert_eq!(options.qos.unwrap().prefetch_count, Some(10));
        assert_eq!(options.consume.unwrap().timeout_millis, Some(250));
    }
}
