// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Exchange Entity
//!
//! This module defines the exchange value object used for topology
//! reconciliation. An exchange has an immutable identity (its name) and a
//! mutable configuration updated through [`Exchange::reconfigure`]. The
//! named constructors (`direct`, `fanout`, `topic`, `headers`) lock the
//! exchange kind at construction; a locked kind ignores any later change.

use crate::{
    errors::AmqpError,
    options::{Arguments, ExchangeOptions},
};
use serde::{Deserialize, Serialize};

/// Represents the types of exchanges available in AMQP 0-9-1.
///
/// - Direct: routes messages to queues on an exact routing-key match
/// - Fanout: broadcasts messages to all bound queues
/// - Topic: routes on wildcard pattern matching of routing keys
/// - Headers: routes on message header values instead of routing keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    #[default]
    Direct,
    Fanout,
    Topic,
    Headers,
}

impl ExchangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeKind::Direct => "direct",
            ExchangeKind::Fanout => "fanout",
            ExchangeKind::Topic => "topic",
            ExchangeKind::Headers => "headers",
        }
    }
}

/// An exchange declaration: name, kind and declare parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    name: String,
    kind: ExchangeKind,
    kind_locked: bool,
    declare: bool,
    passive: bool,
    durable: bool,
    auto_delete: bool,
    internal: bool,
    nowait: bool,
    arguments: Arguments,
    ticket: Option<i64>,
}

impl Exchange {
    /// Creates an exchange whose kind can still be reconfigured.
    pub fn new(name: impl Into<String>, kind: ExchangeKind) -> Exchange {
        Exchange {
            name: name.into(),
            kind,
            kind_locked: false,
            declare: false,
            passive: false,
            durable: true,
            auto_delete: false,
            internal: false,
            nowait: false,
            arguments: Arguments::default(),
            ticket: None,
        }
    }

    fn locked(name: impl Into<String>, kind: ExchangeKind) -> Exchange {
        let mut exchange = Exchange::new(name, kind);
        exchange.kind_locked = true;
        exchange
    }

    /// A direct exchange. The kind is fixed for the lifetime of the value.
    pub fn direct(name: impl Into<String>) -> Exchange {
        Exchange::locked(name, ExchangeKind::Direct)
    }

    /// A fanout exchange. The kind is fixed for the lifetime of the value.
    pub fn fanout(name: impl Into<String>) -> Exchange {
        Exchange::locked(name, ExchangeKind::Fanout)
    }

    /// A topic exchange. The kind is fixed for the lifetime of the value.
    pub fn topic(name: impl Into<String>) -> Exchange {
        Exchange::locked(name, ExchangeKind::Topic)
    }

    /// A headers exchange. The kind is fixed for the lifetime of the value.
    pub fn headers(name: impl Into<String>) -> Exchange {
        Exchange::locked(name, ExchangeKind::Headers)
    }

    /// Builds an exchange from options.
    ///
    /// Fails with a configuration error when `name` or `type` is missing;
    /// the remaining options are applied with partial-update semantics.
    pub fn make(options: &ExchangeOptions) -> Result<Exchange, AmqpError> {
        let name = options.name.clone().ok_or(AmqpError::ExchangeNameRequired)?;
        let kind = options.kind.ok_or(AmqpError::ExchangeTypeRequired)?;

        let mut exchange = Exchange::new(name, kind);
        exchange.reconfigure(options);
        Ok(exchange)
    }

    /// Applies every option that is present, leaving absent fields unchanged.
    ///
    /// The kind is only applied when it was not locked by a named constructor.
    pub fn reconfigure(&mut self, options: &ExchangeOptions) -> &mut Self {
        if let Some(kind) = options.kind {
            self.set_kind(kind);
        }

        if let Some(declare) = options.declare {
            self.declare = declare;
        }

        if let Some(passive) = options.passive {
            self.passive = passive;
        }

        if let Some(durable) = options.durable {
            self.durable = durable;
        }

        if let Some(auto_delete) = options.auto_delete {
            self.auto_delete = auto_delete;
        }

        if let Some(internal) = options.internal {
            self.internal = internal;
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

    /// Changes the exchange kind. A no-op when the kind was locked at
    /// construction.
    pub fn set_kind(&mut self, kind: ExchangeKind) -> &mut Self {
        if !self.kind_locked {
            self.kind = kind;
        }

        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExchangeKind {
        self.kind
    }

    pub fn should_declare(&self) -> bool {
        self.declare
    }

    pub fn is_passive(&self) -> bool {
        self.passive
    }

    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn is_auto_delete(&self) -> bool {
        self.auto_delete
    }

    pub fn is_internal(&self) -> bool {
        self.internal
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
}
