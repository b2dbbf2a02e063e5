// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Entity
//!
//! This module defines the queue value object used for topology
//! reconciliation. Like the exchange, a queue has an immutable identity (its
//! name) and a mutable configuration updated through partial-update
//! [`Queue::reconfigure`] calls. Queues are durable by default.

use crate::{
    errors::AmqpError,
    options::{Arguments, QueueOptions},
};

/// A queue declaration: name and declare parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue {
    name: String,
    declare: bool,
    passive: bool,
    durable: bool,
    exclusive: bool,
    auto_delete: bool,
    nowait: bool,
    arguments: Arguments,
    ticket: Option<i64>,
}

impl Queue {
    pub fn new(name: impl Into<String>) -> Queue {
        Queue {
            name: name.into(),
            declare: false,
            passive: false,
            durable: true,
            exclusive: false,
            auto_delete: false,
            nowait: false,
            arguments: Arguments::default(),
            ticket: None,
        }
    }

    /// Builds a queue from options.
    ///
    /// Fails with a configuration error when `name` is missing; the remaining
    /// options are applied with partial-update semantics.
    pub fn make(options: &QueueOptions) -> Result<Queue, AmqpError> {
        let name = options.name.clone().ok_or(AmqpError::QueueNameRequired)?;

        let mut queue = Queue::new(name);
        queue.reconfigure(options);
        Ok(queue)
    }

    /// Applies every option that is present, leaving absent fields unchanged.
    pub fn reconfigure(&mut self, options: &QueueOptions) -> &mut Self {
        if let Some(declare) = options.declare {
            self.declare = declare;
        }

        if let Some(passive) = options.passive {
            self.passive = passive;
        }

        if let Some(durable) = options.durable {
            self.durable = durable;
        }

        if let Some(exclusive) = options.exclusive {
            self.exclusive = exclusive;
        }

        if let Some(auto_delete) = options.auto_delete {
            self.auto_delete = auto_delete;
        }

        if let Some(nowait) = options.no_wait {
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

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn is_auto_delete(&self) -> bool {
        self.auto_delete
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_declare_contract() {
        let queue = Queue::new("example.queue");

        assert_eq!(queue.name(), "example.queue");
        assert!(!queue.should_declare());
        assert!(!queue.is_passive());
        assert!(queue.is_durable());
        assert!(!queue.is_exclusive());
        assert!(!queue.is_auto_delete());
        assert!(!queue.is_nowait());
        assert!(queue.arguments().is_empty());
        assert_eq!(queue.ticket(), None);
    }

    #[test]
    fn make_requires_a_name() {
        assert_eq!(
            Queue::make(&QueueOptions::default()),
            Err(AmqpError::QueueNameRequired)
        );
    }

    #[test]
    fn make_applies_the_remaining_options() {
        let queue = Queue::make(
            &QueueOptions::default()
                .name("example.queue")
                .declare(true)
                .exclusive(true),
        )
        .unwrap();

        assert_eq!(queue.name(), "example.queue");
        assert!(queue.should_declare());
        assert!(queue.is_exclusive());
        assert!(queue.is_durable());
    }

    #[test]
    fn reconfigure_leaves_absent_fields_unchanged() {
        let mut arguments = Arguments::new();
        arguments.insert("x-queue-mode".to_owned(), json!("lazy"));

        let mut queue = Queue::new("example.queue");
        queue.reconfigure(&QueueOptions {
            durable: Some(false),
            auto_delete: Some(true),
            arguments: Some(arguments.clone()),
            ticket: Some(20),
            ..Default::default()
        });

        assert!(!queue.is_durable());
        assert!(queue.is_auto_delete());
        assert_eq!(queue.arguments(), &arguments);
        assert_eq!(queue.ticket(), Some(20));
        // untouched by the options above
        assert!(!queue.should_declare());
        assert!(!queue.is_exclusive());
        assert!(!queue.is_nowait());
    }

    #[test]
    fn reconfigure_is_idempotent() {
        let options = QueueOptions::default().durable(false).exclusive(true);

        let mut once = Queue::new("example.queue");
        once.reconfigure(&options);

        let mut twice = Queue::new("example.queue");
        twice.reconfigure(&options);
        twice.reconfigure(&options);

        assert_eq!(once, twice);
    }

    #[test]
    fn empty_options_do_not_reconfigure() {
        let mut queue = Queue::new("example.queue");
        queue.reconfigure(&QueueOptions::default());

        assert_eq!(queue, Queue::new("example.queue"));
    }
}
