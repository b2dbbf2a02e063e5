// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for the AMQP Facade
//!
//! This module provides the error type shared by every operation in the crate.
//! Variants fall into two categories: configuration errors, raised synchronously
//! before any transport call is made, and transport errors, raised by the
//! underlying connection/channel during declare, bind, publish, consume and
//! close operations.

use thiserror::Error;

/// Represents errors that can occur during AMQP operations.
///
/// Configuration errors fail fast and are never retried. Transport errors are
/// propagated uncaught during active operations; only the teardown path
/// catches and discards them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmqpError {
    /// An exchange was built from options without a name
    #[error("exchange name is required")]
    ExchangeNameRequired,

    /// A generic exchange was built from options without a type
    #[error("exchange type is required")]
    ExchangeTypeRequired,

    /// A queue was built from options without a name
    #[error("queue name is required")]
    QueueNameRequired,

    /// A message failed to produce a publishable envelope
    #[error("failure to build the message for publishing: `{0}`")]
    UnbuildableMessage(String),

    /// Error establishing a connection to the broker
    #[error("failure to connect")]
    ConnectionError,

    /// Error opening a channel on an established connection
    #[error("failure to open a channel")]
    ChannelError,

    /// Error declaring an exchange with the given name
    #[error("failure to declare the exchange `{0}`")]
    DeclareExchangeError(String),

    /// Error declaring a queue with the given name
    #[error("failure to declare the queue `{0}`")]
    DeclareQueueError(String),

    /// Error binding a queue to an exchange
    #[error("failure to bind the queue `{0}` to the exchange `{1}`")]
    BindQueueError(String, String),

    /// Error applying Qos parameters to the channel
    #[error("failure to configure qos")]
    QosError,

    /// Error publishing a message
    #[error("failure to publish")]
    PublishError,

    /// Error registering a consumer with the given tag
    #[error("failure to register the consumer `{0}`")]
    ConsumerRegistrationError(String),

    /// Error while waiting for a delivery
    #[error("failure while waiting for deliveries: `{0}`")]
    WaitError(String),

    /// Error acknowledging a delivery
    #[error("failure to ack the delivery")]
    AckError,

    /// Error negative-acknowledging a delivery
    #[error("failure to nack the delivery")]
    NackError,

    /// Error closing a channel or a connection
    #[error("failure to close")]
    CloseError,

    /// A consume handler rejected a delivery
    #[error("handler failure: `{0}`")]
    HandlerError(String),
}

impl AmqpError {
    /// Whether the error was raised by this layer before reaching the transport.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AmqpError::ExchangeNameRequired
                | AmqpError::ExchangeTypeRequired
                | AmqpError::QueueNameRequired
                | AmqpError::UnbuildableMessage(_)
        )
    }

    /// Whether the error was surfaced by the underlying transport.
    pub fn is_transport(&self) -> bool {
        !self.is_configuration() && !matches!(self, AmqpError::HandlerError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_not_transport_errors() {
        assert!(AmqpError::ExchangeNameRequired.is_configuration());
        assert!(AmqpError::ExchangeTypeRequired.is_configuration());
        assert!(AmqpError::QueueNameRequired.is_configuration());
        assert!(AmqpError::UnbuildableMessage("oops".into()).is_configuration());

        assert!(!AmqpError::ExchangeNameRequired.is_transport());
    }

    #[test]
    fn transport_errors_are_not_configuration_errors() {
        for err in [
            AmqpError::ConnectionError,
            AmqpError::ChannelError,
            AmqpError::DeclareExchangeError("ex".into()),
            AmqpError::DeclareQueueError("qu".into()),
            AmqpError::BindQueueError("qu".into(), "ex".into()),
            AmqpError::QosError,
            AmqpError::PublishError,
            AmqpError::WaitError("broken pipe".into()),
            AmqpError::CloseError,
        ] {
            assert!(err.is_transport());
            assert!(!err.is_configuration());
        }
    }

    #[test]
    fn handler_errors_belong_to_neither_category() {
        let err = AmqpError::HandlerError("rejected".into());
        assert!(!err.is_configuration());
        assert!(!err.is_transport());
    }
}
