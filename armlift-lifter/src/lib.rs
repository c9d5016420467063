//! ARM → IR lowering engine.
//!
//! [`ArmTranslator::translate`] lowers one decoded ARM instruction into an
//! ordered sequence of IR instructions reproducing its data, control, and
//! flag-update semantics. Each native instruction translates independently;
//! conditional execution becomes an explicit guard jump, addressing-mode
//! side effects (write-back) become explicit register updates, and flag
//! updates are spelled out bit by bit.
//!
//! Unsupported instructions never fail the caller: they lower to a single
//! undefined IR instruction and a diagnostic on the `log` facade. A
//! translator instance owns the temporary-name supply, so it must not be
//! shared across concurrent callers; use one instance per worker.

mod builder;
mod error;
mod flags;
mod namer;
mod symbolic;
mod translate;

pub use error::Unsupported;
pub use translate::ArmTranslator;
