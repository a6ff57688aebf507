//! Command routing for the voice assistant.
//!
//! An utterance is handled by the first tier that claims it:
//!
//! 1. **Exit** keywords end the session
//! 2. **Deterministic intents** (time, identity, Wikipedia, known websites
//!    and apps) are resolved locally with no LLM call
//! 3. Everything else goes to the LLM, which must reply with a single
//!    [`StructuredAction`] JSON object; the router executes it or, if the
//!    reply is unusable, speaks an apology
//!
//! [`run_session`] drives the router from an [`UtteranceSource`].

pub mod action;
pub mod intents;
pub mod router;
pub mod session;

pub use action::{ActionKind, StructuredAction};
pub use intents::{Intent, LocalIntent};
pub use router::{CommandRouter, Outcome, RouterSettings};
pub use session::{LineSource, SessionEnd, UtteranceSource, greeting_for, run_session};
