//! Chat — responder-facing conversation endpoint.
//!
//! Each turn rebuilds the transcript from prior user turns, runs the matching
//! engine, and hands the selected resources and questions to a `Responder`.

pub mod handlers;
pub mod prompts;
pub mod responder;
pub mod transcript;
