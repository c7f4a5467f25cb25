//! Wire protocol between the genhost supervisor and its worker process
//!
//! The worker reports a single [`GenerationResult`] per run by printing a token on
//! standard output, fenced by build-id specific sentinel markers:
//!
//! ```text
//! +++++++++++++<build id>++++++++++++++<token>-------------<build id>---------------
//! ```
//!
//! The token is an XML document, gzip-compressed at the fastest level and hex-encoded,
//! so it survives any line-oriented capture of the child's output.
//!
//! # Example
//!
//! ```rust
//! use genhost_protocol::{BuildId, GenerationResult, SentinelFrame, decode, encode};
//!
//! let result = GenerationResult::new(vec!["out/a.g.cs".into()], vec![], vec!["out".into()]);
//! let build_id = BuildId::new("build_42").unwrap();
//! let frame = SentinelFrame::for_build(&build_id);
//!
//! let line = frame.wrap(&encode(&result).unwrap());
//! let token = frame.extract(&line).unwrap();
//! assert_eq!(decode(token), Some(result));
//! ```

pub mod codec;
pub mod error;
pub mod frame;
pub mod result;

pub use codec::{decode, encode};
pub use error::ProtocolError;
pub use frame::{BuildId, SentinelFrame};
pub use result::GenerationResult;
