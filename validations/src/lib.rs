//! Ready-made pipe steps for `shapeguard-core` schemas.
//!
//! Checks are returned as [`Validation`]s: each has a fixed name (reported as
//! the issue's `validation`), a default message that [`Validation::with_message`]
//! replaces, and converts into a pipe [`Action`](shapeguard_core::Action).
//! A check handed a value it does not apply to (a length check on a number,
//! say) fails rather than passing silently.
//!
//! Transforms ([`to_trimmed`], [`to_lower_case`], ...) are plain
//! [`Action`](shapeguard_core::Action)s and never fail.
//!
//! # Example
//!
//! ```
//! use shapeguard_core::*;
//! use shapeguard_validations::{email, max_length, to_trimmed};
//!
//! let schema = string().with_pipe(
//!     Pipe::new()
//!         .step(to_trimmed())
//!         .step(max_length(32))
//!         .step(email().with_message("Enter a work address")),
//! );
//!
//! let ok = safe_parse(&schema, &"  jane@example.com ".into(), None);
//! assert_eq!(ok, Ok("jane@example.com".into()));
//!
//! let issues = safe_parse(&schema, &"jane".into(), None).unwrap_err();
//! assert_eq!(issues.first().validation, "email");
//! assert_eq!(issues.first().message, "Enter a work address");
//! ```

mod content;
mod custom;
mod format;
mod length;
mod size;
mod transform;
mod value;

pub use content::{ends_with, excludes, includes, starts_with};
pub use custom::{CustomAsync, custom, custom_async};
pub use format::{email, ip, ipv4, ipv6, iso_date, iso_timestamp, regex, uuid};
pub use length::{length, max_length, min_length};
pub use size::{max_size, min_size, size};
pub use transform::{to_lower_case, to_trimmed, to_upper_case, transform};
pub use value::{max_value, min_value, not_value, value};

pub use shapeguard_core::Validation;
