//! # Unfurl: Lazy Sequences With Guaranteed Cleanup
//!
//! Build lazily-evaluated, possibly infinite sequences from an evolving piece
//! of author-owned state, with a cleanup action that runs exactly once no
//! matter how consumption ends.
//!
//! ## Core Types
//!
//! - **[`Descriptor<S, T>`]**: an immutable triple of callbacks — initializer,
//!   step, finalizer — defining one sequence's behavior
//! - **[`Step<T, S>`]**: the result of one step, either `Emit(batch, next_state)`
//!   or `Halt(final_state)`
//! - **[`Traversal<S, T>`]**: one stateful run of a descriptor, pulled on demand
//!
//! ## Key Guarantees
//!
//! - **Lazy**: no callback runs until the first element is demanded
//! - **Exactly-once cleanup**: the finalizer runs once per traversal, whether
//!   the sequence exhausts, the consumer stops early, a step faults, or the
//!   traversal is dropped mid-flight
//! - **Reusable**: a descriptor is a stateless factory; every
//!   [`begin`](Descriptor::begin) yields an independent traversal
//!
//! ## Example
//!
//! ```rust
//! use unfurl::{Descriptor, Step};
//!
//! // Count from 97, halt after 99, record the final state on cleanup.
//! let descriptor = Descriptor::new(
//!     || 97_i64,
//!     |x| if x <= 99 { Step::one(x, x + 1) } else { Step::Halt(x) },
//!     |final_state| println!("released at {final_state}"),
//! );
//!
//! assert_eq!(descriptor.begin().to_list().unwrap(), vec![97, 98, 99]);
//! ```
//!
//! ## Common Functions
//!
//! **Building descriptors:**
//! - [`Descriptor::new`] - all three callbacks up front
//! - [`Descriptor::builder`] - piecewise, with fallible callback variants
//! - [`unfold(seed, step)`](unfold) - seed plus step, no cleanup
//! - [`iterate(seed, f)`](iterate) - the endless `seed, f(seed), ...`
//!
//! **Consuming traversals:**
//! - [`Traversal::pull`] - one element on demand
//! - [`Traversal::take`] / [`Traversal::stop`] - bounded consumption
//! - [`Traversal::to_list`] / [`Traversal::fold`] / [`Traversal::for_each`]
//! - [`Traversal::into_iter`](TraversalIter) - bridge into `std::iter`

mod build;
mod consume;
mod descriptor;
mod error;
mod step;
mod traversal;

pub use build::{empty, items, iterate, unfold};
pub use consume::TraversalIter;
pub use descriptor::{Descriptor, DescriptorBuilder};
pub use error::{Fault, ProtocolError, StateMatchError, StepError, TraversalError};
pub use step::Step;
pub use traversal::{Phase, Traversal};
