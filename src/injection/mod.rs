//! Perturbation of per-agent observations and actions.
//!
//! An [`InjectionSpec`] names the mode, the targeted agents and the noise
//! magnitude; an [`Injector`] turns it into a transform over one tuple.

pub mod error;
pub mod injector;
pub mod mode;
pub mod spec;

pub use error::InjectionError;
pub use injector::Injector;
pub use mode::InjectMode;
pub use spec::InjectionSpec;
