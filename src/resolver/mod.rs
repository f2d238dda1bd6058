//! Soft-redirect resolution.
//!
//! A page that answers 200 but only exists to send the browser elsewhere
//! (meta refresh, a script assignment to `location`, a short "you are being
//! redirected" interstitial, or a search engine click-tracking link) is
//! followed to its destination. The [`Resolver`] drives the chain under a hop
//! budget and hands the final page to the extractor.

pub mod detect;
pub mod extract;
pub mod follow;
pub mod outcome;
pub mod url;

pub use detect::{RedirectSignal, detect_redirect, is_redirect_page};
pub use extract::extract_real_url;
pub use follow::{DEFAULT_HOP_BUDGET, RedirectResolutionContext, ResolveConfig, Resolver};
pub use outcome::{OutcomeKind, ResolutionOutcome, Sentinel};
pub use url::resolve_reference;
