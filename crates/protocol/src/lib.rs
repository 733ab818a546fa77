mod context;
mod scope;

pub use context::{CallContext, CallOrigin, ORIGIN_HEADER, TAG_HEADER_PREFIX};
pub use scope::{current_context, scope, try_current_context};
