pub mod authenticator;
pub mod authority;
pub mod claims;
pub mod factory;
pub mod pipeline;
pub mod principal;

pub use authenticator::{RejectReason, TokenAuthenticator};
pub use authority::{AuthorityMatcher, MatchResult, PathRules, Rule};
pub use claims::{Claims, ClaimsCodec, JwtClaimsCodec};
pub use factory::build_pipeline;
pub use pipeline::{AuthDecision, AuthDecisionPipeline};
pub use principal::{JsonPrincipalCodec, Principal, PrincipalCodec, UserDetails};
