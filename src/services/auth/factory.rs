/// Factory: build the access pipeline from application `Config`.
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{
    AuthDecisionPipeline, JsonPrincipalCodec, JwtClaimsCodec, Principal, TokenAuthenticator,
};

pub fn build_pipeline<P>(config: &Config) -> Result<AuthDecisionPipeline<P>, AppError>
where
    P: Principal + Serialize + DeserializeOwned,
{
    let mut claims = JwtClaimsCodec::from_key(&config.jwt_key, config.leeway_seconds)?;
    if let Some(audience) = config.audience.as_deref() {
        claims = claims.with_audience(audience);
    }

    let authenticator = TokenAuthenticator::new(
        Arc::new(config.access.clone()),
        Arc::new(claims),
        Arc::new(JsonPrincipalCodec::<P>::new()),
    );

    Ok(AuthDecisionPipeline::new(
        authenticator,
        Arc::new(config.rules.clone()),
    ))
}
