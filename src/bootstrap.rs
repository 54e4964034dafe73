//! Construcción del `Interceptor` listo para usar.
//!
//! Carga `SignerConfig` (con `.env`), arma el `HeaderAssembler` sobre los
//! resolvers dados y lo envuelve con el transporte elegido.

use log::info;
use sign_core::{ChannelResolver, HeaderAssembler, ProductResolver, QueryReader, SignerConfig};
use sign_hooks::{Interceptor, Transport};
use std::sync::Arc;

use crate::errors::SignflowError;

pub fn interceptor_with_config<L>(config: &SignerConfig, lookups: Arc<L>, transport: Arc<dyn Transport>) -> Interceptor
    where L: ChannelResolver + ProductResolver + QueryReader + 'static
{
    let assembler = HeaderAssembler::from_lookups(config, lookups);
    info!("interceptor ready (timeout={} ms, client_context={})",
          config.timeout.as_millis(),
          config.client_context);
    Interceptor::from_config(config, assembler, transport)
}

pub fn interceptor_from_env<L>(lookups: Arc<L>, transport: Arc<dyn Transport>) -> Result<Interceptor, SignflowError>
    where L: ChannelResolver + ProductResolver + QueryReader + 'static
{
    let config = SignerConfig::from_env()?;
    Ok(interceptor_with_config(&config, lookups, transport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sign_core::StaticLookups;
    use sign_hooks::EchoTransport;
    use std::time::Duration;

    #[test]
    fn config_timeout_reaches_interceptor() {
        let config = SignerConfig::new("secret").with_timeout(Duration::from_millis(750));
        let icpt = interceptor_with_config(&config, Arc::new(StaticLookups::new()), Arc::new(EchoTransport));
        assert_eq!(icpt.timeout(), Duration::from_millis(750));
        assert_eq!(icpt.in_flight(), 0);
    }
}
