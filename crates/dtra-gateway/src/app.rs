use std::net::SocketAddr;
use std::sync::Arc;

use dtra_config::GatewayConfig;
use dtra_core::{GatewayError, Result};
use dtra_diameter_dict::DictionaryManager;
use dtra_gateway_core::{MessageTranslator, TranslatorSettings};
use dtra_gateway_runtime::{DiameterGatewayHandler, ExchangeCoordinator, RadiusForwarder};
use dtra_radius::{RadiusClient, RadiusClientConfig};
use tokio::task::JoinHandle;
use tracing::info;

use crate::base::BaseProtocol;
use crate::network::TcpServer;

/// A bound gateway: Diameter listener plus the RADIUS forwarding task
pub struct Gateway {
    server: TcpServer,
    forwarder: JoinHandle<()>,
}

fn load_dictionary(paths: &[String]) -> Result<DictionaryManager> {
    DictionaryManager::with_files(paths)
        .map_err(|e| GatewayError::Config(format!("dictionary: {e}")))
}

impl Gateway {
    /// Wire every component from `config` and bind the listener
    pub async fn start(config: &GatewayConfig) -> Result<Self> {
        let dictionary = Arc::new(load_dictionary(&config.dictionary_paths)?);
        info!(avps = dictionary.len(), "Dictionary ready");

        let translator = Arc::new(MessageTranslator::new(
            TranslatorSettings::new(&config.diameter.diam_host, &config.diameter.diam_realm),
            dictionary.clone(),
        ));

        let (coordinator, jobs) = ExchangeCoordinator::new(
            config.exchange.queue_capacity,
            config.exchange.timeout(),
        );
        let coordinator = Arc::new(coordinator);

        let client = RadiusClient::new(RadiusClientConfig {
            server: config.radius.addr.clone(),
            secret: config.radius.secret.clone(),
            auth_port: config.radius.auth_port,
            acct_port: config.radius.acct_port,
            ..RadiusClientConfig::default()
        });
        info!(
            server = %config.radius.addr,
            auth_port = config.radius.auth_port,
            acct_port = config.radius.acct_port,
            "RADIUS client configured"
        );
        let forwarder =
            tokio::spawn(RadiusForwarder::new(Arc::new(client), coordinator.clone()).run(jobs));

        let handler = DiameterGatewayHandler::new(translator, coordinator);
        let base = Arc::new(BaseProtocol::new(
            dictionary,
            config.diameter.diam_host.clone(),
            config.diameter.diam_realm.clone(),
        ));
        let server = TcpServer::bind(&config.diameter.addr, handler, base).await?;

        Ok(Self { server, forwarder })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.server.local_addr()
    }

    /// Serve peers until the listener fails
    pub async fn run(self) -> Result<()> {
        let result = self.server.run().await;
        self.forwarder.abort();
        result
    }
}
