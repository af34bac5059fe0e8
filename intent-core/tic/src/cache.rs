use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tic_constants::ChainContext;

use crate::Result;

/// Opens an RPC client for one chain.
pub trait ClientConnector<C: ?Sized>: Send + Sync {
    fn connect(&self, chain: &ChainContext) -> Result<Arc<C>>;
}

/// One client per chain id, created on first use and kept until the caller
/// invalidates it.
pub struct ClientCache<C: ?Sized> {
    connector: Box<dyn ClientConnector<C>>,
    clients: Mutex<HashMap<String, Arc<C>>>,
}

impl<C: ?Sized> ClientCache<C> {
    pub fn new(connector: Box<dyn ClientConnector<C>>) -> Self {
        ClientCache {
            connector,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_connect(&self, chain: &ChainContext) -> Result<Arc<C>> {
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(&chain.chain_id) {
            return Ok(client.clone());
        }
        let client = self.connector.connect(chain)?;
        log::debug!("connected client for {}", chain.chain_id);
        clients.insert(chain.chain_id.clone(), client.clone());
        Ok(client)
    }

    /// Drops the client of `chain_id`, the next call reconnects.
    pub fn invalidate(&self, chain_id: &str) -> bool {
        let removed = self.clients.lock().remove(chain_id).is_some();
        if removed {
            log::info!("invalidated client for {}", chain_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
