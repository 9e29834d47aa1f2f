use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::repository::RepoResult;

/// Address returned by a postal-code (CEP) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepAddress {
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
}

/// Postal-code lookup service.
///
/// `Ok(None)` is the service's "invalid code" flag; `Err` is a transport or
/// decoding failure.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> RepoResult<Option<CepAddress>>;
}

/// Fixed lookup table, for tests and local runs without network access.
#[derive(Debug, Default, Clone)]
pub struct StaticAddressLookup {
    known: HashMap<String, CepAddress>,
}

impl StaticAddressLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, cep: &str, address: CepAddress) -> Self {
        self.known.insert(cep.to_string(), address);
        self
    }
}

#[async_trait]
impl AddressLookup for StaticAddressLookup {
    async fn lookup(&self, cep: &str) -> RepoResult<Option<CepAddress>> {
        Ok(self.known.get(cep).cloned())
    }
}
