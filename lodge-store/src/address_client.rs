use async_trait::async_trait;
use lodge_core::address::{AddressLookup, CepAddress};
use lodge_core::repository::RepoResult;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Client for a ViaCEP-compatible service: `GET {base_url}/{cep}/json/`.
#[derive(Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> RepoResult<Option<CepAddress>> {
        let url = format!("{}/{}/json/", self.base_url, cep);
        let response = self.http.get(&url).send().await?;

        // Malformed codes are answered with 400 rather than the error flag.
        if response.status() == StatusCode::BAD_REQUEST {
            debug!(cep, "Postal code rejected by lookup service");
            return Ok(None);
        }

        let body: Value = response.error_for_status()?.json().await?;
        Ok(parse_lookup_body(&body))
    }
}

/// `None` for a null body or one carrying the `erro` flag (sent as either
/// `true` or `"true"`).
pub fn parse_lookup_body(body: &Value) -> Option<CepAddress> {
    let flagged = match body.get("erro") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag == "true",
        _ => false,
    };
    if body.is_null() || flagged {
        return None;
    }

    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    Some(CepAddress {
        logradouro: field("logradouro"),
        complemento: field("complemento"),
        bairro: field("bairro"),
        localidade: field("localidade"),
        uf: field("uf"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_body() {
        let body = json!({
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        });
        let address = parse_lookup_body(&body).unwrap();
        assert_eq!(address.localidade, "São Paulo");
        assert_eq!(address.uf, "SP");
    }

    #[test]
    fn test_parse_error_flag() {
        assert_eq!(parse_lookup_body(&json!({ "erro": true })), None);
        assert_eq!(parse_lookup_body(&json!({ "erro": "true" })), None);
        assert_eq!(parse_lookup_body(&Value::Null), None);
    }

    #[test]
    fn test_cleared_error_flag_is_valid() {
        let body = json!({ "erro": false, "localidade": "Recife", "uf": "PE" });
        assert_eq!(parse_lookup_body(&body).unwrap().localidade, "Recife");

        let body = json!({ "erro": "false", "localidade": "Recife", "uf": "PE" });
        assert!(parse_lookup_body(&body).is_some());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let address = parse_lookup_body(&json!({ "localidade": "Recife", "uf": "PE" })).unwrap();
        assert_eq!(address.complemento, "");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ViaCepClient::new("https://viacep.com.br/ws/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "https://viacep.com.br/ws");
    }
}
