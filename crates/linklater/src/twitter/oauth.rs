//! OAuth 1.0a request signing (HMAC-SHA1).

use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::config::Credentials;
use crate::error::HarvestError;

type HmacSha1 = Hmac<Sha1>;

/// Per-request values that make a signature unique.
#[derive(Debug, Clone)]
pub struct Nonce {
    pub nonce: String,
    pub timestamp: i64,
}

impl Nonce {
    /// Fresh nonce and current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Percent-encode per RFC 3986 (unreserved characters pass through).
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn oauth_params(creds: &Credentials, nonce: &Nonce) -> Vec<(&'static str, String)> {
    vec![
        ("oauth_consumer_key", creds.consumer_key.clone()),
        ("oauth_nonce", nonce.nonce.clone()),
        ("oauth_signature_method", "HMAC-SHA1".to_string()),
        ("oauth_timestamp", nonce.timestamp.to_string()),
        ("oauth_token", creds.token.clone()),
        ("oauth_version", "1.0".to_string()),
    ]
}

/// Compute the request signature.
///
/// `url` must not carry a query string; query and body parameters go in `params`.
pub fn sign(
    creds: &Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    nonce: &Nonce,
) -> Result<String, HarvestError> {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .chain(
            oauth_params(creds, nonce)
                .into_iter()
                .map(|(k, v)| (encode(k), encode(&v))),
        )
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let key = format!(
        "{}&{}",
        encode(&creds.consumer_secret),
        encode(&creds.token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| HarvestError::Config(format!("Invalid signing key: {e}")))?;
    mac.update(base.as_bytes());
    let digest = mac.finalize().into_bytes();

    Ok(base64::engine::general_purpose::STANDARD.encode(digest))
}

/// Build the `Authorization` header value for a signed request.
pub fn authorization_header(
    creds: &Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    nonce: &Nonce,
) -> Result<String, HarvestError> {
    let signature = sign(creds, method, url, params, nonce)?;

    let mut fields = oauth_params(creds, nonce);
    fields.push(("oauth_signature", signature));
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let header = fields
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {header}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_credentials() -> Credentials {
        Credentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        }
    }

    fn reference_nonce() -> Nonce {
        Nonce {
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg".to_string(),
            timestamp: 1_318_622_958,
        }
    }

    #[test]
    fn test_reference_signature() {
        let signature = sign(
            &reference_credentials(),
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &[
                ("include_entities", "true"),
                ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ],
            &reference_nonce(),
        )
        .unwrap();

        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_authorization_header() {
        let header = authorization_header(
            &reference_credentials(),
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &[
                ("include_entities", "true"),
                ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ],
            &reference_nonce(),
        )
        .unwrap();

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_generated_nonce_is_alphanumeric() {
        let nonce = Nonce::generate();
        assert_eq!(nonce.nonce.len(), 32);
        assert!(nonce.nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
