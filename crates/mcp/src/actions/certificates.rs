use async_trait::async_trait;
use forge_gate_api::ForgeClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::summary::Summary;
use super::{ConfirmableAction, labelled, site_endpoint};
use crate::types::{ResourceId, ToolError};

/// DNS providers Forge can use for DNS-01 challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DnsProviderType {
    Cloudflare,
    Route53,
    Digitalocean,
    Dnssimple,
    Linode,
    Ovh,
    Google,
}

impl DnsProviderType {
    fn as_str(self) -> &'static str {
        match self {
            DnsProviderType::Cloudflare => "cloudflare",
            DnsProviderType::Route53 => "route53",
            DnsProviderType::Digitalocean => "digitalocean",
            DnsProviderType::Dnssimple => "dnssimple",
            DnsProviderType::Linode => "linode",
            DnsProviderType::Ovh => "ovh",
            DnsProviderType::Google => "google",
        }
    }
}

/// DNS provider settings for wildcard certificates. Field names match Forge's.
#[derive(Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DnsProvider {
    #[serde(rename = "type")]
    pub kind: DnsProviderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudflare_api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route53_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route53_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digitalocean_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnssimple_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linode_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovh_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovh_app_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovh_app_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ovh_consumer_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_credentials_file: Option<String>,
}

impl std::fmt::Debug for DnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsProvider")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Request a Let's Encrypt certificate for a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLetsEncryptCertificate {
    pub server_id: ResourceId,
    pub server_name: String,
    pub site_id: ResourceId,
    pub site_name: String,
    #[schemars(description = "Domains the certificate covers, in order.")]
    pub domains: Vec<String>,
    #[serde(rename = "dns_provider", alias = "dnsProvider")]
    #[schemars(description = "DNS provider configuration, required for wildcard certificates.")]
    pub dns_provider: Option<DnsProvider>,
}

#[async_trait]
impl ConfirmableAction for CreateLetsEncryptCertificate {
    const KIND: &'static str = "Let's Encrypt certificate";
    const PROPOSE_TOOL: &'static str = "confirm_lets_encrypt_certificate_creation";
    const EXECUTE_TOOL: &'static str = "create_lets_encrypt_certificate";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to create a Let's Encrypt SSL certificate?")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Site", labelled(&self.site_name, &self.site_id))
            .list("Domains", &self.domains)
            .optional("DNS Provider", self.dns_provider.as_ref().map(|provider| provider.kind.as_str()))
            .finish()
    }

    fn check(&self) -> Result<(), ToolError> {
        if self.domains.is_empty() {
            return Err(ToolError::invalid("At least one domain is required."));
        }
        Ok(())
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let mut payload = json!({ "domains": self.domains });
        if let Some(provider) = &self.dns_provider {
            payload["dns_provider"] =
                serde_json::to_value(provider).map_err(|error| ToolError::invalid(error.to_string()))?;
        }
        let endpoint = format!(
            "{}/certificates/letsencrypt",
            site_endpoint(&self.server_id, &self.site_id)
        );
        Ok(client.post(endpoint, Some(payload)).await?)
    }
}

/// Certificate reference with display labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTarget {
    pub server_id: ResourceId,
    pub server_name: String,
    pub site_id: ResourceId,
    pub site_name: String,
    #[schemars(description = "Certificate id from list_certificates.")]
    pub certificate_id: ResourceId,
}

impl CertificateTarget {
    fn endpoint(&self) -> String {
        format!(
            "{}/certificates/{}",
            site_endpoint(&self.server_id, &self.site_id),
            self.certificate_id
        )
    }

    fn describe(&self, summary: Summary) -> Summary {
        summary
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Site", labelled(&self.site_name, &self.site_id))
            .field("Certificate ID", &self.certificate_id)
    }
}

/// Make a certificate the active one for its site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActivateCertificate {
    #[serde(flatten)]
    pub target: CertificateTarget,
}

#[async_trait]
impl ConfirmableAction for ActivateCertificate {
    const KIND: &'static str = "certificate activation";
    const PROPOSE_TOOL: &'static str = "confirm_activate_certificate";
    const EXECUTE_TOOL: &'static str = "activate_certificate";

    fn summary(&self) -> String {
        self.target
            .describe(Summary::new("Are you sure you want to activate this SSL certificate?"))
            .note("The currently active certificate of the site will be replaced.")
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.post(format!("{}/activate", self.target.endpoint()), None).await?)
    }
}

/// Delete a certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteCertificate {
    #[serde(flatten)]
    pub target: CertificateTarget,
}

#[async_trait]
impl ConfirmableAction for DeleteCertificate {
    const KIND: &'static str = "certificate deletion";
    const PROPOSE_TOOL: &'static str = "confirm_certificate_deletion";
    const EXECUTE_TOOL: &'static str = "delete_certificate";

    fn summary(&self) -> String {
        self.target
            .describe(Summary::new("Are you sure you want to delete this SSL certificate?"))
            .warning("The certificate is removed permanently. If it is active, the site stops serving HTTPS with it.")
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.delete(self.target.endpoint()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dns_provider_keeps_forge_key_names() {
        let request: CreateLetsEncryptCertificate = serde_json::from_value(json!({
            "serverId": "1",
            "serverName": "web-1",
            "siteId": "2",
            "siteName": "example.com",
            "domains": ["example.com", "*.example.com"],
            "dns_provider": {"type": "cloudflare", "cloudflare_api_token": "cf-token"}
        }))
        .unwrap();
        let provider = request.dns_provider.as_ref().unwrap();
        assert_eq!(provider.kind, DnsProviderType::Cloudflare);

        let wire = serde_json::to_value(provider).unwrap();
        assert_eq!(wire, json!({"type": "cloudflare", "cloudflare_api_token": "cf-token"}));

        let summary = request.summary();
        assert!(summary.contains("DNS Provider: cloudflare"));
        assert!(!summary.contains("cf-token"));
    }

    #[test]
    fn unknown_dns_provider_types_are_rejected() {
        let parsed = serde_json::from_value::<DnsProvider>(json!({"type": "bind9"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn certificate_endpoint_nests_under_the_site() {
        let target = CertificateTarget {
            server_id: ResourceId::from(1),
            server_name: "web-1".into(),
            site_id: ResourceId::from(2),
            site_name: "example.com".into(),
            certificate_id: ResourceId::from(3),
        };
        assert_eq!(target.endpoint(), "/servers/1/sites/2/certificates/3");
        let summary = DeleteCertificate { target }.summary();
        assert!(summary.starts_with("WARNING:"));
    }
}
