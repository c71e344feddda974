use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{ActivateCertificate, CreateLetsEncryptCertificate, DeleteCertificate, ExecuteRequest};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{CertificateRequest, SiteRequest};

#[tool_router(router = certificate_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List the SSL certificates of a site.",
        annotations(title = "List Certificates", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_certificates(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/certificates", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get one SSL certificate of a site.",
        annotations(title = "Get Certificate", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_certificate(&self, param: Parameters<CertificateRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/certificates/{}", param.0.site.endpoint(), param.0.certificate_id)).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to request a Let's Encrypt certificate for a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with create_lets_encrypt_certificate only after an explicit yes.",
        annotations(title = "Confirm Create Let's Encrypt Certificate", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_lets_encrypt_certificate_creation(&self, param: Parameters<CreateLetsEncryptCertificate>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.lets_encrypt_certificate.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: request a Let's Encrypt certificate for a site. Requires the confirmationId from confirm_lets_encrypt_certificate_creation, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Create Let's Encrypt Certificate", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn create_lets_encrypt_certificate(&self, param: Parameters<ExecuteRequest<CreateLetsEncryptCertificate>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.lets_encrypt_certificate.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to make a certificate the active one for its site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with activate_certificate only after an explicit yes.",
        annotations(title = "Confirm Activate Certificate", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_activate_certificate(&self, param: Parameters<ActivateCertificate>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.certificate_activation.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: make a certificate the active one for its site. Requires the confirmationId from confirm_activate_certificate, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Activate Certificate", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn activate_certificate(&self, param: Parameters<ExecuteRequest<ActivateCertificate>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.certificate_activation.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to permanently delete an SSL certificate. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with delete_certificate only after an explicit yes.",
        annotations(title = "Confirm Delete Certificate", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_certificate_deletion(&self, param: Parameters<DeleteCertificate>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.certificate_deletion.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: permanently delete an SSL certificate. Requires the confirmationId from confirm_certificate_deletion, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Delete Certificate", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn delete_certificate(&self, param: Parameters<ExecuteRequest<DeleteCertificate>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.certificate_deletion.execute(&self.services.client, param.0).await)
    }
}
